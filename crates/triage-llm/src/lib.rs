//! Triage LLM - reasoning backend adapters
//!
//! The investigation graph talks to its model through the `ReasoningPort`
//! trait; `OllamaProvider` is the production implementation.

pub mod ollama;
pub mod provider;

pub use ollama::{OllamaConfig, OllamaProvider};
pub use provider::{LlmError, LlmResult, ReasoningPort};
