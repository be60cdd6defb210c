//! Triage Core - shared types and error handling
//!
//! This crate defines the conversation types that drive an investigation,
//! the incident signal ingested from the telemetry pipeline, and the common
//! error type used across the workspace.

pub mod config;
pub mod error;
pub mod incident;
pub mod message;

pub use config::{BindMode, GatewayConfig};
pub use error::{Error, Result};
pub use incident::{IncidentDescriptor, IncidentSignal};
pub use message::{Decision, Message, Role, ToolCall, ToolDefinition};
