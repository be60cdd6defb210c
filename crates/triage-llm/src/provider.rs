//! Reasoning backend trait

use triage_core::{Message, ToolDefinition};

/// Result type for reasoning operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Reasoning backend error types
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// The two reasoning capabilities the investigation graph needs.
///
/// `converse` produces exactly one assistant turn for an ordered history,
/// with the given tools bound. `complete` is a stateless single-shot
/// completion with no tool binding; the decision step uses it so the
/// classifier can never call tools.
#[async_trait::async_trait]
pub trait ReasoningPort: Send + Sync {
    fn name(&self) -> &str;

    async fn converse(
        &self,
        history: &[Message],
        tools: &[ToolDefinition],
    ) -> LlmResult<Message>;

    async fn complete(&self, prompt: &str) -> LlmResult<String>;
}
