//! Error types for the triage service

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("reasoning error: {provider} - {message}")]
    Reasoning { provider: String, message: String },

    #[error("invalid signal: {0}")]
    InvalidSignal(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn reasoning(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Reasoning {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
