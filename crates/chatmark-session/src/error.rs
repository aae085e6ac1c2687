//! # Session Error Types

use chatmark_config::ConfigError;
use chatmark_llm::LLMError;
use thiserror::Error;

/// Errors surfaced to the caller of a session operation.
///
/// Every variant is returned before any state change.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Input is empty after trimming
    #[error("Input is empty")]
    EmptyInput,

    /// A reply is still pending
    #[error("A request is already in flight")]
    RequestInFlight,

    /// File name lacks the knowledge-document extension
    #[error("Unsupported document: {name} (expected a {expected} file)")]
    UnsupportedDocument { name: String, expected: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway setup failed: {0}")]
    Gateway(#[from] LLMError),
}

impl SessionError {
    pub fn unsupported_document(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::UnsupportedDocument {
            name: name.into(),
            expected: expected.into(),
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
