//! Error types for refmetrics

use thiserror::Error;

/// Result type alias for refmetrics operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while computing metrics
#[derive(Error, Debug)]
pub enum Error {
    #[error("Length mismatch: {what} has {found} items, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Unsupported embedding backend: {0} (supported: local, openai, azure_openai)")]
    UnsupportedBackend(String),

    #[error("Config error: {0}")]
    Configuration(String),

    #[error("Remote provider error: {0}")]
    RemoteProvider(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
