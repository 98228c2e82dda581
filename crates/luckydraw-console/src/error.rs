//! Lucky Draw — console error types.

use luckydraw_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the console front end.
#[derive(Debug, Error)]
pub enum AppError {
    /// A configuration variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A domain error the console cannot recover from.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Terminal I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A view could not be rendered as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
