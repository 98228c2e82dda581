//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// None of these are retried internally; the caller decides what to surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A draw was requested but every number has already been drawn.
    #[error("pool exhausted: every number has been drawn")]
    PoolExhausted,

    /// An operation was called out of sequence. State is left unchanged.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A validation error in domain configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure error (e.g. a poisoned lock).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
