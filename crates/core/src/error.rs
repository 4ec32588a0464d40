//! Core error types.

use thiserror::Error;

/// Errors from core domain logic and configuration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown resource kind: {0}")]
    UnknownResourceKind(String),

    #[error("unknown share role: {0}")]
    UnknownShareRole(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
