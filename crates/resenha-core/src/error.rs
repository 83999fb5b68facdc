//! Error types for the core domain primitives.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core domain layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A review carried data the engines cannot work with.
    #[error("Invalid review data: {0}")]
    InvalidReview(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage operation failed.
    #[error("Storage failed: {0}")]
    Storage(String),

    /// Other error.
    #[error("Other: {0}")]
    Other(#[from] anyhow::Error),
}
