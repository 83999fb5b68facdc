//! Error types for the alert engine.

use thiserror::Error;

/// Result type for alert operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the alert engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A condition combines a type and operator that have no meaning
    /// together, or carries an unparseable value.
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    /// Rule or alert not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Other error.
    #[error("Other: {0}")]
    Other(#[from] anyhow::Error),
}
