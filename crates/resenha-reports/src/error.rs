//! Error types for the reporting engine.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the reporting engine.
#[derive(Debug, Error)]
pub enum Error {
    /// No template registered under the requested id.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Report not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not valid for the report's current status.
    #[error("Invalid report state: {0}")]
    InvalidState(String),

    /// Aggregation step failed.
    #[error("Report generation failed: {0}")]
    Generation(String),

    /// Serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error.
    #[error("Other: {0}")]
    Other(#[from] anyhow::Error),
}
