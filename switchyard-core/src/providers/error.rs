//! Internal transform errors
//!
//! These never cross the public boundary. Each adapter catches them, logs
//! them, and falls back to its fail-open value.

use thiserror::Error;

/// Result type for internal transform steps
pub type TransformResult<T> = Result<T, TransformError>;

/// Failures while reading or re-framing upstream data
#[derive(Debug, Error)]
pub enum TransformError {
    /// Payload was not valid JSON or did not match the wire shape
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON in an unexpected place (e.g. an array where an object belongs)
    #[error("unexpected payload shape: {0}")]
    UnexpectedShape(String),
}
