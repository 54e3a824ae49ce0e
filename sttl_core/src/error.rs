//! Errors at the structured/text boundary.

use thiserror::Error;

/// Raised only when converting graphs or indexes to or from JSON.
/// Decoding and extraction never fail.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("JSON conversion failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
