//! Error types for the sift library.

use thiserror::Error;

/// Main error type for sift operations.
///
/// Malformed *data* never produces an error — it is absorbed into confidence
/// scores, diagnostics, and per-cell error entries. Only caller contract
/// violations (nothing to run against) surface here.
#[derive(Debug, Error)]
pub enum SiftError {
    /// An operation was invoked on an empty dataset.
    #[error("empty dataset: {0}")]
    EmptyData(String),

    /// Evaluation was requested without any rules.
    #[error("no validation rules to evaluate")]
    EmptyRuleSet,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;
