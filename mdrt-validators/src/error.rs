//! Error types for validator construction.

use mdrt_types::TypeError;
use thiserror::Error;

/// Result type for validator construction.
pub type ValidatorResult<T> = Result<T, ValidatorError>;

#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid bound: {0}")]
    InvalidBound(#[from] TypeError),
}
