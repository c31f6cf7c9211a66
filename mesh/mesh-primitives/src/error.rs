//! Error types for primitive fitting.

use thiserror::Error;

/// Result type for primitive fitting operations.
pub type PrimitiveResult<T> = Result<T, PrimitiveError>;

/// Errors that can occur while fitting or extracting primitives.
#[derive(Debug, Error)]
pub enum PrimitiveError {
    /// Not enough points for the operation.
    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints {
        /// Minimum number of points required.
        required: usize,
        /// Actual number of points provided.
        actual: usize,
    },

    /// Every sampled minimal set was degenerate.
    #[error("no consensus model after {iterations} iterations")]
    NoConsensus {
        /// Number of iterations attempted.
        iterations: usize,
    },

    /// Invalid extraction or fitting parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

impl PrimitiveError {
    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }
}
