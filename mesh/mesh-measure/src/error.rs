//! Error types for measurement queries.

use thiserror::Error;

/// Result type alias for measurement queries.
pub type MeasureResult<T> = Result<T, MeasureError>;

/// Errors returned by measurement queries.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// A query that needs points got an empty cloud.
    #[error("point cloud has no points")]
    EmptyCloud,

    /// A mesh has no face with positive area to sample from.
    #[error("mesh has no triangle with positive area")]
    NoSurface,

    /// A parameter was zero, negative or not finite.
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidParams {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

impl MeasureError {
    /// Create an empty cloud error.
    #[must_use]
    pub const fn empty_cloud() -> Self {
        Self::EmptyCloud
    }

    /// Check that `value` is a positive finite number.
    pub(crate) fn require_positive(name: &'static str, value: f64) -> MeasureResult<f64> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(Self::InvalidParams { name, value })
        }
    }
}
