//! Rejection filters for implausible detections.
//!
//! A filter is a pure predicate. The extractor still removes the inliers of a
//! rejected fit so the same points are not fitted again.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::detection::CylinderDetection;

/// Decides whether a detection should be discarded.
pub trait RejectionFilter<D> {
    /// Returns `true` if `detection` should not be reported.
    fn rejects(&self, detection: &D) -> bool;
}

/// Keeps every detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptAll;

impl<D> RejectionFilter<D> for AcceptAll {
    fn rejects(&self, _detection: &D) -> bool {
        false
    }
}

/// Rejects cylinders wider than a hole or post could plausibly be.
///
/// Oversized cylinders are usually a mis-fit against nearly coplanar points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaxRadius {
    /// Largest accepted radius (inclusive).
    pub max_radius: f64,
}

impl Default for MaxRadius {
    fn default() -> Self {
        Self { max_radius: 10.0 }
    }
}

impl MaxRadius {
    /// Create a filter with the given radius limit.
    #[must_use]
    pub const fn new(max_radius: f64) -> Self {
        Self { max_radius }
    }
}

impl RejectionFilter<CylinderDetection> for MaxRadius {
    fn rejects(&self, detection: &CylinderDetection) -> bool {
        detection.radius > self.max_radius
    }
}

impl<D, F: RejectionFilter<D> + ?Sized> RejectionFilter<D> for &F {
    fn rejects(&self, detection: &D) -> bool {
        (**self).rejects(detection)
    }
}
