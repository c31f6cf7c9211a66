//! Greedy multi-model extraction.
//!
//! Repeatedly fits one primitive to the remaining points, records it, and
//! removes its inliers. Each point therefore supports at most one detection
//! of a pass, and the working set shrinks with every successful fit.

use std::fmt;

use mesh_types::{Point3, PointCloud};
use tracing::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::detection::{CylinderDetection, Describe, PlaneDetection};
use crate::error::{PrimitiveError, PrimitiveResult};
use crate::fit::PrimitiveFitter;
use crate::ransac::{RansacConfig, RansacCylinder, RansacPlane};
use crate::reject::{AcceptAll, MaxRadius, RejectionFilter};

/// Parameters for one greedy extraction pass.
///
/// The minimum inlier count is `max(floor(N * min_inlier_ratio),
/// min_inlier_floor)` where `N` is the size of the full input cloud.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtractionParams {
    /// Maximum number of fit attempts, accepted or rejected.
    pub max_models: usize,
    /// Inlier distance threshold, in point units.
    pub distance_threshold: f64,
    /// Minimum inliers as a fraction of the full cloud.
    pub min_inlier_ratio: f64,
    /// Absolute lower bound on the minimum inlier count.
    pub min_inlier_floor: usize,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            max_models: 10,
            distance_threshold: 0.1,
            min_inlier_ratio: 0.02,
            min_inlier_floor: 0,
        }
    }
}

impl ExtractionParams {
    /// Create parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plane pass defaults: 8 models, 0.15 threshold, 2% of the cloud.
    #[must_use]
    pub const fn for_planes() -> Self {
        Self {
            max_models: 8,
            distance_threshold: 0.15,
            min_inlier_ratio: 0.02,
            min_inlier_floor: 0,
        }
    }

    /// Cylinder pass defaults: 15 models, 0.08 threshold, 0.5% of the
    /// cloud but never fewer than 20 points.
    #[must_use]
    pub const fn for_cylinders() -> Self {
        Self {
            max_models: 15,
            distance_threshold: 0.08,
            min_inlier_ratio: 0.005,
            min_inlier_floor: 20,
        }
    }

    /// Set the maximum number of fit attempts.
    #[must_use]
    pub const fn with_max_models(mut self, max_models: usize) -> Self {
        self.max_models = max_models;
        self
    }

    /// Set the inlier distance threshold.
    #[must_use]
    pub const fn with_distance_threshold(mut self, threshold: f64) -> Self {
        self.distance_threshold = threshold;
        self
    }

    /// Set the minimum inlier ratio.
    #[must_use]
    pub const fn with_min_inlier_ratio(mut self, ratio: f64) -> Self {
        self.min_inlier_ratio = ratio;
        self
    }

    /// Set the absolute minimum inlier count.
    #[must_use]
    pub const fn with_min_inlier_floor(mut self, floor: usize) -> Self {
        self.min_inlier_floor = floor;
        self
    }

    /// Minimum inlier count for a cloud of `total_points` points.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    // Truncation: the ratio is validated to [0, 1], so the product fits in usize
    pub fn min_inliers(&self, total_points: usize) -> usize {
        let from_ratio = (total_points as f64 * self.min_inlier_ratio) as usize;
        from_ratio.max(self.min_inlier_floor)
    }

    /// Check that the parameters describe a usable pass.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidParams`] for a zero model count, a
    /// non-positive threshold, or a ratio outside `[0, 1]`.
    pub fn validate(&self) -> PrimitiveResult<()> {
        if self.max_models == 0 {
            return Err(PrimitiveError::invalid_params("max_models must be positive"));
        }
        if !(self.distance_threshold.is_finite() && self.distance_threshold > 0.0) {
            return Err(PrimitiveError::invalid_params(format!(
                "distance_threshold must be positive, got {}",
                self.distance_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.min_inlier_ratio) {
            return Err(PrimitiveError::invalid_params(format!(
                "min_inlier_ratio must be in [0, 1], got {}",
                self.min_inlier_ratio
            )));
        }
        Ok(())
    }
}

/// Configuration of a plane pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneExtraction {
    /// Greedy loop parameters.
    pub params: ExtractionParams,
    /// Fitter configuration.
    pub ransac: RansacConfig,
}

impl Default for PlaneExtraction {
    fn default() -> Self {
        Self {
            params: ExtractionParams::for_planes(),
            ransac: RansacConfig::default(),
        }
    }
}

/// Configuration of a cylinder pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderExtraction {
    /// Greedy loop parameters.
    pub params: ExtractionParams,
    /// Fitter configuration.
    pub ransac: RansacConfig,
    /// Oversized cylinders are rejected.
    pub rejection: MaxRadius,
}

impl Default for CylinderExtraction {
    fn default() -> Self {
        Self {
            params: ExtractionParams::for_cylinders(),
            ransac: RansacConfig::default(),
            rejection: MaxRadius::default(),
        }
    }
}

/// Why an extraction pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StopReason {
    /// `max_models` fit attempts were made.
    MaxModels,
    /// The working set was empty or smaller than the minimum inlier count.
    BelowFloor,
    /// The best fit had fewer inliers than the minimum.
    WeakFit,
    /// The fitter returned an error.
    FitFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MaxModels => "model limit reached",
            Self::BelowFloor => "too few points remaining",
            Self::WeakFit => "no confident fit remaining",
            Self::FitFailed => "fitter failed",
        })
    }
}

/// Outcome of a greedy extraction pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<D> {
    /// Accepted detections, in extraction order.
    pub detections: Vec<D>,
    /// Detections discarded by the rejection filter, in extraction order.
    pub rejected: Vec<D>,
    /// Number of fit attempts made.
    pub iterations: usize,
    /// Points left in the working set.
    pub remaining: usize,
    /// Why the pass ended.
    pub stop: StopReason,
    /// Minimum inlier count used by the pass.
    pub min_inliers: usize,
}

/// Points still available to the pass, each tagged with its source index.
struct WorkingSet {
    points: Vec<Point3<f64>>,
    origin: Vec<usize>,
}

impl WorkingSet {
    fn new(points: &[Point3<f64>]) -> Self {
        Self {
            points: points.to_vec(),
            origin: (0..points.len()).collect(),
        }
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Remove the points at `indices` (sorted, unique, in range) and
    /// return them with their source indices.
    fn take(&mut self, indices: &[usize]) -> (Vec<Point3<f64>>, Vec<usize>) {
        let mut selected = vec![false; self.points.len()];
        for &i in indices {
            selected[i] = true;
        }

        let taken_points = indices.iter().map(|&i| self.points[i]).collect();
        let taken_origin = indices.iter().map(|&i| self.origin[i]).collect();

        let mut keep = selected.iter().map(|s| !s);
        self.points.retain(|_| keep.next().unwrap_or(false));
        let mut keep = selected.iter().map(|s| !s);
        self.origin.retain(|_| keep.next().unwrap_or(false));

        (taken_points, taken_origin)
    }
}

/// Run a greedy extraction pass with any fitter and rejection filter.
///
/// The pass starts from all of `points` and stops at the first of: the
/// working set dropping below the minimum inlier count, a fit with too few
/// inliers, a fitter error, or `max_models` attempts. Fitter errors end the
/// pass but are not returned; everything detected up to that point is kept.
///
/// Rejected fits are not reported but their inliers are still removed.
///
/// # Errors
///
/// Returns [`PrimitiveError::InvalidParams`] if `params` fails
/// [`ExtractionParams::validate`].
pub fn extract_greedy<F, R>(
    points: &[Point3<f64>],
    mut fitter: F,
    filter: &R,
    params: &ExtractionParams,
) -> PrimitiveResult<Extraction<<F::Model as Describe>::Detection>>
where
    F: PrimitiveFitter,
    F::Model: Describe,
    R: RejectionFilter<<F::Model as Describe>::Detection> + ?Sized,
{
    params.validate()?;

    let min_inliers = params.min_inliers(points.len());
    let mut working = WorkingSet::new(points);
    let mut detections = Vec::new();
    let mut rejected = Vec::new();
    let mut iterations = 0;
    let mut stop = StopReason::MaxModels;

    info!(
        points = points.len(),
        min_inliers,
        max_models = params.max_models,
        threshold = params.distance_threshold,
        "Starting greedy extraction"
    );

    for iteration in 0..params.max_models {
        if working.is_empty() || working.len() < min_inliers {
            stop = StopReason::BelowFloor;
            break;
        }

        iterations += 1;
        let fit = match fitter.fit(&working.points, params.distance_threshold) {
            Ok(fit) => fit,
            Err(e) => {
                warn!(iteration, remaining = working.len(), error = %e, "Fit failed, ending pass");
                stop = StopReason::FitFailed;
                break;
            }
        };

        let mut inliers = fit.inliers;
        inliers.sort_unstable();
        inliers.dedup();
        inliers.retain(|&i| i < working.len());

        if inliers.is_empty() || inliers.len() < min_inliers {
            debug!(iteration, inliers = inliers.len(), min_inliers, "Fit too weak, ending pass");
            stop = StopReason::WeakFit;
            break;
        }

        let (inlier_points, source_indices) = working.take(&inliers);
        let detection = fit.model.describe(&inlier_points, source_indices);

        if filter.rejects(&detection) {
            debug!(iteration, inliers = inliers.len(), remaining = working.len(), "Fit rejected");
            rejected.push(detection);
        } else {
            debug!(iteration, inliers = inliers.len(), remaining = working.len(), "Fit accepted");
            detections.push(detection);
        }
    }

    info!(
        detections = detections.len(),
        rejected = rejected.len(),
        remaining = working.len(),
        stop = %stop,
        "Greedy extraction finished"
    );

    Ok(Extraction {
        detections,
        rejected,
        iterations,
        remaining: working.len(),
        stop,
        min_inliers,
    })
}

/// Extract planes with RANSAC. Every plane fit is kept.
///
/// # Errors
///
/// Returns [`PrimitiveError::InvalidParams`] for invalid parameters.
pub fn extract_planes(
    cloud: &PointCloud,
    config: &PlaneExtraction,
) -> PrimitiveResult<Extraction<PlaneDetection>> {
    extract_greedy(
        &cloud.points,
        RansacPlane::new(config.ransac.clone()),
        &AcceptAll,
        &config.params,
    )
}

/// Extract cylinders with RANSAC, rejecting oversized ones.
///
/// # Errors
///
/// Returns [`PrimitiveError::InvalidParams`] for invalid parameters.
pub fn extract_cylinders(
    cloud: &PointCloud,
    config: &CylinderExtraction,
) -> PrimitiveResult<Extraction<CylinderDetection>> {
    extract_greedy(
        &cloud.points,
        RansacCylinder::new(config.ransac.clone()),
        &config.rejection,
        &config.params,
    )
}
