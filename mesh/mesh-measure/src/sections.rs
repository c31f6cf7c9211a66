//! Z-level detection and horizontal slice summaries.
//!
//! Parts modelled as stacked extrusions have vertices on a handful of Z
//! heights. Rounding Z to a grid recovers those heights, and the points in
//! a thin band around each one describe the outline at that level.

use mesh_types::{Point3, PointCloud};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MeasureError, MeasureResult};

/// Parameters for Z-level cross sections.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SectionParams {
    /// Grid step used to round Z coordinates into levels.
    pub z_tolerance: f64,
    /// Half-height of the band of points taken around a level (exclusive).
    pub band: f64,
    /// A slice is kept only with strictly more points than this.
    pub min_points: usize,
}

impl Default for SectionParams {
    fn default() -> Self {
        Self {
            z_tolerance: 0.3,
            band: 0.5,
            min_points: 10,
        }
    }
}

impl SectionParams {
    /// Create parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Z rounding step.
    #[must_use]
    pub const fn with_z_tolerance(mut self, tolerance: f64) -> Self {
        self.z_tolerance = tolerance;
        self
    }

    /// Set the band half-height.
    #[must_use]
    pub const fn with_band(mut self, band: f64) -> Self {
        self.band = band;
        self
    }

    /// Set the minimum point count.
    #[must_use]
    pub const fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }
}

/// Points of one Z level and their XY extent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelSlice {
    /// Level height.
    pub z: f64,
    /// Number of points in the band.
    pub point_count: usize,
    /// `[min, max]` X of the band.
    pub x_range: [f64; 2],
    /// `[min, max]` Y of the band.
    pub y_range: [f64; 2],
    /// `max - min` in X.
    pub x_span: f64,
    /// `max - min` in Y.
    pub y_span: f64,
}

/// Distinct Z heights of a cloud, rounded to multiples of `tolerance`.
///
/// Values are ascending and unique. Halfway cases round to the even
/// multiple.
///
/// # Errors
///
/// Returns [`MeasureError::InvalidParams`] if `tolerance` is not a positive
/// finite number.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, PointCloud};
/// use mesh_measure::z_levels;
///
/// let cloud = PointCloud::from_points(vec![
///     Point3::new(0.0, 0.0, 0.02),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 1.79),
/// ]);
/// let levels = z_levels(&cloud, 0.3).unwrap();
/// assert_eq!(levels.len(), 2);
/// assert!((levels[1] - 1.8).abs() < 1e-9);
/// ```
pub fn z_levels(cloud: &PointCloud, tolerance: f64) -> MeasureResult<Vec<f64>> {
    let tolerance = MeasureError::require_positive("z tolerance", tolerance)?;

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: coordinates are bounded part sizes, far below i64 range
    let mut steps: Vec<i64> = cloud
        .z_values()
        .filter(|z| z.is_finite())
        .map(|z| (z / tolerance).round_ties_even() as i64)
        .collect();
    steps.sort_unstable();
    steps.dedup();

    #[allow(clippy::cast_precision_loss)]
    // Precision loss: step counts are small integers
    let levels = steps.into_iter().map(|k| k as f64 * tolerance).collect();
    Ok(levels)
}

/// Points within `band` (exclusive) of height `z`.
pub(crate) fn band_points(cloud: &PointCloud, z: f64, band: f64) -> Vec<Point3<f64>> {
    cloud
        .points
        .iter()
        .filter(|p| (p.z - z).abs() < band)
        .copied()
        .collect()
}

/// XY extent of a set of points as `([x_min, x_max], [y_min, y_max])`.
pub(crate) fn xy_extent<'a>(
    points: impl IntoIterator<Item = &'a Point3<f64>>,
) -> Option<([f64; 2], [f64; 2])> {
    points.into_iter().fold(None, |acc, p| {
        Some(match acc {
            None => ([p.x, p.x], [p.y, p.y]),
            Some(([x0, x1], [y0, y1])) => ([x0.min(p.x), x1.max(p.x)], [y0.min(p.y), y1.max(p.y)]),
        })
    })
}

/// Summarize the slice of the cloud around each level.
///
/// Levels whose band holds `min_points` points or fewer are skipped. The
/// query has no side effects.
#[must_use]
pub fn cross_sections(cloud: &PointCloud, levels: &[f64], params: &SectionParams) -> Vec<LevelSlice> {
    let slices: Vec<LevelSlice> = levels
        .iter()
        .filter_map(|&z| {
            let points = band_points(cloud, z, params.band);
            if points.len() <= params.min_points {
                return None;
            }
            let (x_range, y_range) = xy_extent(&points)?;
            Some(LevelSlice {
                z,
                point_count: points.len(),
                x_range,
                y_range,
                x_span: x_range[1] - x_range[0],
                y_span: y_range[1] - y_range[0],
            })
        })
        .collect();

    debug!(
        levels = levels.len(),
        slices = slices.len(),
        band = params.band,
        "Computed cross sections"
    );
    slices
}

/// Detect Z levels and summarize each one.
///
/// # Errors
///
/// Returns [`MeasureError::InvalidParams`] for a non-positive tolerance.
pub fn level_summary(cloud: &PointCloud, params: &SectionParams) -> MeasureResult<Vec<LevelSlice>> {
    let levels = z_levels(cloud, params.z_tolerance)?;
    Ok(cross_sections(cloud, &levels, params))
}
