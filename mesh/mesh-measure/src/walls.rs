//! Wall thickness inference for tray- and box-shaped parts.
//!
//! At a given height the outermost points of the slice give the outer
//! rectangle. Points well inside that rectangle belong to the inner face of
//! the walls (or to features inside the cavity), so their extent gives the
//! inner rectangle. Half the difference is the wall thickness per axis.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use mesh_types::PointCloud;

use crate::sections::{band_points, xy_extent};

/// Parameters for [`wall_profile`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WallParams {
    /// Half-height of the band of points taken around the level (exclusive).
    pub band: f64,
    /// Points must be strictly more than this far inside the outer
    /// rectangle, on both axes, to count as inner.
    pub inset: f64,
    /// Minimum points in the slice.
    pub min_points: usize,
    /// The inner rectangle needs strictly more inner points than this.
    pub min_inner_points: usize,
}

impl Default for WallParams {
    fn default() -> Self {
        Self {
            band: 0.15,
            inset: 0.5,
            min_points: 4,
            min_inner_points: 4,
        }
    }
}

impl WallParams {
    /// Create parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the band half-height.
    #[must_use]
    pub const fn with_band(mut self, band: f64) -> Self {
        self.band = band;
        self
    }

    /// Set the inset.
    #[must_use]
    pub const fn with_inset(mut self, inset: f64) -> Self {
        self.inset = inset;
        self
    }
}

/// An axis-aligned rectangle in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// `[x_min, y_min]`.
    pub min: [f64; 2],
    /// `[x_max, y_max]`.
    pub max: [f64; 2],
}

impl Rect {
    /// Width in X.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    /// Depth in Y.
    #[must_use]
    pub fn depth(&self) -> f64 {
        self.max[1] - self.min[1]
    }
}

/// Outer and inner outline of a slice.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WallProfile {
    /// Slice height.
    pub z: f64,
    /// Points in the slice.
    pub point_count: usize,
    /// Bounds of all points in the slice.
    pub outer: Rect,
    /// Bounds of the inner points, if there are enough of them.
    pub inner: Option<Rect>,
}

impl WallProfile {
    /// Wall thickness `[x, y]` as half the difference of outer and inner
    /// size. `None` when there is no inner outline.
    #[must_use]
    pub fn wall_thickness(&self) -> Option<[f64; 2]> {
        self.inner.map(|inner| {
            [
                (self.outer.width() - inner.width()) / 2.0,
                (self.outer.depth() - inner.depth()) / 2.0,
            ]
        })
    }
}

/// Infer the wall outline of the slice at height `z`.
///
/// Returns `None` if the slice has fewer than `min_points` points.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, PointCloud};
/// use mesh_measure::{WallParams, wall_profile};
///
/// // Outer 10 x 10 square and inner 8 x 8 square at z = 2
/// let mut points = Vec::new();
/// for (lo, hi) in [(0.0, 10.0), (1.0, 9.0)] {
///     for (x, y) in [(lo, lo), (hi, lo), (hi, hi), (lo, hi), (lo, 5.0), (hi, 5.0)] {
///         points.push(Point3::new(x, y, 2.0));
///     }
/// }
/// let cloud = PointCloud::from_points(points);
///
/// let profile = wall_profile(&cloud, 2.0, &WallParams::default()).unwrap();
/// let [tx, ty] = profile.wall_thickness().unwrap();
/// assert!((tx - 1.0).abs() < 1e-9);
/// assert!((ty - 1.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn wall_profile(cloud: &PointCloud, z: f64, params: &WallParams) -> Option<WallProfile> {
    let points = band_points(cloud, z, params.band);
    if points.len() < params.min_points {
        return None;
    }

    let (x_range, y_range) = xy_extent(&points)?;
    let outer = Rect {
        min: [x_range[0], y_range[0]],
        max: [x_range[1], y_range[1]],
    };

    let inner_points: Vec<_> = points
        .iter()
        .filter(|p| {
            p.x > outer.min[0] + params.inset
                && p.x < outer.max[0] - params.inset
                && p.y > outer.min[1] + params.inset
                && p.y < outer.max[1] - params.inset
        })
        .collect();

    let inner = if inner_points.len() > params.min_inner_points {
        xy_extent(inner_points.iter().copied()).map(|(x, y)| Rect {
            min: [x[0], y[0]],
            max: [x[1], y[1]],
        })
    } else {
        None
    };

    Some(WallProfile {
        z,
        point_count: points.len(),
        outer,
        inner,
    })
}

/// Wall profiles at every distinct height, with Z rounded to `step`.
///
/// Heights whose slice is too sparse are skipped.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
// Truncation: coordinates are bounded part sizes, far below i64 range
pub fn wall_profiles(cloud: &PointCloud, step: f64, params: &WallParams) -> Vec<WallProfile> {
    if !(step.is_finite() && step > 0.0) {
        return Vec::new();
    }
    let mut steps: Vec<i64> = cloud
        .z_values()
        .filter(|z| z.is_finite())
        .map(|z| (z / step).round_ties_even() as i64)
        .collect();
    steps.sort_unstable();
    steps.dedup();

    steps
        .into_iter()
        .filter_map(|k| wall_profile(cloud, k as f64 * step, params))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::Point3;

    fn square(lo: f64, hi: f64, z: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(lo, lo, z),
            Point3::new(hi, lo, z),
            Point3::new(hi, hi, z),
            Point3::new(lo, hi, z),
            Point3::new(lo, f64::midpoint(lo, hi), z),
            Point3::new(hi, f64::midpoint(lo, hi), z),
        ]
    }

    #[test]
    fn tray_walls() {
        // 58.2 x 36.8 outer, 0.8 mm walls
        let mut points = vec![
            Point3::new(0.0, 0.0, 1.6),
            Point3::new(58.2, 0.0, 1.6),
            Point3::new(58.2, 36.8, 1.6),
            Point3::new(0.0, 36.8, 1.6),
        ];
        points.extend([
            Point3::new(0.8, 0.8, 1.6),
            Point3::new(57.4, 0.8, 1.6),
            Point3::new(57.4, 36.0, 1.6),
            Point3::new(0.8, 36.0, 1.6),
            Point3::new(30.0, 0.8, 1.6),
        ]);
        let cloud = PointCloud::from_points(points);

        let profile = wall_profile(&cloud, 1.6, &WallParams::default()).unwrap();
        assert_eq!(profile.point_count, 9);
        assert_relative_eq!(profile.outer.width(), 58.2, epsilon = 1e-9);
        let [tx, ty] = profile.wall_thickness().unwrap();
        assert_relative_eq!(tx, 0.8, epsilon = 1e-9);
        assert_relative_eq!(ty, 0.8, epsilon = 1e-9);
    }

    #[test]
    fn solid_slab_has_no_inner_outline() {
        let cloud = PointCloud::from_points(square(0.0, 10.0, 0.0));
        let profile = wall_profile(&cloud, 0.0, &WallParams::default()).unwrap();
        assert!(profile.inner.is_none());
        assert!(profile.wall_thickness().is_none());
    }

    #[test]
    fn sparse_slice_is_none() {
        let cloud = PointCloud::from_points(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        assert!(wall_profile(&cloud, 0.0, &WallParams::default()).is_none());
        assert!(wall_profile(&cloud, 5.0, &WallParams::default()).is_none());
    }

    #[test]
    fn profiles_per_level() {
        let mut points = square(0.0, 10.0, 0.0);
        points.extend(square(1.0, 9.0, 0.0));
        points.extend(square(0.0, 10.0, 3.0));
        let cloud = PointCloud::from_points(points);

        let profiles = wall_profiles(&cloud, 0.1, &WallParams::default());
        assert_eq!(profiles.len(), 2);
        assert!(profiles[0].inner.is_some());
        assert!(profiles[1].inner.is_none());
        assert_relative_eq!(profiles[1].z, 3.0, epsilon = 1e-9);
    }
}
