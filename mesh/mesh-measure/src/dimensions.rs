//! Bounding-box dimensions.

use mesh_types::{MeshBounds, Point3};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of dimension extraction.
///
/// Contains bounding box information and derived measurements.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, PointCloud};
/// use mesh_measure::dimensions;
///
/// let cloud = PointCloud::from_points(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(58.2, 36.8, 6.8),
/// ]);
/// let dims = dimensions(&cloud);
///
/// assert!((dims.width - 58.2).abs() < 1e-10);
/// assert!((dims.depth - 36.8).abs() < 1e-10);
/// assert!((dims.height - 6.8).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimensions {
    /// Bounding box minimum point.
    pub min: Point3<f64>,
    /// Bounding box maximum point.
    pub max: Point3<f64>,
    /// Width (X dimension).
    pub width: f64,
    /// Depth (Y dimension).
    pub depth: f64,
    /// Height (Z dimension).
    pub height: f64,
    /// Diagonal length of bounding box.
    pub diagonal: f64,
    /// Center of bounding box.
    pub center: Point3<f64>,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            min: Point3::origin(),
            max: Point3::origin(),
            width: 0.0,
            depth: 0.0,
            height: 0.0,
            diagonal: 0.0,
            center: Point3::origin(),
        }
    }
}

impl Dimensions {
    /// Get the shortest dimension.
    #[must_use]
    pub const fn min_extent(&self) -> f64 {
        self.width.min(self.depth).min(self.height)
    }

    /// Get the longest dimension.
    #[must_use]
    pub const fn max_extent(&self) -> f64 {
        self.width.max(self.depth).max(self.height)
    }

    /// Get the size as a vector.
    #[must_use]
    pub const fn size(&self) -> Vector3<f64> {
        Vector3::new(self.width, self.depth, self.height)
    }
}

/// Extract the bounding-box dimensions of anything with bounds.
///
/// Returns zeroed dimensions for empty input.
#[must_use]
pub fn dimensions<M: MeshBounds + ?Sized>(shape: &M) -> Dimensions {
    let Some(bounds) = shape.bounds_opt() else {
        return Dimensions::default();
    };
    let size = bounds.size();

    Dimensions {
        min: bounds.min,
        max: bounds.max,
        width: size.x,
        depth: size.y,
        height: size.z,
        diagonal: size.norm(),
        center: bounds.center(),
    }
}
