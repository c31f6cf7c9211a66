//! Detection records produced by greedy extraction.

use mesh_types::{Aabb, Point3, Vector3};
use nalgebra::Vector2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cylinder::Cylinder;
use crate::orientation::PlaneOrientation;
use crate::plane::Plane;

/// A plane extracted from a point cloud.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaneDetection {
    /// Coefficients `[a, b, c, d]` with `a·x + b·y + c·z + d = 0`.
    pub equation: [f64; 4],
    /// Unit normal `(a, b, c)`. The sign is not canonicalized.
    pub normal: Vector3<f64>,
    /// Number of supporting points.
    pub inlier_count: usize,
    /// Mean of the supporting points.
    pub centroid: Point3<f64>,
    /// Bounding box of the supporting points.
    pub bounds: Aabb,
    /// Indices of the supporting points in the source cloud.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub inliers: Vec<usize>,
}

impl PlaneDetection {
    /// Orientation label of the normal.
    #[must_use]
    pub fn orientation(&self) -> PlaneOrientation {
        PlaneOrientation::classify(&self.normal)
    }

    /// Extent of the supporting points in X and Y.
    #[must_use]
    pub fn size_xy(&self) -> Vector2<f64> {
        let size = self.bounds.size();
        Vector2::new(size.x, size.y)
    }
}

/// A cylinder extracted from a point cloud.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CylinderDetection {
    /// A point on the axis.
    pub center: Point3<f64>,
    /// Unit axis direction.
    pub axis: Vector3<f64>,
    /// Radius, never negative.
    pub radius: f64,
    /// Number of supporting points.
    pub inlier_count: usize,
    /// Lowest Z among the supporting points.
    pub z_min: f64,
    /// Highest Z among the supporting points.
    pub z_max: f64,
    /// `z_max - z_min`.
    pub height: f64,
    /// Indices of the supporting points in the source cloud.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub inliers: Vec<usize>,
}

impl CylinderDetection {
    /// Diameter (twice the radius).
    #[must_use]
    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }
}

/// Any detection, tagged by primitive kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Detection {
    /// A plane.
    Plane(PlaneDetection),
    /// A cylinder.
    Cylinder(CylinderDetection),
}

impl Detection {
    /// Number of supporting points.
    #[must_use]
    pub fn inlier_count(&self) -> usize {
        match self {
            Self::Plane(p) => p.inlier_count,
            Self::Cylinder(c) => c.inlier_count,
        }
    }
}

impl From<PlaneDetection> for Detection {
    fn from(d: PlaneDetection) -> Self {
        Self::Plane(d)
    }
}

impl From<CylinderDetection> for Detection {
    fn from(d: CylinderDetection) -> Self {
        Self::Cylinder(d)
    }
}

/// Turns a fitted model plus its supporting points into a detection record.
pub trait Describe {
    /// The detection record type.
    type Detection;

    /// Build the detection from the inlier points and their source indices.
    ///
    /// `points` and `source_indices` are parallel and non-empty.
    fn describe(&self, points: &[Point3<f64>], source_indices: Vec<usize>) -> Self::Detection;
}

impl Describe for Plane {
    type Detection = PlaneDetection;

    #[allow(clippy::cast_precision_loss)]
    // Precision loss: point counts beyond 2^52 are unsupported
    fn describe(&self, points: &[Point3<f64>], source_indices: Vec<usize>) -> PlaneDetection {
        let sum = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
        let centroid = if points.is_empty() {
            self.point
        } else {
            Point3::from(sum / points.len() as f64)
        };

        PlaneDetection {
            equation: self.equation(),
            normal: self.normal,
            inlier_count: source_indices.len(),
            centroid,
            bounds: Aabb::from_points(points.iter()),
            inliers: source_indices,
        }
    }
}

impl Describe for Cylinder {
    type Detection = CylinderDetection;

    fn describe(&self, points: &[Point3<f64>], source_indices: Vec<usize>) -> CylinderDetection {
        let (z_min, z_max) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.z), hi.max(p.z))
            });
        let (z_min, z_max) = if z_min <= z_max {
            (z_min, z_max)
        } else {
            (self.center.z, self.center.z)
        };

        CylinderDetection {
            center: self.center,
            axis: self.axis,
            radius: self.radius,
            inlier_count: source_indices.len(),
            z_min,
            z_max,
            height: z_max - z_min,
            inliers: source_indices,
        }
    }
}
