//! Point cloud built from mesh vertices.

use crate::{Aabb, IndexedMesh, MeshBounds};
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An unordered set of 3D points sampled from a mesh's vertices.
///
/// A cloud built with [`PointCloud::from_mesh`] holds every distinct triangle
/// corner exactly once, sorted lexicographically by `(x, y, z)` so the same
/// mesh always produces the same point order.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, PointCloud, Point3};
///
/// let mut mesh = IndexedMesh::new();
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(1.0, 0.0, 0.0);
/// mesh.push_triangle(a, b, Point3::new(0.0, 1.0, 0.0));
/// mesh.push_triangle(a, b, Point3::new(0.0, -1.0, 0.0));
///
/// // Shared corners are stored once
/// let cloud = PointCloud::from_mesh(&mesh);
/// assert_eq!(cloud.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointCloud {
    /// The points in this cloud.
    pub points: Vec<Point3<f64>>,
}

impl PointCloud {
    /// Create an empty point cloud.
    #[must_use]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a point cloud from points, keeping their order and duplicates.
    #[must_use]
    pub const fn from_points(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    /// Flatten the triangle corners of a mesh into a deduplicated cloud.
    ///
    /// Two corners are duplicates when all three coordinates are equal,
    /// which is how STL writers repeat shared vertices. `-0.0` and `0.0`
    /// count as the same coordinate.
    #[must_use]
    pub fn from_mesh(mesh: &IndexedMesh) -> Self {
        let mut points: Vec<Point3<f64>> = mesh
            .corner_positions()
            .map(|p| p.map(canonical_zero))
            .collect();
        points.sort_by(|a, b| {
            a.x.total_cmp(&b.x)
                .then(a.y.total_cmp(&b.y))
                .then(a.z.total_cmp(&b.z))
        });
        points.dedup_by(|a, b| {
            a.x.to_bits() == b.x.to_bits()
                && a.y.to_bits() == b.y.to_bits()
                && a.z.to_bits() == b.z.to_bits()
        });
        Self { points }
    }

    /// Number of points.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the cloud has no points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the Z coordinates of all points.
    pub fn z_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.z)
    }
}

/// Map `-0.0` to `0.0` and leave every other value unchanged.
#[inline]
fn canonical_zero(c: f64) -> f64 {
    c + 0.0
}

impl MeshBounds for PointCloud {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.points.iter())
    }
}

impl From<Vec<Point3<f64>>> for PointCloud {
    fn from(points: Vec<Point3<f64>>) -> Self {
        Self::from_points(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_triangle_mesh() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        mesh.push_triangle(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 5.0, 0.0),
        );
        mesh.push_triangle(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 5.0, 0.0),
            Point3::new(0.0, 5.0, 2.0),
        );
        mesh
    }

    #[test]
    fn from_mesh_deduplicates_shared_corners() {
        let cloud = PointCloud::from_mesh(&two_triangle_mesh());
        assert_eq!(cloud.len(), 4);
    }

    #[test]
    fn from_mesh_is_sorted() {
        let cloud = PointCloud::from_mesh(&two_triangle_mesh());
        let xs: Vec<f64> = cloud.points.iter().map(|p| p.x).collect();
        assert!(xs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn from_empty_mesh() {
        let cloud = PointCloud::from_mesh(&IndexedMesh::new());
        assert!(cloud.is_empty());
        assert!(cloud.bounds_opt().is_none());
    }

    #[test]
    fn bounds_cover_all_points() {
        let cloud = PointCloud::from_mesh(&two_triangle_mesh());
        let bounds = cloud.bounds();
        assert_relative_eq!(bounds.size().x, 10.0);
        assert_relative_eq!(bounds.size().y, 5.0);
        assert_relative_eq!(bounds.size().z, 2.0);
    }

    #[test]
    fn signed_zero_corners_are_one_point() {
        let mut mesh = IndexedMesh::new();
        mesh.push_triangle(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        );
        mesh.push_triangle(
            Point3::new(-0.0, 0.0, -0.0),
            Point3::new(0.0, 3.0, 0.0),
            Point3::new(-4.0, 0.0, 0.0),
        );

        let cloud = PointCloud::from_mesh(&mesh);
        assert_eq!(cloud.len(), 4);
        assert!(cloud.points.iter().all(|p| !p.x.is_sign_negative() || p.x < 0.0));
        assert_eq!(
            cloud.points.iter().filter(|p| p.x == 0.0 && p.y == 0.0).count(),
            1
        );
    }
}
