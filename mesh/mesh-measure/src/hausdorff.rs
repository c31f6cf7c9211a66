//! Hausdorff distance between point clouds.
//!
//! Used to check a rebuilt part against its reference mesh: every point of
//! each cloud must lie within the tolerance of some point of the other.

use kiddo::{KdTree, SquaredEuclidean};
use mesh_types::{Point3, PointCloud};
use nalgebra::Rotation3;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MeasureError, MeasureResult};

/// Directed and symmetric Hausdorff distances between two clouds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HausdorffDistance {
    /// Largest distance from a point of the first cloud to the second.
    pub forward: f64,
    /// Largest distance from a point of the second cloud to the first.
    pub backward: f64,
    /// `max(forward, backward)`.
    pub symmetric: f64,
}

impl HausdorffDistance {
    /// Check the symmetric distance against a tolerance (inclusive).
    #[must_use]
    pub fn passes(&self, tolerance: f64) -> bool {
        self.symmetric <= tolerance
    }
}

/// Rotation applied to both clouds before indexing.
///
/// A kd-tree bucket cannot be split when more points than it holds share
/// one axis value, which flat CAD walls do. Under this rotation no wall is
/// axis-aligned, and distances are unchanged.
fn index_frame() -> Rotation3<f64> {
    Rotation3::from_euler_angles(0.613, 0.377, 0.891)
}

/// Rotate points into the index frame.
fn to_frame(points: &[Point3<f64>], frame: &Rotation3<f64>) -> Vec<[f64; 3]> {
    points
        .iter()
        .map(|p| {
            let q = frame * p;
            [q.x, q.y, q.z]
        })
        .collect()
}

/// Nearest-neighbour index over rotated points.
///
/// Repeated points are inserted once; they would otherwise share every axis
/// value.
fn build_tree(points: &[[f64; 3]]) -> KdTree<f64, 3> {
    let mut unique = points.to_vec();
    unique.sort_by(|a, b| {
        a[0].total_cmp(&b[0])
            .then(a[1].total_cmp(&b[1]))
            .then(a[2].total_cmp(&b[2]))
    });
    unique.dedup();

    let mut tree: KdTree<f64, 3> = KdTree::new();
    for (i, p) in unique.iter().enumerate() {
        tree.add(p, i as u64);
    }
    tree
}

fn directed(from: &[[f64; 3]], to: &KdTree<f64, 3>) -> f64 {
    from.iter()
        .map(|p| to.nearest_one::<SquaredEuclidean>(p).distance)
        .fold(0.0_f64, f64::max)
        .sqrt()
}

/// Compute the Hausdorff distance between two clouds.
///
/// # Errors
///
/// Returns [`MeasureError::EmptyCloud`] if either cloud has no points.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, PointCloud};
/// use mesh_measure::hausdorff;
///
/// let a = PointCloud::from_points(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)]);
/// let b = PointCloud::from_points(vec![Point3::new(0.0, 0.0, 0.0)]);
///
/// let d = hausdorff(&a, &b).unwrap();
/// assert!((d.forward - 1.0).abs() < 1e-12);
/// assert!(d.backward.abs() < 1e-12);
/// assert!(d.passes(1.0));
/// ```
pub fn hausdorff(a: &PointCloud, b: &PointCloud) -> MeasureResult<HausdorffDistance> {
    if a.is_empty() || b.is_empty() {
        return Err(MeasureError::empty_cloud());
    }

    let frame = index_frame();
    let rotated_a = to_frame(&a.points, &frame);
    let rotated_b = to_frame(&b.points, &frame);

    let forward = directed(&rotated_a, &build_tree(&rotated_b));
    let backward = directed(&rotated_b, &build_tree(&rotated_a));
    let result = HausdorffDistance {
        forward,
        backward,
        symmetric: forward.max(backward),
    };

    debug!(
        points_a = a.len(),
        points_b = b.len(),
        forward,
        backward,
        "Computed Hausdorff distance"
    );
    Ok(result)
}
