//! Uniform point sampling over a mesh surface.
//!
//! Vertex clouds depend on how a surface was triangulated. Samples drawn
//! uniformly by area do not, so two meshes of the same part can be compared
//! point to point.

use mesh_types::{IndexedMesh, Point3, PointCloud};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::debug;

use crate::error::{MeasureError, MeasureResult};

/// Parameters for [`sample_surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleParams {
    /// Number of points to draw.
    pub count: usize,
    /// Random seed. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            count: 10_000,
            seed: None,
        }
    }
}

impl SampleParams {
    /// Set the number of points.
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set the random seed for reproducible samples.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Draw points uniformly over the area of a mesh.
///
/// A triangle is picked with probability proportional to its area, then a
/// point is drawn uniformly inside it. Faces with zero area or dangling
/// indices never receive samples.
///
/// # Errors
///
/// Returns [`MeasureError::InvalidParams`] if `count` is zero, and
/// [`MeasureError::NoSurface`] if no face has a positive area.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Point3};
/// use mesh_measure::{SampleParams, sample_surface};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.push_triangle(
///     Point3::new(0.0, 0.0, 2.0),
///     Point3::new(4.0, 0.0, 2.0),
///     Point3::new(0.0, 4.0, 2.0),
/// );
///
/// let cloud = sample_surface(&mesh, &SampleParams::default().with_count(50).with_seed(7)).unwrap();
/// assert_eq!(cloud.len(), 50);
/// assert!(cloud.points.iter().all(|p| p.x + p.y <= 4.0 + 1e-9 && p.z == 2.0));
/// ```
pub fn sample_surface(mesh: &IndexedMesh, params: &SampleParams) -> MeasureResult<PointCloud> {
    if params.count == 0 {
        return Err(MeasureError::InvalidParams {
            name: "sample count",
            value: 0.0,
        });
    }

    let triangles: Vec<[Point3<f64>; 3]> = mesh
        .faces
        .iter()
        .filter_map(|&face| mesh.face_corners(face))
        .filter(|t| triangle_area(t) > 0.0)
        .collect();
    let areas: Vec<f64> = triangles.iter().map(triangle_area).collect();

    let picker = WeightedIndex::new(&areas).map_err(|_| MeasureError::NoSurface)?;
    let mut rng = params
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let points = (0..params.count)
        .map(|_| {
            let [a, b, c] = triangles[picker.sample(&mut rng)];
            let mut r1: f64 = rng.r#gen();
            let mut r2: f64 = rng.r#gen();
            // Fold the far half of the parallelogram back into the triangle
            if r1 + r2 > 1.0 {
                r1 = 1.0 - r1;
                r2 = 1.0 - r2;
            }
            a + (b - a) * r1 + (c - a) * r2
        })
        .collect();

    debug!(
        faces = triangles.len(),
        samples = params.count,
        area = areas.iter().sum::<f64>(),
        "Sampled mesh surface"
    );
    Ok(PointCloud::from_points(points))
}

fn triangle_area([a, b, c]: &[Point3<f64>; 3]) -> f64 {
    (b - a).cross(&(c - a)).norm() * 0.5
}
