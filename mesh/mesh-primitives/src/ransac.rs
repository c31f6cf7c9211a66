//! RANSAC plane and cylinder fitting.
//!
//! Robustly fits a primitive to noisy point data by iteratively
//! sampling minimal sets and keeping the model with the largest consensus.

use nalgebra::Point3;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::debug;

use crate::cylinder::Cylinder;
use crate::error::{PrimitiveError, PrimitiveResult};
use crate::fit::{Fit, PrimitiveFitter};
use crate::plane::Plane;

/// Configuration for a RANSAC fitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RansacConfig {
    /// Maximum number of sampled hypotheses per fit.
    pub max_iterations: usize,
    /// Optional seed for reproducible results.
    pub seed: Option<u64>,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            seed: None,
        }
    }
}

impl RansacConfig {
    /// Create a new RANSAC configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of iterations.
    #[must_use]
    pub const fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set a random seed for reproducibility.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}

/// RANSAC plane fitter.
///
/// Hypotheses come from three random points. The winning plane is refined by
/// a least-squares fit over its inliers, and the refinement is kept when it
/// supports at least as many points.
///
/// # Example
///
/// ```
/// use mesh_primitives::{PrimitiveFitter, RansacConfig, RansacPlane};
/// use nalgebra::Point3;
///
/// let points: Vec<Point3<f64>> = (0..10)
///     .flat_map(|i| (0..10).map(move |j| Point3::new(f64::from(i), f64::from(j), 0.0)))
///     .collect();
///
/// let mut fitter = RansacPlane::new(RansacConfig::new().with_seed(42));
/// let fit = fitter.fit(&points, 0.1).unwrap();
///
/// // Normal should be approximately ±Z
/// assert!(fit.model.normal.z.abs() > 0.99);
/// assert_eq!(fit.inliers.len(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct RansacPlane {
    config: RansacConfig,
    rng: StdRng,
}

impl RansacPlane {
    /// Create a plane fitter.
    #[must_use]
    pub fn new(config: RansacConfig) -> Self {
        let rng = config.rng();
        Self { config, rng }
    }

    /// The fitter configuration.
    #[must_use]
    pub const fn config(&self) -> &RansacConfig {
        &self.config
    }
}

impl Default for RansacPlane {
    fn default() -> Self {
        Self::new(RansacConfig::default())
    }
}

impl PrimitiveFitter for RansacPlane {
    type Model = Plane;

    fn fit(&mut self, points: &[Point3<f64>], threshold: f64) -> PrimitiveResult<Fit<Plane>> {
        let best = consensus(
            &mut self.rng,
            self.config.max_iterations,
            points,
            |a, b, c| Plane::from_points(a, b, c),
            |plane, p| plane.is_inlier(p, threshold),
        )?;

        let refined = Plane::least_squares(best.inliers.iter().map(|&i| &points[i]))
            .map(|plane| Fit {
                inliers: inliers_of(points, |p| plane.is_inlier(p, threshold)),
                model: plane,
            });

        Ok(match refined {
            Some(refined) if refined.inliers.len() >= best.inliers.len() => refined,
            _ => best,
        })
    }
}

/// RANSAC cylinder fitter.
///
/// Each hypothesis is built from three random points: the axis is the normal
/// of their plane, and the center and radius are those of their
/// circumcircle.
#[derive(Debug, Clone)]
pub struct RansacCylinder {
    config: RansacConfig,
    rng: StdRng,
}

impl RansacCylinder {
    /// Create a cylinder fitter.
    #[must_use]
    pub fn new(config: RansacConfig) -> Self {
        let rng = config.rng();
        Self { config, rng }
    }

    /// The fitter configuration.
    #[must_use]
    pub const fn config(&self) -> &RansacConfig {
        &self.config
    }
}

impl Default for RansacCylinder {
    fn default() -> Self {
        Self::new(RansacConfig::default())
    }
}

impl PrimitiveFitter for RansacCylinder {
    type Model = Cylinder;

    fn fit(&mut self, points: &[Point3<f64>], threshold: f64) -> PrimitiveResult<Fit<Cylinder>> {
        consensus(
            &mut self.rng,
            self.config.max_iterations,
            points,
            |a, b, c| Cylinder::from_points(a, b, c),
            |cylinder, p| cylinder.is_inlier(p, threshold),
        )
    }
}

fn inliers_of(points: &[Point3<f64>], is_inlier: impl Fn(&Point3<f64>) -> bool) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| is_inlier(p))
        .map(|(i, _)| i)
        .collect()
}

/// Core sampling loop shared by all three-point hypotheses.
fn consensus<M>(
    rng: &mut StdRng,
    max_iterations: usize,
    points: &[Point3<f64>],
    hypothesise: impl Fn(&Point3<f64>, &Point3<f64>, &Point3<f64>) -> Option<M>,
    is_inlier: impl Fn(&M, &Point3<f64>) -> bool,
) -> PrimitiveResult<Fit<M>> {
    let n = points.len();

    if n < 3 {
        return Err(PrimitiveError::InsufficientPoints {
            required: 3,
            actual: n,
        });
    }

    let mut best: Option<Fit<M>> = None;
    let mut iterations_used = 0;

    for iteration in 0..max_iterations {
        iterations_used = iteration + 1;

        // Sample 3 random distinct points
        let i0 = rng.gen_range(0..n);
        let mut i1 = rng.gen_range(0..n);
        while i1 == i0 {
            i1 = rng.gen_range(0..n);
        }
        let mut i2 = rng.gen_range(0..n);
        while i2 == i0 || i2 == i1 {
            i2 = rng.gen_range(0..n);
        }

        let Some(candidate) = hypothesise(&points[i0], &points[i1], &points[i2]) else {
            continue; // Degenerate sample, try again
        };

        let inliers = inliers_of(points, |p| is_inlier(&candidate, p));

        if best.as_ref().is_none_or(|b| inliers.len() > b.inliers.len()) {
            let count = inliers.len();
            best = Some(Fit {
                model: candidate,
                inliers,
            });

            // Early termination once the model explains almost everything
            if count >= n * 9 / 10 {
                break;
            }
        }
    }

    let best = best.ok_or(PrimitiveError::NoConsensus {
        iterations: iterations_used,
    })?;

    debug!(
        iterations = iterations_used,
        points = n,
        inliers = best.inliers.len(),
        "RANSAC consensus"
    );

    Ok(best)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid_plane(z: f64) -> Vec<Point3<f64>> {
        (0..10)
            .flat_map(|i| (0..10).map(move |j| Point3::new(f64::from(i), f64::from(j), z)))
            .collect()
    }

    fn ring(cx: f64, cy: f64, r: f64, z_levels: &[f64], count: usize) -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        for &z in z_levels {
            for k in 0..count {
                #[allow(clippy::cast_precision_loss)]
                let angle = std::f64::consts::TAU * k as f64 / count as f64;
                points.push(Point3::new(cx + r * angle.cos(), cy + r * angle.sin(), z));
            }
        }
        points
    }

    #[test]
    fn plane_with_outliers() {
        let mut points = grid_plane(5.0);
        points.push(Point3::new(3.0, 3.0, 20.0));
        points.push(Point3::new(-4.0, 8.0, -9.0));

        let mut fitter = RansacPlane::new(RansacConfig::new().with_seed(7));
        let fit = fitter.fit(&points, 0.1).unwrap();

        assert_eq!(fit.inlier_count(), 100);
        assert!(!fit.inliers.contains(&100));
        assert!(!fit.inliers.contains(&101));
        let [_, _, c, d] = fit.model.equation();
        assert_relative_eq!((d / c).abs(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn plane_insufficient_points() {
        let points = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let result = RansacPlane::default().fit(&points, 0.1);
        assert!(matches!(
            result,
            Err(PrimitiveError::InsufficientPoints {
                required: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn collinear_points_no_consensus() {
        let points: Vec<Point3<f64>> = (0..10).map(|i| Point3::new(f64::from(i), 0.0, 0.0)).collect();
        let mut fitter = RansacPlane::new(RansacConfig::new().with_seed(1).with_max_iterations(50));
        assert!(matches!(
            fitter.fit(&points, 0.1),
            Err(PrimitiveError::NoConsensus { iterations: 50 })
        ));

        let mut fitter = RansacCylinder::new(RansacConfig::new().with_seed(1).with_max_iterations(50));
        assert!(matches!(
            fitter.fit(&points, 0.1),
            Err(PrimitiveError::NoConsensus { .. })
        ));
    }

    #[test]
    fn cylinder_from_single_ring() {
        let points = ring(4.0, -2.0, 1.5, &[3.0], 24);
        let mut fitter = RansacCylinder::new(RansacConfig::new().with_seed(11));
        let fit = fitter.fit(&points, 0.08).unwrap();

        // Every sample lies on the ring, so the first hypothesis explains all of it
        assert_eq!(fit.inlier_count(), 24);
        assert_relative_eq!(fit.model.radius, 1.5, epsilon = 1e-9);
        assert_relative_eq!(fit.model.center.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(fit.model.center.y, -2.0, epsilon = 1e-9);
    }

    #[test]
    fn seeded_fits_are_reproducible() {
        let mut points = grid_plane(0.0);
        points.extend(grid_plane(3.0));

        let first = RansacPlane::new(RansacConfig::new().with_seed(99))
            .fit(&points, 0.1)
            .unwrap();
        let second = RansacPlane::new(RansacConfig::new().with_seed(99))
            .fit(&points, 0.1)
            .unwrap();
        assert_eq!(first.inliers, second.inliers);
        assert_eq!(first.inlier_count(), 100);
    }
}
