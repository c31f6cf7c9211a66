//! Plane representation for surface fitting.

use nalgebra::{Matrix3, Point3, Vector3};

/// A plane in 3D space defined by a point and normal.
///
/// The plane equation is `normal · (p - point) = 0`, or in coefficient form
/// `a·x + b·y + c·z + d = 0` (see [`Plane::equation`]).
///
/// The sign of the normal is whatever the construction produced. It is not
/// canonicalized, so callers classify by component magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub point: Point3<f64>,
    /// The plane normal (unit vector).
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a new plane from a point and normal.
    ///
    /// The normal is normalized. Returns `None` for a zero normal.
    #[must_use]
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Option<Self> {
        let normal = normal.try_normalize(f64::EPSILON)?;
        Some(Self { point, normal })
    }

    /// Create a plane from three points.
    ///
    /// The normal is `(p1 - p0) × (p2 - p0)`, normalized. Returns `None` if
    /// the points are collinear.
    #[must_use]
    pub fn from_points(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Option<Self> {
        Self::new(*p0, (p1 - p0).cross(&(p2 - p0)))
    }

    /// Least-squares plane through a set of points.
    ///
    /// The normal is the eigenvector of the covariance matrix with the
    /// smallest eigenvalue. Returns `None` for fewer than three points.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    // Precision loss: point counts beyond 2^52 are unsupported
    pub fn least_squares<'a>(points: impl Iterator<Item = &'a Point3<f64>> + Clone) -> Option<Self> {
        let count = points.clone().count();
        if count < 3 {
            return None;
        }

        let centroid = points.clone().fold(Vector3::zeros(), |acc, p| acc + p.coords) / count as f64;
        let covariance = points.fold(Matrix3::zeros(), |acc, p| {
            let d = p.coords - centroid;
            acc + d * d.transpose()
        });

        let eigen = covariance.symmetric_eigen();
        let smallest = eigen.eigenvalues.imin();
        Self::new(Point3::from(centroid), eigen.eigenvectors.column(smallest).into_owned())
    }

    /// Compute the signed distance from a point to the plane.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.point))
    }

    /// Compute the absolute distance from a point to the plane.
    #[must_use]
    pub fn distance(&self, point: &Point3<f64>) -> f64 {
        self.signed_distance(point).abs()
    }

    /// Check if a point is within a given distance threshold of the plane.
    #[must_use]
    pub fn is_inlier(&self, point: &Point3<f64>, threshold: f64) -> bool {
        self.distance(point) <= threshold
    }

    /// Plane coefficients `[a, b, c, d]` with `a·x + b·y + c·z + d = 0`.
    ///
    /// `(a, b, c)` is the unit normal.
    #[must_use]
    pub fn equation(&self) -> [f64; 4] {
        [
            self.normal.x,
            self.normal.y,
            self.normal.z,
            -self.normal.dot(&self.point.coords),
        ]
    }
}
