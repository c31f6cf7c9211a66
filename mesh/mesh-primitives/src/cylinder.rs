//! Cylinder representation for hole and post fitting.

use nalgebra::{Point3, Vector3};

/// An infinite cylinder: an axis line through `center` and a radius.
///
/// Cylinders are hypothesised from three surface samples: the axis is the
/// normal of the plane through the samples and `center` is their
/// circumcenter. Three vertices from the same circular edge of a hole
/// therefore give the hole's axis and radius exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// A point on the axis.
    pub center: Point3<f64>,
    /// Axis direction (unit vector).
    pub axis: Vector3<f64>,
    /// Radius.
    pub radius: f64,
}

impl Cylinder {
    /// Create a cylinder, normalizing the axis.
    ///
    /// Returns `None` for a zero axis or a negative or non-finite radius.
    #[must_use]
    pub fn new(center: Point3<f64>, axis: Vector3<f64>, radius: f64) -> Option<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return None;
        }
        let axis = axis.try_normalize(f64::EPSILON)?;
        Some(Self {
            center,
            axis,
            radius,
        })
    }

    /// Hypothesise a cylinder from three surface points.
    ///
    /// Returns `None` if the points are (nearly) collinear.
    #[must_use]
    pub fn from_points(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Option<Self> {
        let u = p1 - p0;
        let v = p2 - p0;
        let w = u.cross(&v);
        let w_sq = w.norm_squared();
        if w_sq < f64::EPSILON {
            return None;
        }

        // Circumcenter of the triangle, expressed relative to p0
        let offset = (v.cross(&w) * u.norm_squared() + w.cross(&u) * v.norm_squared()) / (2.0 * w_sq);
        let center = p0 + offset;
        Self::new(center, w, offset.norm())
    }

    /// Distance from a point to the cylinder axis line.
    #[must_use]
    pub fn axis_distance(&self, point: &Point3<f64>) -> f64 {
        let d = point - self.center;
        (d - self.axis * d.dot(&self.axis)).norm()
    }

    /// Distance from a point to the cylinder surface.
    #[must_use]
    pub fn distance(&self, point: &Point3<f64>) -> f64 {
        (self.axis_distance(point) - self.radius).abs()
    }

    /// Check if a point is within a given distance threshold of the surface.
    #[must_use]
    pub fn is_inlier(&self, point: &Point3<f64>, threshold: f64) -> bool {
        self.distance(point) <= threshold
    }

    /// Diameter (twice the radius).
    #[must_use]
    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }
}
