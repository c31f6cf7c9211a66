//! Fitting capability interface.
//!
//! The extractor only needs "fit one model to these points and tell me which
//! points support it". Anything that can answer that implements
//! [`PrimitiveFitter`], so alternative consensus algorithms plug into
//! [`extract_greedy`](crate::extract_greedy) without changes to the
//! extraction loop.

use nalgebra::Point3;

use crate::error::PrimitiveResult;

/// A fitted model together with the points that support it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fit<M> {
    /// The fitted model.
    pub model: M,
    /// Indices into the slice passed to [`PrimitiveFitter::fit`].
    pub inliers: Vec<usize>,
}

impl<M> Fit<M> {
    /// Number of supporting points.
    #[must_use]
    pub fn inlier_count(&self) -> usize {
        self.inliers.len()
    }
}

/// Fits a single primitive to a point set.
///
/// Implementations may keep internal state such as a random number
/// generator, hence `&mut self`.
pub trait PrimitiveFitter {
    /// The geometric model produced by this fitter.
    type Model;

    /// Fit one model to `points`, classifying points within `threshold` of
    /// the model surface as inliers.
    ///
    /// # Errors
    ///
    /// Returns an error if no model can be derived from the points, for
    /// example because there are too few of them or every sample was
    /// degenerate.
    fn fit(&mut self, points: &[Point3<f64>], threshold: f64)
    -> PrimitiveResult<Fit<Self::Model>>;
}

impl<F: PrimitiveFitter + ?Sized> PrimitiveFitter for &mut F {
    type Model = F::Model;

    fn fit(
        &mut self,
        points: &[Point3<f64>],
        threshold: f64,
    ) -> PrimitiveResult<Fit<Self::Model>> {
        (**self).fit(points, threshold)
    }
}
