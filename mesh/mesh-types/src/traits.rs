//! Traits shared by meshes and point clouds.

use crate::Aabb;

/// Anything whose points have axis-aligned bounds.
pub trait MeshBounds {
    /// Bounds of all points; [`Aabb::empty`] when there are none.
    fn bounds(&self) -> Aabb;

    /// Bounds of all points, or `None` when there are none.
    fn bounds_opt(&self) -> Option<Aabb> {
        Some(self.bounds()).filter(|b| !b.is_empty())
    }
}
