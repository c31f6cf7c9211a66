//! Indexed triangle mesh.

use crate::{Aabb, MeshBounds, Vertex};
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Stores vertices and faces separately, with faces referencing vertices
/// by index. Meshes read from STL have three unshared vertices per face.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Append a triangle given by three corner positions.
    ///
    /// The corners are stored as three new vertices, the way STL stores them.
    pub fn push_triangle(&mut self, a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) {
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
        let base = self.vertices.len() as u32;
        self.vertices.push(Vertex::new(a));
        self.vertices.push(Vertex::new(b));
        self.vertices.push(Vertex::new(c));
        self.faces.push([base, base + 1, base + 2]);
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangular faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Resolve the three corner positions of a face.
    ///
    /// Returns `None` if the face references an out-of-range vertex.
    #[must_use]
    pub fn face_corners(&self, face: [u32; 3]) -> Option<[Point3<f64>; 3]> {
        Some([
            self.vertices.get(face[0] as usize)?.position,
            self.vertices.get(face[1] as usize)?.position,
            self.vertices.get(face[2] as usize)?.position,
        ])
    }

    /// Iterate over the corner positions of every face, three per face.
    ///
    /// Faces referencing out-of-range vertices are skipped.
    pub fn corner_positions(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.faces
            .iter()
            .filter_map(|&face| self.face_corners(face))
            .flatten()
    }

    /// Signed enclosed volume.
    ///
    /// Sums the tetrahedra spanned by the origin and each face. Positive for
    /// a closed mesh with outward (counter-clockwise) winding. Meaningless
    /// for open meshes.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let sum: f64 = self
            .faces
            .iter()
            .filter_map(|&face| self.face_corners(face))
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
            .sum();
        sum / 6.0
    }

    /// Absolute enclosed volume.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}
