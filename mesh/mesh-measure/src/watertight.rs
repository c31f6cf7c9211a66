//! Closed-surface check for triangle meshes.

use hashbrown::HashMap;
use mesh_types::{IndexedMesh, Point3};

/// Position key of a vertex; `-0.0` and `0.0` share a key.
type PositionKey = [u64; 3];

fn position_key(p: &Point3<f64>) -> PositionKey {
    [
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    ]
}

/// Check whether a mesh encloses a volume.
///
/// Vertices are matched by position, so unshared STL corners still connect.
/// The mesh is watertight when every edge is used by exactly two faces.
/// An empty mesh is not watertight.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Point3};
/// use mesh_measure::is_watertight;
///
/// let mut mesh = IndexedMesh::new();
/// mesh.push_triangle(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
/// assert!(!is_watertight(&mesh));
/// ```
#[must_use]
pub fn is_watertight(mesh: &IndexedMesh) -> bool {
    let mut edge_faces: HashMap<(PositionKey, PositionKey), u32> = HashMap::new();

    for face in mesh.faces.iter().filter_map(|&f| mesh.face_corners(f)) {
        let keys = face.map(|p| position_key(&p));
        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            let edge = if keys[i] <= keys[j] {
                (keys[i], keys[j])
            } else {
                (keys[j], keys[i])
            };
            *edge_faces.entry(edge).or_insert(0) += 1;
        }
    }

    !edge_faces.is_empty() && edge_faces.values().all(|&n| n == 2)
}
