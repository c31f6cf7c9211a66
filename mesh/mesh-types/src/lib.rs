//! Core mesh and point cloud types.
//!
//! This crate provides the foundational types shared by the analysis crates:
//!
//! - [`Vertex`] - A point in 3D space
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`PointCloud`] - Deduplicated vertex positions of a mesh
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in
//! CLI tools, servers and test harnesses alike.
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//! The analysis tools built on top assume millimeters.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**:
//! - X: width (left/right)
//! - Y: depth (front/back)
//! - Z: height (up/down)
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, PointCloud, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! let cloud = PointCloud::from_mesh(&mesh);
//! assert_eq!(cloud.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod mesh;
mod pointcloud;
mod traits;
mod vertex;

pub use bounds::Aabb;
pub use mesh::IndexedMesh;
pub use pointcloud::PointCloud;
pub use traits::MeshBounds;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
