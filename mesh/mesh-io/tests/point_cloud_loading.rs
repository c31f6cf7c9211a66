//! Loading STL files from disk into point clouds.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs::File;
use std::io::Write;

use approx::assert_relative_eq;
use mesh_io::{IoError, load_point_cloud, write_stl_binary};
use mesh_types::{IndexedMesh, MeshBounds, Point3};
use tempfile::tempdir;

/// Axis-aligned box with two triangles per side, corners shared between faces.
fn box_mesh(x: f64, y: f64, z: f64) -> IndexedMesh {
    let c = |i: usize| {
        Point3::new(
            if i & 1 == 0 { 0.0 } else { x },
            if i & 2 == 0 { 0.0 } else { y },
            if i & 4 == 0 { 0.0 } else { z },
        )
    };
    let quads = [
        [0, 2, 3, 1],
        [4, 5, 7, 6],
        [0, 1, 5, 4],
        [2, 6, 7, 3],
        [0, 4, 6, 2],
        [1, 3, 7, 5],
    ];
    let mut mesh = IndexedMesh::new();
    for [a, b, cc, d] in quads {
        mesh.push_triangle(c(a), c(b), c(cc));
        mesh.push_triangle(c(a), c(cc), c(d));
    }
    mesh
}

#[test]
fn binary_box_dedups_to_eight_corners() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("box.stl");
    write_stl_binary(&box_mesh(58.0, 36.5, 6.75), File::create(&path).unwrap()).unwrap();

    let cloud = load_point_cloud(&path).unwrap();
    assert_eq!(cloud.len(), 8);

    let size = cloud.bounds().size();
    assert_relative_eq!(size.x, 58.0, epsilon = 1e-4);
    assert_relative_eq!(size.y, 36.5, epsilon = 1e-4);
    assert_relative_eq!(size.z, 6.75, epsilon = 1e-4);
}

#[test]
fn ascii_file_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tri.stl");
    let mut file = File::create(&path).unwrap();
    writeln!(
        file,
        "solid tri\n facet normal 0 0 1\n  outer loop\n   vertex 0 0 0\n   vertex 2 0 0\n   vertex 0 2 0\n  endloop\n endfacet\nendsolid tri"
    )
    .unwrap();
    drop(file);

    let cloud = load_point_cloud(&path).unwrap();
    assert_eq!(cloud.len(), 3);
}

#[test]
fn missing_file_is_reported() {
    let dir = tempdir().unwrap();
    let result = load_point_cloud(dir.path().join("absent.stl"));
    assert!(matches!(result, Err(IoError::FileNotFound { .. })));
}
