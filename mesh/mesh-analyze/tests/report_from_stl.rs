//! End-to-end report tests on STL fixtures written to temporary files.

#![allow(clippy::unwrap_used)]

use std::f64::consts::TAU;
use std::fs::File;
use std::path::Path;

use approx::assert_relative_eq;
use mesh_analyze::{
    AnalysisConfig, ComparisonParams, LoadedMesh, PassOutcome, analyze, compare, write_text,
};
use mesh_primitives::StopReason;
use mesh_types::{IndexedMesh, Point3};
use tempfile::TempDir;

fn quad(mesh: &mut IndexedMesh, a: Point3<f64>, b: Point3<f64>, c: Point3<f64>, d: Point3<f64>) {
    mesh.push_triangle(a, b, c);
    mesh.push_triangle(a, c, d);
}

/// Closed box from the origin to `(l, w, h)`.
fn box_mesh(l: f64, w: f64, h: f64) -> IndexedMesh {
    let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
    let mut mesh = IndexedMesh::new();
    quad(&mut mesh, p(0.0, 0.0, 0.0), p(0.0, w, 0.0), p(l, w, 0.0), p(l, 0.0, 0.0));
    quad(&mut mesh, p(0.0, 0.0, h), p(l, 0.0, h), p(l, w, h), p(0.0, w, h));
    quad(&mut mesh, p(0.0, 0.0, 0.0), p(l, 0.0, 0.0), p(l, 0.0, h), p(0.0, 0.0, h));
    quad(&mut mesh, p(0.0, w, 0.0), p(0.0, w, h), p(l, w, h), p(l, w, 0.0));
    quad(&mut mesh, p(0.0, 0.0, 0.0), p(0.0, 0.0, h), p(0.0, w, h), p(0.0, w, 0.0));
    quad(&mut mesh, p(l, 0.0, 0.0), p(l, w, 0.0), p(l, w, h), p(l, 0.0, h));
    mesh
}

/// Open tube wall of radius `r` around `(cx, cy)` from `z = 0` to `z = h`.
fn tube_mesh(cx: f64, cy: f64, r: f64, h: f64, segments: u32) -> IndexedMesh {
    let ring: Vec<(f64, f64)> = (0..segments)
        .map(|i| {
            let t = TAU * f64::from(i) / f64::from(segments);
            (cx + r * t.cos(), cy + r * t.sin())
        })
        .collect();

    let mut mesh = IndexedMesh::new();
    for i in 0..ring.len() {
        let (x0, y0) = ring[i];
        let (x1, y1) = ring[(i + 1) % ring.len()];
        quad(
            &mut mesh,
            Point3::new(x0, y0, 0.0),
            Point3::new(x1, y1, 0.0),
            Point3::new(x1, y1, h),
            Point3::new(x0, y0, h),
        );
    }
    mesh
}

fn write_fixture(dir: &Path, name: &str, mesh: &IndexedMesh) -> std::path::PathBuf {
    let path = dir.join(name);
    mesh_io::write_stl_binary(mesh, File::create(&path).unwrap()).unwrap();
    path
}

fn render(input: &LoadedMesh) -> (mesh_analyze::Analysis, String) {
    let analysis = analyze(input, &AnalysisConfig::new().with_seed(1)).unwrap();
    let mut out = Vec::new();
    write_text(&analysis, &mut out).unwrap();
    (analysis, String::from_utf8(out).unwrap())
}

#[test]
fn tray_box_report() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "tray.stl", &box_mesh(58.2, 36.8, 6.8));

    let input = LoadedMesh::load(&path).unwrap();
    assert_eq!(input.face_count, 12);
    assert_eq!(input.cloud.len(), 8);

    let (analysis, text) = render(&input);

    assert!(analysis.watertight);
    assert_relative_eq!(analysis.volume.unwrap(), 58.2 * 36.8 * 6.8, epsilon = 1e-2);

    // Values went through f32 in the STL file
    assert_relative_eq!(analysis.dimensions.width, 58.2, epsilon = 1e-5);
    assert_relative_eq!(analysis.dimensions.depth, 36.8, epsilon = 1e-5);
    assert_relative_eq!(analysis.dimensions.height, 6.8, epsilon = 1e-5);

    // 6.8 rounds to the 0.3 grid at 6.9
    assert_eq!(analysis.z_levels.len(), 2);
    assert_relative_eq!(analysis.z_levels[1], 6.9, epsilon = 1e-9);

    // Four corners per level is below the section floor
    assert!(analysis.cross_sections.is_empty());

    // Planes claim all eight corners, four at a time
    let claimed: usize = analysis.planes.iter().map(|p| p.detection.inlier_count).sum();
    assert_eq!(claimed, 8);
    assert!(matches!(
        analysis.plane_pass,
        PassOutcome::Finished {
            stop: StopReason::BelowFloor,
            remaining: 0,
            ..
        }
    ));

    // Eight points never reach the cylinder floor of 20
    assert!(analysis.cylinders.is_empty());
    assert!(matches!(
        analysis.cylinder_pass,
        PassOutcome::Finished {
            stop: StopReason::BelowFloor,
            iterations: 0,
            ..
        }
    ));

    // Top and bottom outlines, both without an inner wall
    assert_eq!(analysis.walls.len(), 2);
    assert!(analysis.walls.iter().all(|w| w.inner.is_none()));

    assert!(text.contains("Loaded 8 unique vertices (12 faces)"));
    assert!(text.contains("  Watertight: true\n"));
    assert!(text.contains("TRAY_LENGTH = 58.2  # mm (X)"));
    assert!(text.contains("TRAY_WIDTH = 36.8   # mm (Y)"));
    assert!(text.contains("TRAY_HEIGHT = 6.8   # mm (Z)"));
    assert!(text.contains("Z_LEVELS = [0.0, 6.9]"));
    assert!(text.contains("CYLINDERS = [\n]"));
}

#[test]
fn tube_becomes_one_cylinder() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "tube.stl", &tube_mesh(10.0, 10.0, 3.0, 4.0, 48));

    let input = LoadedMesh::load(&path).unwrap();
    assert_eq!(input.cloud.len(), 96);

    let (analysis, text) = render(&input);

    // An open tube encloses nothing
    assert!(!analysis.watertight);
    assert!(text.contains("  Volume: N/A (not watertight)\n"));

    assert_eq!(analysis.cylinders.len(), 1);
    let cyl = &analysis.cylinders[0];
    assert_relative_eq!(cyl.x, 10.0, epsilon = 1e-3);
    assert_relative_eq!(cyl.y, 10.0, epsilon = 1e-3);
    assert_relative_eq!(cyl.diameter(), 6.0, epsilon = 1e-3);
    assert_relative_eq!(cyl.z_min, 0.0);
    assert_relative_eq!(cyl.z_max, 4.0, epsilon = 1e-6);

    assert!(text.contains("    {'x': 10.0, 'y': 10.0, 'dia': 6.0, 'z_min': 0.0, 'z_max': 4.0},\n]"));
}

#[test]
fn oversized_tube_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "ring.stl", &tube_mesh(0.0, 0.0, 15.0, 2.0, 48));

    let input = LoadedMesh::load(&path).unwrap();
    let (analysis, _) = render(&input);

    assert!(analysis.cylinders.is_empty());
    assert!(matches!(
        analysis.cylinder_pass,
        PassOutcome::Finished { rejected: 1, .. }
    ));
}

#[test]
fn reference_comparison_from_files() {
    let dir = TempDir::new().unwrap();
    let part = write_fixture(dir.path(), "part.stl", &box_mesh(20.0, 10.0, 5.0));
    let same = write_fixture(dir.path(), "same.stl", &box_mesh(20.0, 10.0, 5.0));
    let taller = write_fixture(dir.path(), "taller.stl", &box_mesh(20.0, 10.0, 7.0));

    let input = LoadedMesh::load(&part).unwrap();
    let params = ComparisonParams::default().with_seed(17);

    // Same seed on the same surface draws the same points
    let ok = compare(&input, &LoadedMesh::load(&same).unwrap(), &params).unwrap();
    assert!(ok.passed);
    assert_relative_eq!(ok.distance.symmetric, 0.0);
    assert_relative_eq!(ok.volume.difference, 0.0);

    // 1000 against 1400 mm³ is 28.6% of the reference
    let bad = compare(&input, &LoadedMesh::load(&taller).unwrap(), &params).unwrap();
    assert!(!bad.passed);
    assert!(!bad.hausdorff_passed);
    assert!(!bad.volume.passed);
    assert_relative_eq!(bad.distance.symmetric, 2.0, epsilon = 0.1);
    assert_relative_eq!(bad.volume.difference_pct.unwrap(), 400.0 / 14.0, epsilon = 1e-3);
}

#[test]
fn retriangulated_reference_passes() {
    let dir = TempDir::new().unwrap();
    let part = write_fixture(dir.path(), "part.stl", &box_mesh(30.0, 20.0, 6.0));

    // Same box with its top split into a fan around the center
    let mut fan = IndexedMesh::new();
    let full = box_mesh(30.0, 20.0, 6.0);
    for (i, face) in full.faces.iter().enumerate() {
        if i == 2 || i == 3 {
            continue;
        }
        let [a, b, c] = full.face_corners(*face).unwrap();
        fan.push_triangle(a, b, c);
    }
    let rim = [
        Point3::new(0.0, 0.0, 6.0),
        Point3::new(30.0, 0.0, 6.0),
        Point3::new(30.0, 20.0, 6.0),
        Point3::new(0.0, 20.0, 6.0),
    ];
    for i in 0..4 {
        fan.push_triangle(Point3::new(15.0, 10.0, 6.0), rim[i], rim[(i + 1) % 4]);
    }
    let reference = write_fixture(dir.path(), "fan.stl", &fan);

    let input = LoadedMesh::load(&part).unwrap();
    let reference = LoadedMesh::load(&reference).unwrap();
    assert_eq!(reference.cloud.len(), 9);

    let cmp = compare(&input, &reference, &ComparisonParams::default().with_seed(3)).unwrap();
    assert!(cmp.distance.symmetric < 1.0, "{:?}", cmp.distance);
    assert!(cmp.passed);
}

#[test]
fn missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let err = LoadedMesh::load(&dir.path().join("absent.stl")).unwrap_err();
    assert!(err.to_string().contains("absent.stl"));
}
