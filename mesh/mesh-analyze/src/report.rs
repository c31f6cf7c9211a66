//! Text and JSON rendering of an [`Analysis`].

use std::io::{self, Write};

use mesh_measure::WallProfile;

use crate::analysis::{Analysis, Comparison, PassOutcome};

const RULE_WIDTH: usize = 70;

fn banner(w: &mut impl Write, title: &str) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(w, "{rule}")?;
    writeln!(w, "{title}")?;
    writeln!(w, "{rule}")
}

fn pass_line(w: &mut impl Write, kind: &str, outcome: &PassOutcome) -> io::Result<()> {
    match outcome {
        PassOutcome::Finished {
            iterations,
            remaining,
            rejected,
            stop,
            ..
        } => {
            write!(
                w,
                "  ({kind} pass ended: {stop}; {iterations} fits, {remaining} points unclaimed"
            )?;
            if *rejected > 0 {
                write!(w, ", {rejected} rejected as oversized")?;
            }
            writeln!(w, ")")
        }
        PassOutcome::Failed { error } => writeln!(w, "{kind} detection error: {error}"),
    }
}

fn verdict(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

fn comparison_lines(w: &mut impl Write, cmp: &Comparison) -> io::Result<()> {
    writeln!(w, "\n--- REFERENCE COMPARISON ---")?;
    writeln!(w, "  Reference: {}", cmp.reference)?;
    writeln!(
        w,
        "  Hausdorff: {:.3} mm (forward {:.3}, backward {:.3}; {} samples per mesh)",
        cmp.distance.symmetric, cmp.distance.forward, cmp.distance.backward, cmp.samples
    )?;
    writeln!(
        w,
        "  Tolerance: {:.3} mm: {}",
        cmp.tolerance,
        verdict(cmp.hausdorff_passed)
    )?;

    let v = &cmp.volume;
    writeln!(w, "  Volume: {:.2} mm³ (reference {:.2} mm³)", v.input, v.reference)?;
    match v.difference_pct {
        Some(pct) => writeln!(w, "  Difference: {:.2} mm³ ({pct:.2}%)", v.difference)?,
        None => writeln!(w, "  Difference: {:.2} mm³ (reference has no volume)", v.difference)?,
    }
    writeln!(
        w,
        "  Tolerance: {:.1}%: {}",
        v.tolerance_pct,
        verdict(v.passed)
    )?;
    writeln!(w, "  Overall: {}", if cmp.passed { "PASSED" } else { "FAILED" })
}

fn wall_line(w: &mut impl Write, profile: &WallProfile) -> io::Result<()> {
    write!(
        w,
        "  Z={:.1}mm: outer {:.1} x {:.1} mm",
        profile.z,
        profile.outer.width(),
        profile.outer.depth()
    )?;
    match (profile.inner, profile.wall_thickness()) {
        (Some(inner), Some([tx, ty])) => write!(
            w,
            ", inner {:.1} x {:.1} mm, walls {tx:.2} x {ty:.2} mm",
            inner.width(),
            inner.depth()
        )?,
        _ => write!(w, ", solid")?,
    }
    writeln!(w, " ({} pts)", profile.point_count)
}

/// Write the human-readable report, ending with the constants block.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_text(analysis: &Analysis, w: &mut impl Write) -> io::Result<()> {
    banner(w, &format!("ANALYZING: {}", analysis.source))?;
    writeln!(w)?;
    writeln!(
        w,
        "Loaded {} unique vertices ({} faces)",
        analysis.point_count, analysis.face_count
    )?;

    writeln!(w, "\n--- MESH INFO ---")?;
    writeln!(w, "  Faces: {}", analysis.face_count)?;
    writeln!(w, "  Watertight: {}", analysis.watertight)?;
    match analysis.volume {
        Some(volume) => writeln!(w, "  Volume: {volume:.2} mm³")?,
        None => writeln!(w, "  Volume: N/A (not watertight)")?,
    }

    let d = &analysis.dimensions;
    writeln!(w, "\n--- BOUNDING BOX ---")?;
    writeln!(
        w,
        "Dimensions: {:.2} x {:.2} x {:.2} mm",
        d.width, d.depth, d.height
    )?;
    writeln!(w, "Min corner: ({:.2}, {:.2}, {:.2})", d.min.x, d.min.y, d.min.z)?;
    writeln!(w, "Max corner: ({:.2}, {:.2}, {:.2})", d.max.x, d.max.y, d.max.z)?;
    writeln!(
        w,
        "Center: ({:.2}, {:.2}, {:.2})",
        d.center.x, d.center.y, d.center.z
    )?;

    writeln!(w, "\n--- Z LEVELS (horizontal layers) ---")?;
    for z in &analysis.z_levels {
        writeln!(w, "  Z = {z:.2} mm")?;
    }

    writeln!(w, "\n--- CROSS SECTIONS AT Z LEVELS ---")?;
    for s in &analysis.cross_sections {
        writeln!(
            w,
            "  Z={:.1}mm: {:.1} x {:.1} mm ({} pts)",
            s.z, s.x_span, s.y_span, s.point_count
        )?;
    }

    writeln!(w, "\n--- DETECTED PLANES ---")?;
    for (i, plane) in analysis.planes.iter().enumerate() {
        let c = &plane.detection.centroid;
        writeln!(w, "  Plane {}: {}", i + 1, plane.orientation)?;
        writeln!(w, "    Centroid: ({:.2}, {:.2}, {:.2})", c.x, c.y, c.z)?;
        writeln!(w, "    Size: {:.1} x {:.1} mm", plane.size[0], plane.size[1])?;
        writeln!(w, "    Points: {}", plane.detection.inlier_count)?;
    }
    pass_line(w, "Plane", &analysis.plane_pass)?;

    writeln!(w, "\n--- DETECTED CYLINDERS (holes/posts) ---")?;
    for (i, cyl) in analysis.cylinders.iter().enumerate() {
        writeln!(w, "  Cylinder {}:", i + 1)?;
        writeln!(w, "    Position: ({:.2}, {:.2}) mm", cyl.x, cyl.y)?;
        writeln!(
            w,
            "    Diameter: {:.2} mm (radius: {:.2})",
            cyl.diameter(),
            cyl.radius
        )?;
        writeln!(
            w,
            "    Z range: {:.2} to {:.2} mm (height: {:.2})",
            cyl.z_min, cyl.z_max, cyl.height
        )?;
        if cyl.member_count > 1 {
            writeln!(w, "    Merged from {} detections", cyl.member_count)?;
        }
    }
    pass_line(w, "Cylinder", &analysis.cylinder_pass)?;

    writeln!(w, "\n--- WALL PROFILES ---")?;
    for profile in &analysis.walls {
        wall_line(w, profile)?;
    }

    if let Some(cmp) = &analysis.comparison {
        comparison_lines(w, cmp)?;
    }

    writeln!(w)?;
    write_constants(analysis, w)
}

/// Write the suggested dimension constants as Python-style assignments,
/// ready to paste into a CAD script.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_constants(analysis: &Analysis, w: &mut impl Write) -> io::Result<()> {
    let d = &analysis.dimensions;
    banner(w, "SUGGESTED DIMENSIONS")?;
    writeln!(w)?;
    writeln!(w, "# Overall tray dimensions")?;
    writeln!(w, "TRAY_LENGTH = {:.1}  # mm (X)", d.width)?;
    writeln!(w, "TRAY_WIDTH = {:.1}   # mm (Y)", d.depth)?;
    writeln!(w, "TRAY_HEIGHT = {:.1}   # mm (Z)", d.height)?;
    writeln!(w)?;

    let levels: Vec<String> = analysis.z_levels.iter().map(|z| format!("{z:.1}")).collect();
    writeln!(w, "# Z levels for layer construction")?;
    writeln!(w, "Z_LEVELS = [{}]", levels.join(", "))?;
    writeln!(w)?;

    writeln!(w, "# Detected cylindrical features (holes/posts)")?;
    writeln!(w, "CYLINDERS = [")?;
    for cyl in &analysis.cylinders {
        writeln!(
            w,
            "    {{'x': {:.1}, 'y': {:.1}, 'dia': {:.1}, 'z_min': {:.1}, 'z_max': {:.1}}},",
            cyl.x,
            cyl.y,
            cyl.diameter(),
            cyl.z_min,
            cyl.z_max
        )?;
    }
    writeln!(w, "]")
}

/// Write the analysis as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns any error from serialization or the writer.
pub fn write_json(analysis: &Analysis, w: &mut impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, analysis).map_err(io::Error::from)?;
    writeln!(w)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::analysis::VolumeCheck;
    use mesh_measure::{Dimensions, HausdorffDistance, Rect};
    use mesh_primitives::{CylinderCluster, CylinderDetection, Detection, StopReason};
    use mesh_types::{Point3, Vector3};

    fn cluster(x: f64, y: f64, radius: f64, members: usize) -> CylinderCluster {
        CylinderCluster {
            x,
            y,
            radius,
            z_min: 0.0,
            z_max: 4.6,
            height: 4.6,
            member_count: members,
            members: (0..members).collect(),
        }
    }

    fn sample() -> Analysis {
        Analysis {
            source: "tray.stl".to_string(),
            face_count: 12,
            point_count: 8,
            watertight: true,
            volume: Some(14_563.9),
            dimensions: Dimensions {
                min: Point3::origin(),
                max: Point3::new(58.2, 36.8, 6.8),
                width: 58.2,
                depth: 36.8,
                height: 6.8,
                diagonal: 69.2,
                center: Point3::new(29.1, 18.4, 3.4),
            },
            z_levels: vec![0.0, 1.8, 6.9],
            cross_sections: Vec::new(),
            detections: vec![Detection::from(CylinderDetection {
                center: Point3::new(10.1, 9.9, 0.0),
                axis: Vector3::z(),
                radius: 2.0,
                inlier_count: 24,
                z_min: 0.0,
                z_max: 4.6,
                height: 4.6,
                inliers: Vec::new(),
            })],
            planes: Vec::new(),
            plane_pass: PassOutcome::Finished {
                detected: 0,
                rejected: 0,
                iterations: 0,
                remaining: 8,
                min_inliers: 0,
                stop: StopReason::BelowFloor,
            },
            cylinders: vec![cluster(10.15, 9.9, 2.05, 2), cluster(30.0, 10.0, 1.5, 1)],
            cylinder_pass: PassOutcome::Finished {
                detected: 3,
                rejected: 1,
                iterations: 5,
                remaining: 12,
                min_inliers: 20,
                stop: StopReason::WeakFit,
            },
            walls: vec![WallProfile {
                z: 1.6,
                point_count: 9,
                outer: Rect {
                    min: [0.0, 0.0],
                    max: [58.2, 36.8],
                },
                inner: Some(Rect {
                    min: [0.8, 0.8],
                    max: [57.4, 36.0],
                }),
            }],
            comparison: None,
        }
    }

    fn render(analysis: &Analysis) -> String {
        let mut out = Vec::new();
        write_text(analysis, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn constants_block() {
        let mut out = Vec::new();
        write_constants(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with(&"=".repeat(70)));
        assert!(text.contains("TRAY_LENGTH = 58.2  # mm (X)\n"));
        assert!(text.contains("TRAY_WIDTH = 36.8   # mm (Y)\n"));
        assert!(text.contains("TRAY_HEIGHT = 6.8   # mm (Z)\n"));
        assert!(text.contains("Z_LEVELS = [0.0, 1.8, 6.9]\n"));
        assert!(text.contains(
            "CYLINDERS = [\n    {'x': 10.2, 'y': 9.9, 'dia': 4.1, 'z_min': 0.0, 'z_max': 4.6},\n    {'x': 30.0, 'y': 10.0, 'dia': 3.0, 'z_min': 0.0, 'z_max': 4.6},\n]\n"
        ));
    }

    #[test]
    fn text_sections_in_order() {
        let text = render(&sample());
        let order = [
            "ANALYZING: tray.stl",
            "Loaded 8 unique vertices (12 faces)",
            "--- MESH INFO ---",
            "  Watertight: true",
            "  Volume: 14563.90 mm³",
            "--- BOUNDING BOX ---",
            "Dimensions: 58.20 x 36.80 x 6.80 mm",
            "--- Z LEVELS (horizontal layers) ---",
            "  Z = 1.80 mm",
            "--- CROSS SECTIONS AT Z LEVELS ---",
            "--- DETECTED PLANES ---",
            "--- DETECTED CYLINDERS (holes/posts) ---",
            "  Cylinder 1:",
            "    Position: (10.15, 9.90) mm",
            "    Diameter: 4.10 mm (radius: 2.05)",
            "    Merged from 2 detections",
            "  Cylinder 2:",
            "--- WALL PROFILES ---",
            "SUGGESTED DIMENSIONS",
        ];
        let mut from = 0;
        for needle in order {
            let at = text[from..]
                .find(needle)
                .unwrap_or_else(|| panic!("missing or out of order: {needle}"));
            from += at + needle.len();
        }
    }

    #[test]
    fn pass_summaries() {
        let text = render(&sample());
        assert!(text.contains("  (Plane pass ended: too few points remaining; 0 fits, 8 points unclaimed)\n"));
        assert!(text.contains(
            "  (Cylinder pass ended: no confident fit remaining; 5 fits, 12 points unclaimed, 1 rejected as oversized)\n"
        ));

        let mut failed = sample();
        failed.plane_pass = PassOutcome::Failed {
            error: "invalid parameters: max_models must be positive".to_string(),
        };
        assert!(render(&failed).contains("Plane detection error: invalid parameters"));
    }

    #[test]
    fn wall_lines() {
        let text = render(&sample());
        assert!(text.contains(
            "  Z=1.6mm: outer 58.2 x 36.8 mm, inner 56.6 x 35.2 mm, walls 0.80 x 0.80 mm (9 pts)\n"
        ));

        let mut solid = sample();
        solid.walls[0].inner = None;
        assert!(render(&solid).contains("  Z=1.6mm: outer 58.2 x 36.8 mm, solid (9 pts)\n"));
    }

    #[test]
    fn comparison_section() {
        let mut analysis = sample();
        assert!(!render(&analysis).contains("REFERENCE COMPARISON"));

        analysis.comparison = Some(Comparison {
            reference: "printed.stl".to_string(),
            samples: 10_000,
            distance: HausdorffDistance {
                forward: 1.25,
                backward: 0.5,
                symmetric: 1.25,
            },
            tolerance: 1.0,
            hausdorff_passed: false,
            volume: VolumeCheck {
                input: 1050.0,
                reference: 1000.0,
                difference: 50.0,
                difference_pct: Some(5.0),
                tolerance_pct: 5.0,
                passed: true,
            },
            passed: false,
        });
        let text = render(&analysis);
        assert!(text.contains("  Reference: printed.stl\n"));
        assert!(text.contains(
            "  Hausdorff: 1.250 mm (forward 1.250, backward 0.500; 10000 samples per mesh)\n"
        ));
        assert!(text.contains("  Tolerance: 1.000 mm: FAIL\n"));
        assert!(text.contains("  Volume: 1050.00 mm³ (reference 1000.00 mm³)\n"));
        assert!(text.contains("  Difference: 50.00 mm³ (5.00%)\n"));
        assert!(text.contains("  Tolerance: 5.0%: PASS\n"));
        assert!(text.contains("  Overall: FAILED\n"));
    }

    #[test]
    fn open_mesh_has_no_volume_line() {
        let mut analysis = sample();
        analysis.watertight = false;
        analysis.volume = None;
        let text = render(&analysis);
        assert!(text.contains("  Watertight: false\n"));
        assert!(text.contains("  Volume: N/A (not watertight)\n"));
    }

    #[test]
    fn json_report() {
        let mut out = Vec::new();
        write_json(&sample(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["point_count"], 8);
        assert_eq!(value["cylinders"].as_array().unwrap().len(), 2);
        assert_eq!(value["cylinder_pass"]["status"], "finished");
        assert_eq!(value["cylinder_pass"]["stop"], "weak_fit");
        assert_eq!(value["watertight"], true);
        assert_eq!(value["detections"][0]["kind"], "cylinder");
        assert_eq!(value["detections"][0]["inlier_count"], 24);
        assert!(value["detections"][0].get("inliers").is_none());
        assert!(value.get("comparison").is_none());
    }
}
