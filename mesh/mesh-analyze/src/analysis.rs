//! The analysis pipeline: load, measure, extract, cluster, compare.

use std::path::Path;

use anyhow::{Context, Result};
use mesh_measure::{
    Dimensions, HausdorffDistance, LevelSlice, WallProfile, cross_sections, dimensions, hausdorff,
    is_watertight, sample_surface, wall_profiles, z_levels,
};
use mesh_primitives::{
    CylinderCluster, Detection, Extraction, PlaneDetection, PlaneOrientation, StopReason,
    cluster_cylinders, extract_cylinders, extract_planes, sort_by_diameter_desc,
};
use mesh_types::{IndexedMesh, PointCloud};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{AnalysisConfig, ComparisonParams};

/// A mesh together with its deduplicated vertex cloud.
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    /// Where the mesh came from, for the report header.
    pub source: String,
    /// Triangle count of the source mesh.
    pub face_count: usize,
    /// Unique vertices.
    pub cloud: PointCloud,
    /// The triangles, for surface and volume queries.
    pub mesh: IndexedMesh,
}

impl LoadedMesh {
    /// Read an STL file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or is not valid STL.
    pub fn load(path: &Path) -> Result<Self> {
        let mesh = mesh_io::load_stl(path)
            .with_context(|| format!("Failed to read STL {}", path.display()))?;
        Ok(Self::from_mesh(path.display().to_string(), &mesh))
    }

    /// Wrap an in-memory mesh.
    #[must_use]
    pub fn from_mesh(source: impl Into<String>, mesh: &IndexedMesh) -> Self {
        Self {
            source: source.into(),
            face_count: mesh.face_count(),
            cloud: PointCloud::from_mesh(mesh),
            mesh: mesh.clone(),
        }
    }
}

/// A detected plane with its derived labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaneSummary {
    /// Orientation of the normal.
    pub orientation: PlaneOrientation,
    /// `[x, y]` extent of the supporting points.
    pub size: [f64; 2],
    /// The detection itself.
    #[serde(flatten)]
    pub detection: PlaneDetection,
}

impl From<PlaneDetection> for PlaneSummary {
    fn from(detection: PlaneDetection) -> Self {
        let size = detection.size_xy();
        Self {
            orientation: detection.orientation(),
            size: [size.x, size.y],
            detection,
        }
    }
}

/// How an extraction pass went.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PassOutcome {
    /// The pass ran to a stop condition.
    Finished {
        /// Accepted detections before clustering.
        detected: usize,
        /// Detections discarded by the rejection filter.
        rejected: usize,
        /// Fit attempts.
        iterations: usize,
        /// Points never claimed by a fit.
        remaining: usize,
        /// Minimum inliers per detection.
        min_inliers: usize,
        /// Why the pass ended.
        stop: StopReason,
    },
    /// The pass could not start.
    Failed {
        /// Error message.
        error: String,
    },
}

impl PassOutcome {
    fn finished<D>(extraction: &Extraction<D>) -> Self {
        Self::Finished {
            detected: extraction.detections.len(),
            rejected: extraction.rejected.len(),
            iterations: extraction.iterations,
            remaining: extraction.remaining,
            min_inliers: extraction.min_inliers,
            stop: extraction.stop,
        }
    }

    fn failed(error: &impl std::fmt::Display) -> Self {
        Self::Failed {
            error: error.to_string(),
        }
    }
}

/// Volume of the analyzed mesh against the reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeCheck {
    /// Absolute volume of the analyzed mesh.
    pub input: f64,
    /// Absolute volume of the reference.
    pub reference: f64,
    /// `|input - reference|`.
    pub difference: f64,
    /// Difference in percent of the reference; `None` if the reference
    /// encloses no volume.
    pub difference_pct: Option<f64>,
    /// Largest accepted difference in percent.
    pub tolerance_pct: f64,
    /// Whether the difference is within tolerance.
    pub passed: bool,
}

impl VolumeCheck {
    fn new(input: f64, reference: f64, tolerance_pct: f64) -> Self {
        let difference = (input - reference).abs();
        let difference_pct = (reference > 0.0).then(|| difference / reference * 100.0);
        Self {
            input,
            reference,
            difference,
            difference_pct,
            tolerance_pct,
            passed: difference_pct.is_some_and(|pct| pct <= tolerance_pct),
        }
    }
}

/// Result of checking the analyzed mesh against a reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Reference source.
    pub reference: String,
    /// Surface points drawn from each mesh.
    pub samples: usize,
    /// Distances between the two surface samples.
    pub distance: HausdorffDistance,
    /// Largest accepted symmetric distance.
    pub tolerance: f64,
    /// Whether the symmetric distance is within tolerance.
    pub hausdorff_passed: bool,
    /// Volume comparison.
    pub volume: VolumeCheck,
    /// Whether both checks passed.
    pub passed: bool,
}

/// Everything the report prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Analyzed source.
    pub source: String,
    /// Triangle count of the source mesh.
    pub face_count: usize,
    /// Unique vertex count.
    pub point_count: usize,
    /// Whether every edge is shared by exactly two faces.
    pub watertight: bool,
    /// Enclosed volume of a watertight mesh.
    pub volume: Option<f64>,
    /// Bounding box measurements.
    pub dimensions: Dimensions,
    /// Distinct Z heights.
    pub z_levels: Vec<f64>,
    /// Slice summaries at the Z levels.
    pub cross_sections: Vec<LevelSlice>,
    /// Accepted detections of both passes before merging: planes, then
    /// cylinders, each in extraction order.
    pub detections: Vec<Detection>,
    /// Detected planes, in extraction order.
    pub planes: Vec<PlaneSummary>,
    /// Plane pass outcome.
    pub plane_pass: PassOutcome,
    /// Merged cylinders, by descending diameter.
    pub cylinders: Vec<CylinderCluster>,
    /// Cylinder pass outcome.
    pub cylinder_pass: PassOutcome,
    /// Wall outlines per height.
    pub walls: Vec<WallProfile>,
    /// Reference check, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
}

/// Run the full analysis on a loaded mesh.
///
/// A failing extraction pass is recorded in the result rather than
/// returned, so the other sections are still reported.
///
/// # Errors
///
/// Returns an error if the section parameters are invalid.
pub fn analyze(input: &LoadedMesh, config: &AnalysisConfig) -> Result<Analysis> {
    let cloud = &input.cloud;
    info!(source = %input.source, points = cloud.len(), "Analyzing mesh");

    let levels = z_levels(cloud, config.sections.z_tolerance).context("Z level detection failed")?;
    let sections = cross_sections(cloud, &levels, &config.sections);

    let mut detections = Vec::new();

    let (planes, plane_pass) = match extract_planes(cloud, &config.planes) {
        Ok(extraction) => {
            let outcome = PassOutcome::finished(&extraction);
            detections.extend(extraction.detections.iter().cloned().map(Detection::from));
            let planes = extraction.detections.into_iter().map(PlaneSummary::from).collect();
            (planes, outcome)
        }
        Err(e) => {
            warn!(error = %e, "Plane detection failed");
            (Vec::new(), PassOutcome::failed(&e))
        }
    };

    let (cylinders, cylinder_pass) = match extract_cylinders(cloud, &config.cylinders) {
        Ok(extraction) => {
            let mut clusters = cluster_cylinders(&extraction.detections, &config.cluster);
            sort_by_diameter_desc(&mut clusters);
            let outcome = PassOutcome::finished(&extraction);
            detections.extend(extraction.detections.into_iter().map(Detection::from));
            (clusters, outcome)
        }
        Err(e) => {
            warn!(error = %e, "Cylinder detection failed");
            (Vec::new(), PassOutcome::failed(&e))
        }
    };

    let walls = wall_profiles(cloud, config.wall_step, &config.walls);

    let watertight = is_watertight(&input.mesh);
    let volume = watertight.then(|| input.mesh.volume());
    if !watertight {
        info!(source = %input.source, "Mesh is not watertight, volume is undefined");
    }

    info!(
        levels = levels.len(),
        claimed = detections.iter().map(Detection::inlier_count).sum::<usize>(),
        planes = planes.len(),
        cylinders = cylinders.len(),
        walls = walls.len(),
        "Analysis complete"
    );

    Ok(Analysis {
        source: input.source.clone(),
        face_count: input.face_count,
        point_count: cloud.len(),
        watertight,
        volume,
        dimensions: dimensions(cloud),
        z_levels: levels,
        cross_sections: sections,
        detections,
        planes,
        plane_pass,
        cylinders,
        cylinder_pass,
        walls,
        comparison: None,
    })
}

/// Compare a mesh with a reference by surface distance and volume.
///
/// Both surfaces are sampled uniformly by area and the Hausdorff distance
/// of the two samples is checked against the tolerance. Volumes are the
/// absolute enclosed volumes, compared in percent of the reference.
///
/// # Errors
///
/// Returns an error if either mesh has no surface to sample or the sample
/// count is zero.
pub fn compare(
    input: &LoadedMesh,
    reference: &LoadedMesh,
    params: &ComparisonParams,
) -> Result<Comparison> {
    let context = || format!("Cannot compare {} with {}", input.source, reference.source);
    let input_samples = sample_surface(&input.mesh, &params.samples).with_context(context)?;
    let reference_samples =
        sample_surface(&reference.mesh, &params.samples).with_context(context)?;
    let distance = hausdorff(&input_samples, &reference_samples).with_context(context)?;

    let hausdorff_passed = distance.passes(params.hausdorff_tolerance);
    if !hausdorff_passed {
        warn!(
            symmetric = distance.symmetric,
            tolerance = params.hausdorff_tolerance,
            "Mesh deviates from reference"
        );
    }

    let volume = VolumeCheck::new(
        input.mesh.volume(),
        reference.mesh.volume(),
        params.volume_tolerance_pct,
    );
    if !volume.passed {
        warn!(
            input = volume.input,
            reference = volume.reference,
            tolerance_pct = params.volume_tolerance_pct,
            "Volume differs from reference"
        );
    }

    Ok(Comparison {
        reference: reference.source.clone(),
        samples: params.samples.count,
        distance,
        tolerance: params.hausdorff_tolerance,
        hausdorff_passed,
        passed: hausdorff_passed && volume.passed,
        volume,
    })
}
