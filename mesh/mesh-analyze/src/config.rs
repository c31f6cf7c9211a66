//! Parameters of a full analysis run.

use mesh_measure::{SampleParams, SectionParams, WallParams};
use mesh_primitives::{ClusterParams, CylinderExtraction, PlaneExtraction};

/// Every tunable of [`analyze`](crate::analyze), with the reference defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Plane pass.
    pub planes: PlaneExtraction,
    /// Cylinder pass.
    pub cylinders: CylinderExtraction,
    /// Merging of duplicate cylinder detections.
    pub cluster: ClusterParams,
    /// Z levels and cross sections.
    pub sections: SectionParams,
    /// Wall outline inference.
    pub walls: WallParams,
    /// Z rounding step for wall profiles.
    pub wall_step: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            planes: PlaneExtraction::default(),
            cylinders: CylinderExtraction::default(),
            cluster: ClusterParams::default(),
            sections: SectionParams::default(),
            walls: WallParams::default(),
            wall_step: 0.1,
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed both RANSAC fitters for a reproducible run.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.planes.ransac = self.planes.ransac.with_seed(seed);
        self.cylinders.ransac = self.cylinders.ransac.with_seed(seed);
        self
    }
}

/// Tolerances of [`compare`](crate::compare).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonParams {
    /// Surface points drawn from each mesh.
    pub samples: SampleParams,
    /// Largest accepted symmetric Hausdorff distance (mm).
    pub hausdorff_tolerance: f64,
    /// Largest accepted volume difference, in percent of the reference.
    pub volume_tolerance_pct: f64,
}

impl Default for ComparisonParams {
    fn default() -> Self {
        Self {
            samples: SampleParams::default(),
            hausdorff_tolerance: 1.0,
            volume_tolerance_pct: 5.0,
        }
    }
}

impl ComparisonParams {
    /// Create parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Hausdorff tolerance.
    #[must_use]
    pub const fn with_hausdorff_tolerance(mut self, tolerance: f64) -> Self {
        self.hausdorff_tolerance = tolerance;
        self
    }

    /// Set the volume tolerance in percent.
    #[must_use]
    pub const fn with_volume_tolerance_pct(mut self, pct: f64) -> Self {
        self.volume_tolerance_pct = pct;
        self
    }

    /// Set the number of surface samples per mesh.
    #[must_use]
    pub const fn with_sample_count(mut self, count: usize) -> Self {
        self.samples = self.samples.with_count(count);
        self
    }

    /// Seed the surface sampling. Both meshes use the same seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.samples = self.samples.with_seed(seed);
        self
    }
}
