//! mesh-analyze: detect planes, holes and Z levels in a reference STL.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use mesh_analyze::{
    AnalysisConfig, ComparisonParams, LoadedMesh, analyze, compare, write_json, write_text,
};
use mesh_primitives::{ClusterStrategy, MaxRadius};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mesh-analyze")]
#[command(about = "Reverse-engineer a reference STL into planes, holes, Z levels and dimensions")]
#[command(version)]
struct Cli {
    /// STL file to analyze.
    #[arg(default_value = "3d-parts/components/power-source-box-schematic.stl")]
    path: PathBuf,

    /// Print the structured report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Compare against this STL and fail if it deviates.
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Largest accepted Hausdorff distance to the reference (mm).
    #[arg(long, default_value = "1.0")]
    hausdorff_tolerance: f64,

    /// Largest accepted volume difference to the reference (percent).
    #[arg(long, default_value = "5.0")]
    volume_tolerance: f64,

    /// Surface points sampled from each mesh for the reference check.
    #[arg(long, default_value = "10000")]
    samples: usize,

    /// Plane inlier distance threshold (mm).
    #[arg(long, default_value = "0.15")]
    plane_threshold: f64,

    /// Cylinder inlier distance threshold (mm).
    #[arg(long, default_value = "0.08")]
    cylinder_threshold: f64,

    /// Maximum plane fit attempts.
    #[arg(long, default_value = "8")]
    max_planes: usize,

    /// Maximum cylinder fit attempts.
    #[arg(long, default_value = "15")]
    max_cylinders: usize,

    /// Cylinders wider than this radius are discarded (mm).
    #[arg(long, default_value = "10.0")]
    max_radius: f64,

    /// Per-axis distance under which cylinder centers are merged (mm).
    #[arg(long, default_value = "1.0")]
    xy_tolerance: f64,

    /// Merge chains of nearby cylinders, not only those near the first one seen.
    #[arg(long)]
    transitive: bool,

    /// Seed the RANSAC fitters and surface sampling for a reproducible report.
    #[arg(long)]
    seed: Option<u64>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }

        config.planes.params = config
            .planes
            .params
            .with_distance_threshold(self.plane_threshold)
            .with_max_models(self.max_planes);
        config.cylinders.params = config
            .cylinders
            .params
            .with_distance_threshold(self.cylinder_threshold)
            .with_max_models(self.max_cylinders);
        config.cylinders.rejection = MaxRadius::new(self.max_radius);

        let strategy = if self.transitive {
            ClusterStrategy::Transitive
        } else {
            ClusterStrategy::SeedBox
        };
        config.cluster = config
            .cluster
            .with_xy_tolerance(self.xy_tolerance)
            .with_strategy(strategy);
        config
    }

    fn comparison(&self) -> ComparisonParams {
        let mut params = ComparisonParams::default()
            .with_hausdorff_tolerance(self.hausdorff_tolerance)
            .with_volume_tolerance_pct(self.volume_tolerance)
            .with_sample_count(self.samples);
        if let Some(seed) = self.seed {
            params = params.with_seed(seed);
        }
        params
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let input = LoadedMesh::load(&cli.path)?;
    let mut analysis = analyze(&input, &cli.config())
        .with_context(|| format!("Analysis of {} failed", cli.path.display()))?;

    if let Some(path) = &cli.reference {
        let reference = LoadedMesh::load(path)?;
        analysis.comparison = Some(compare(&input, &reference, &cli.comparison())?);
    }

    let mut out = io::stdout().lock();
    if cli.json {
        write_json(&analysis, &mut out)?;
    } else {
        write_text(&analysis, &mut out)?;
    }
    out.flush()?;

    let failed = analysis.comparison.as_ref().is_some_and(|c| !c.passed);
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
