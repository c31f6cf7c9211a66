//! Reverse-engineering report for reference meshes.
//!
//! Loads an STL, measures its bounding box and Z levels, extracts planes
//! and cylindrical holes or posts, infers wall thickness, and prints the
//! result as a text report ending in paste-ready dimension constants.
//!
//! # Example
//!
//! ```
//! use mesh_analyze::{AnalysisConfig, LoadedMesh, analyze, write_constants};
//! use mesh_types::{IndexedMesh, Point3};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.push_triangle(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(20.0, 0.0, 0.0),
//!     Point3::new(20.0, 10.0, 0.0),
//! );
//!
//! let input = LoadedMesh::from_mesh("triangle", &mesh);
//! let analysis = analyze(&input, &AnalysisConfig::new().with_seed(1)).unwrap();
//!
//! let mut out = Vec::new();
//! write_constants(&analysis, &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("TRAY_LENGTH = 20.0"));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod analysis;
mod config;
mod report;

pub use analysis::{
    Analysis, Comparison, LoadedMesh, PassOutcome, PlaneSummary, VolumeCheck, analyze, compare,
};
pub use config::{AnalysisConfig, ComparisonParams};
pub use report::{write_constants, write_json, write_text};
