//! Measurement tools for reference point clouds.
//!
//! This crate provides descriptive queries used when reverse-engineering a
//! part from its mesh.
//!
//! # Features
//!
//! - **Dimensions**: Axis-aligned bounding box and derived measurements
//! - **Z levels**: Distinct heights of a stacked-extrusion part
//! - **Cross sections**: XY span and point count of the slice at each level
//! - **Wall profiles**: Outer and inner outline of a slice, and wall thickness
//! - **Surface sampling**: Area-weighted random points on a mesh
//! - **Hausdorff distance**: Cloud-to-cloud comparison against a tolerance
//! - **Watertightness**: Whether a mesh encloses a volume
//!
//! All queries are pure: they read the cloud or mesh and return new values.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Point3, PointCloud};
//! use mesh_measure::{SectionParams, dimensions, level_summary};
//!
//! // Twelve points around a 20 x 10 rectangle at z = 0
//! let points = (0..12)
//!     .map(|i| {
//!         let t = f64::from(i % 6) / 5.0;
//!         if i < 6 { Point3::new(20.0 * t, 0.0, 0.0) } else { Point3::new(20.0 * t, 10.0, 0.0) }
//!     })
//!     .collect();
//! let cloud = PointCloud::from_points(points);
//!
//! let dims = dimensions(&cloud);
//! assert!((dims.width - 20.0).abs() < 1e-10);
//!
//! let slices = level_summary(&cloud, &SectionParams::default()).unwrap();
//! assert_eq!(slices.len(), 1);
//! assert!((slices[0].y_span - 10.0).abs() < 1e-10);
//! ```
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**:
//! - X: width (left/right)
//! - Y: depth (front/back)
//! - Z: height (up/down)

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod dimensions;
mod error;
mod hausdorff;
mod sampling;
mod sections;
mod walls;
mod watertight;

// Re-export main types and functions
pub use dimensions::{Dimensions, dimensions};
pub use error::{MeasureError, MeasureResult};
pub use hausdorff::{HausdorffDistance, hausdorff};
pub use sampling::{SampleParams, sample_surface};
pub use sections::{LevelSlice, SectionParams, cross_sections, level_summary, z_levels};
pub use walls::{Rect, WallParams, WallProfile, wall_profile, wall_profiles};
pub use watertight::is_watertight;
