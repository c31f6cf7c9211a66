//! Primitive extraction for reference meshes.
//!
//! This crate provides tools for:
//! - RANSAC plane and cylinder fitting behind a [`PrimitiveFitter`] interface
//! - Greedy multi-model extraction with inlier removal
//! - Rejection of implausible detections
//! - Plane orientation labels
//! - Merging of duplicate cylinder detections into holes and posts
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero Bevy dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_primitives::{PlaneExtraction, RansacConfig, extract_planes};
//! use mesh_types::{Point3, PointCloud};
//!
//! // A 10 x 10 floor at z = 0
//! let points = (0..10)
//!     .flat_map(|i| (0..10).map(move |j| Point3::new(f64::from(i), f64::from(j), 0.0)))
//!     .collect();
//! let cloud = PointCloud::from_points(points);
//!
//! let config = PlaneExtraction {
//!     ransac: RansacConfig::new().with_seed(42),
//!     ..PlaneExtraction::default()
//! };
//! let planes = extract_planes(&cloud, &config).unwrap();
//!
//! assert_eq!(planes.detections.len(), 1);
//! assert_eq!(planes.detections[0].inlier_count, 100);
//! ```

#![warn(missing_docs)]
// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cluster;
mod cylinder;
mod detection;
mod error;
mod extract;
mod fit;
mod orientation;
mod plane;
mod ransac;
mod reject;

pub use cluster::{
    ClusterParams, ClusterStrategy, CylinderCluster, cluster_cylinders, sort_by_diameter_desc,
};
pub use cylinder::Cylinder;
pub use detection::{CylinderDetection, Describe, Detection, PlaneDetection};
pub use error::{PrimitiveError, PrimitiveResult};
pub use extract::{
    CylinderExtraction, Extraction, ExtractionParams, PlaneExtraction, StopReason,
    extract_cylinders, extract_greedy, extract_planes,
};
pub use fit::{Fit, PrimitiveFitter};
pub use orientation::PlaneOrientation;
pub use plane::Plane;
pub use ransac::{RansacConfig, RansacCylinder, RansacPlane};
pub use reject::{AcceptAll, MaxRadius, RejectionFilter};
