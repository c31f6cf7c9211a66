//! Mesh file input for the analysis tools.
//!
//! This crate reads triangle meshes from STL (binary and ASCII) and turns
//! them into the deduplicated [`PointCloud`] the fitting pipeline works on.
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::load_point_cloud;
//!
//! let cloud = load_point_cloud("part.stl").unwrap();
//! println!("Loaded {} unique vertices", cloud.len());
//! ```
//!
//! # Quality Standards
//!
//! - Zero `unwrap`/`expect` in library code

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod stl;

pub use error::{IoError, IoResult};
pub use stl::{load_stl, read_stl, write_stl_binary};

use std::path::Path;

use mesh_types::PointCloud;
use tracing::debug;

/// Load an STL file and flatten it into a deduplicated point cloud.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid STL.
pub fn load_point_cloud<P: AsRef<Path>>(path: P) -> IoResult<PointCloud> {
    let path = path.as_ref();
    let mesh = load_stl(path)?;
    let cloud = PointCloud::from_mesh(&mesh);
    debug!(
        path = %path.display(),
        faces = mesh.face_count(),
        points = cloud.len(),
        "Built point cloud"
    );
    Ok(cloud)
}
