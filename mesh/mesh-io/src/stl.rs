//! STL (Stereolithography) reading.
//!
//! Supports both ASCII and binary STL.
//!
//! # Format Detection
//!
//! A file is read as ASCII when it starts with `solid` (after optional
//! whitespace), its 80-byte header holds no NUL byte, and its length does not
//! match the binary layout for the face count found at offset 80. Everything
//! else is read as binary.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector (ignored)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count
//! end
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, Point3, Vector3};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Load a mesh from an STL file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the path does not exist, and a parse
/// error if the content is not valid STL.
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;

    read_stl(BufReader::new(file))
}

/// Read an STL mesh from any reader, detecting ASCII vs binary.
///
/// # Errors
///
/// Returns an error if the data cannot be read or is not valid STL.
pub fn read_stl<R: Read>(mut reader: R) -> IoResult<IndexedMesh> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    if bytes.len() < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }

    if looks_like_ascii(&bytes) {
        debug!(bytes = bytes.len(), "Reading ASCII STL");
        parse_ascii(&String::from_utf8_lossy(&bytes))
    } else {
        debug!(bytes = bytes.len(), "Reading binary STL");
        parse_binary(&bytes)
    }
}

/// Decide whether the buffer holds ASCII STL.
///
/// Some binary exporters write `solid` at the start of the header, so the
/// keyword alone is not enough.
fn looks_like_ascii(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    let starts_with_solid = String::from_utf8_lossy(head)
        .trim_start()
        .starts_with("solid");
    if !starts_with_solid || head.contains(&0) {
        return false;
    }
    binary_face_count(bytes).is_none_or(|count| {
        HEADER_SIZE + 4 + count as usize * TRIANGLE_SIZE != bytes.len()
    })
}

fn binary_face_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn parse_binary(bytes: &[u8]) -> IoResult<IndexedMesh> {
    let face_count = binary_face_count(bytes).ok_or(IoError::InvalidHeader {
        expected: HEADER_SIZE + 4,
        got: bytes.len(),
    })?;

    let body = &bytes[HEADER_SIZE + 4..];
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: a complete-face count never exceeds the announced u32 count
    let available = (body.len() / TRIANGLE_SIZE).min(face_count as usize) as u32;
    if available < face_count {
        return Err(IoError::InvalidFaceCount {
            expected: face_count,
            got: available,
        });
    }

    let mut mesh = IndexedMesh::with_capacity(face_count as usize * 3, face_count as usize);
    for triangle in body.chunks_exact(TRIANGLE_SIZE).take(face_count as usize) {
        // Skip the stored normal (12 bytes), corners follow
        mesh.push_triangle(
            read_point(&triangle[12..24]),
            read_point(&triangle[24..36]),
            read_point(&triangle[36..48]),
        );
    }

    Ok(mesh)
}

/// Read a point from 12 bytes (3 little-endian f32s).
fn read_point(buf: &[u8]) -> Point3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Point3::new(f64::from(x), f64::from(y), f64::from(z))
}

fn parse_ascii(text: &str) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();
    let mut in_loop = false;
    let mut corners: Vec<Point3<f64>> = Vec::with_capacity(3);

    for line in text.lines() {
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                corners.clear();
            }
            "vertex" => {
                if !in_loop {
                    return Err(IoError::invalid_content("vertex outside of a loop"));
                }
                let coords: Vec<&str> = parts.take(3).collect();
                if coords.len() < 3 {
                    return Err(IoError::invalid_content(format!(
                        "vertex with {} coordinates",
                        coords.len()
                    )));
                }
                corners.push(Point3::new(
                    coords[0].parse()?,
                    coords[1].parse()?,
                    coords[2].parse()?,
                ));
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                // Polygons that are not triangles are dropped
                if let [a, b, c] = corners[..] {
                    mesh.push_triangle(a, b, c);
                }
                corners.clear();
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(mesh)
}

/// Write a mesh as binary STL.
///
/// Face normals are computed from the winding; degenerate faces get a zero
/// normal.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_stl_binary<W: Write>(mesh: &IndexedMesh, mut writer: W) -> IoResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"binary STL written by mesh-io";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    let triangles: Vec<[Point3<f64>; 3]> = mesh
        .faces
        .iter()
        .filter_map(|&face| mesh.face_corners(face))
        .collect();

    #[allow(clippy::cast_possible_truncation)]
    // Face count: mesh faces limited to u32 range
    let face_count = triangles.len() as u32;
    writer.write_all(&face_count.to_le_bytes())?;

    for [v0, v1, v2] in &triangles {
        let normal = (v1 - v0).cross(&(v2 - v0));
        let normal = normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
        write_f32_triple(&mut writer, normal.x, normal.y, normal.z)?;
        for v in [v0, v1, v2] {
            write_f32_triple(&mut writer, v.x, v.y, v.z)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: f64 to f32 is intentional for STL format
fn write_f32_triple<W: Write>(writer: &mut W, x: f64, y: f64, z: f64) -> IoResult<()> {
    writer.write_all(&(x as f32).to_le_bytes())?;
    writer.write_all(&(y as f32).to_le_bytes())?;
    writer.write_all(&(z as f32).to_le_bytes())?;
    Ok(())
}
