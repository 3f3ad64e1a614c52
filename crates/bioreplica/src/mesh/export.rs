//! STL export.
//!
//! Export is the only side effect in the mesh module and runs on an already
//! computed [`Mesh`]; a failed write leaves every in-memory result intact.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReplicaError, Result};

use super::types::Mesh;

/// Size of the binary STL header in bytes.
const HEADER_SIZE: usize = 80;

/// STL encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StlFormat {
    Ascii,
    #[default]
    Binary,
}

impl FromStr for StlFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascii" | "text" => Ok(StlFormat::Ascii),
            "binary" | "bin" => Ok(StlFormat::Binary),
            _ => Err(format!("Unknown STL format: {}. Use ascii or binary.", s)),
        }
    }
}

impl fmt::Display for StlFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StlFormat::Ascii => write!(f, "ascii"),
            StlFormat::Binary => write!(f, "binary"),
        }
    }
}

/// Write `mesh` to a file, creating parent directories as needed.
pub fn export_stl(mesh: &Mesh, path: impl AsRef<Path>, format: StlFormat) -> Result<()> {
    let path = path.as_ref();
    let export_error = |source| ReplicaError::Export {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(export_error)?;
        }
    }

    let file = File::create(path).map_err(export_error)?;
    let mut writer = BufWriter::new(file);
    write_stl(mesh, &mut writer, format).map_err(export_error)?;
    writer.flush().map_err(export_error)?;

    debug!(
        path = %path.display(),
        faces = mesh.face_count(),
        %format,
        "exported STL"
    );
    Ok(())
}

/// Encode `mesh` as STL into any writer.
pub fn write_stl<W: Write>(mesh: &Mesh, writer: W, format: StlFormat) -> io::Result<()> {
    if !mesh.indices_in_range() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "mesh face references a missing vertex",
        ));
    }
    match format {
        StlFormat::Ascii => write_ascii(mesh, writer),
        StlFormat::Binary => write_binary(mesh, writer),
    }
}

fn facet_normal(triangle: &[Point3<f64>; 3]) -> Vector3<f64> {
    let [a, b, c] = triangle;
    let normal = (b - a).cross(&(c - a));
    let len = normal.norm();
    if len > f64::EPSILON {
        normal / len
    } else {
        Vector3::zeros()
    }
}

fn write_binary<W: Write>(mesh: &Mesh, mut writer: W) -> io::Result<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"Binary STL generated by bioreplica";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    let face_count = u32::try_from(mesh.faces.len()).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "too many faces for binary STL")
    })?;
    writer.write_all(&face_count.to_le_bytes())?;

    for face in &mesh.faces {
        let triangle = mesh.triangle(face);
        // STL stores single precision
        for value in facet_normal(&triangle).iter() {
            writer.write_all(&(*value as f32).to_le_bytes())?;
        }
        for vertex in &triangle {
            for value in vertex.coords.iter() {
                writer.write_all(&(*value as f32).to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

fn write_ascii<W: Write>(mesh: &Mesh, mut writer: W) -> io::Result<()> {
    writeln!(writer, "solid replica")?;
    for face in &mesh.faces {
        let triangle = mesh.triangle(face);
        let n = facet_normal(&triangle);
        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in &triangle {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid replica")?;
    Ok(())
}
