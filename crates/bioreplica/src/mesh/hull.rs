//! 3D convex hull of a sampled point cloud.
//!
//! Triangulation is done by `chull`. This module deduplicates the input,
//! maps the hull's vertices back onto the caller's point indices and orients
//! every face counter-clockwise seen from outside.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chull::ConvexHullWrapper;
use nalgebra::Point3;
use tracing::trace;

use crate::error::{ReplicaError, Result};

/// Minimum enclosed volume relative to the cube of the bounding diagonal.
const RELATIVE_VOLUME_EPSILON: f64 = 1e-12;

type PointKey = [u64; 3];

// -0.0 and 0.0 share a key
fn point_key(coords: [f64; 3]) -> PointKey {
    coords.map(|c| (c + 0.0).to_bits())
}

/// Compute the convex hull of `points`.
///
/// Returns triangles indexing into `points`. Duplicate points resolve to
/// their first occurrence; interior points are left unreferenced.
pub fn convex_hull(points: &[Point3<f64>]) -> Result<Vec<[u32; 3]>> {
    if points.len() < 4 {
        return Err(ReplicaError::DegenerateGeometry(format!(
            "a 3D hull needs at least 4 points, got {}",
            points.len()
        )));
    }
    if u32::try_from(points.len()).is_err() {
        return Err(ReplicaError::DegenerateGeometry(
            "point cloud exceeds u32 vertex indexing".to_string(),
        ));
    }
    if points.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return Err(ReplicaError::DegenerateGeometry(
            "point cloud contains non-finite coordinates".to_string(),
        ));
    }

    let mut index_of: HashMap<PointKey, u32> = HashMap::with_capacity(points.len());
    let mut unique: Vec<Vec<f64>> = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        if let Entry::Vacant(slot) = index_of.entry(point_key([p.x, p.y, p.z])) {
            slot.insert(i as u32);
            unique.push(vec![p.x + 0.0, p.y + 0.0, p.z + 0.0]);
        }
    }
    if unique.len() < 4 {
        return Err(ReplicaError::DegenerateGeometry(format!(
            "a 3D hull needs at least 4 distinct points, got {}",
            unique.len()
        )));
    }

    let hull = ConvexHullWrapper::try_new(&unique, None).map_err(|e| {
        ReplicaError::DegenerateGeometry(format!("point cloud does not span a 3D hull: {:?}", e))
    })?;
    let (vertices, indices) = hull.vertices_indices();

    let mut faces = Vec::with_capacity(indices.len() / 3);
    for triangle in indices.chunks_exact(3) {
        let mut face = [0u32; 3];
        for (slot, &local) in face.iter_mut().zip(triangle) {
            *slot = vertices
                .get(local)
                .and_then(|v| match v.as_slice() {
                    &[x, y, z] => index_of.get(&point_key([x, y, z])).copied(),
                    _ => None,
                })
                .ok_or_else(|| {
                    ReplicaError::DegenerateGeometry(format!(
                        "hull vertex {} does not match an input point",
                        local
                    ))
                })?;
        }
        faces.push(face);
    }

    let volume = signed_volume(points, &faces);
    let diagonal = bounding_diagonal(points);
    if faces.len() < 4 || volume.abs() <= RELATIVE_VOLUME_EPSILON * diagonal.powi(3) {
        return Err(ReplicaError::DegenerateGeometry(
            "points are coplanar".to_string(),
        ));
    }
    if volume < 0.0 {
        for face in &mut faces {
            face.swap(1, 2);
        }
    }

    trace!(
        points = points.len(),
        distinct = unique.len(),
        faces = faces.len(),
        "computed convex hull"
    );
    Ok(faces)
}

fn signed_volume(points: &[Point3<f64>], faces: &[[u32; 3]]) -> f64 {
    faces
        .iter()
        .map(|&[a, b, c]| {
            let [a, b, c] = [a, b, c].map(|i| points[i as usize].coords);
            a.dot(&b.cross(&c))
        })
        .sum::<f64>()
        / 6.0
}

fn bounding_diagonal(points: &[Point3<f64>]) -> f64 {
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    (max - min).norm()
}
