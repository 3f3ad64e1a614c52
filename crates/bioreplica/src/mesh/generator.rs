//! Organ surface synthesis: sample, fit to size, triangulate.

use nalgebra::Point3;
use tracing::debug;

use crate::anthropometry::Dimensions;
use crate::catalog::{OrganType, ReferenceCatalog};
use crate::error::{ReplicaError, Result};

use super::adjustment::SizeAdjustment;
use super::hull::convex_hull;
use super::types::Mesh;

/// Builds a closed hull mesh for an organ archetype at a target size.
#[derive(Debug, Clone, Copy)]
pub struct ParametricMeshGenerator<'a> {
    catalog: &'a ReferenceCatalog,
}

impl<'a> ParametricMeshGenerator<'a> {
    pub fn new(catalog: &'a ReferenceCatalog) -> Self {
        Self { catalog }
    }

    /// Generate the hull mesh of the archetype's surface fitted to `dimensions`.
    ///
    /// Surface x, y and z map to width, length and height. Every sampled
    /// point is kept as a vertex; points inside the hull are left
    /// unreferenced.
    pub fn generate(&self, organ: OrganType, dimensions: &Dimensions) -> Result<Mesh> {
        let profile = self.catalog.geometry_profile(organ)?;

        let targets = [dimensions.width, dimensions.length, dimensions.height];
        if !targets.iter().all(|d| d.is_finite() && *d > 0.0) {
            return Err(ReplicaError::InvalidInput(format!(
                "mesh dimensions must be positive, got {:?}",
                dimensions
            )));
        }

        let surface = profile.surface;
        let nominal = surface.nominal_extent();
        let factors = [
            targets[0] / nominal.x,
            targets[1] / nominal.y,
            targets[2] / nominal.z,
        ];

        let vertices: Vec<Point3<f64>> = surface
            .sample_grid(profile.u_samples, profile.v_samples)
            .into_iter()
            .map(|p| Point3::new(p.x * factors[0], p.y * factors[1], p.z * factors[2]))
            .collect();

        let faces = convex_hull(&vertices)?;
        let mesh = Mesh::new(vertices, faces);

        debug!(
            organ = %organ,
            surface = ?surface,
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "generated hull mesh"
        );

        Ok(mesh)
    }

    /// Generate and then apply a uniform size adjustment.
    pub fn generate_adjusted(
        &self,
        organ: OrganType,
        dimensions: &Dimensions,
        adjustment: SizeAdjustment,
    ) -> Result<Mesh> {
        let mut mesh = self.generate(organ, dimensions)?;
        adjustment.apply(&mut mesh);
        Ok(mesh)
    }
}
