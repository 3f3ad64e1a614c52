//! Reference catalog: immutable per-archetype configuration.
//!
//! Every engine borrows a [`ReferenceCatalog`] instead of embedding its own
//! tables, so requests can run in parallel against the same catalog and tests
//! can swap in a modified one. Geometry, formulation and material profiles
//! live in three independent maps; an organ missing from one of them fails
//! only at the stage that consults that map.
//!
//! ```
//! use bioreplica::catalog::{OrganType, ReferenceCatalog};
//!
//! let catalog = ReferenceCatalog::builtin();
//! let heart = catalog.geometry_profile(OrganType::Heart).unwrap();
//! assert_eq!(heart.base_volume_ml, 310.0);
//! ```

mod builtin;
mod organ;
mod profiles;

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{ReplicaError, Result};

pub use organ::OrganType;
pub use profiles::{
    BiologicalCatalog, CostPolicy, FormulationPolicy, FormulationProfile, GeometryProfile,
    GrowthFactorSpec, MaterialProfile, NutrientSpec, OrganReference, PostProcessingPolicy,
    ProteinSpec, ScaffoldBasis, ScaffoldComponent, ScaffoldPolicy, ScalingPolicy,
    StorageTemperature, SurfaceFamily, VolumeRange,
};

static BUILTIN: Lazy<ReferenceCatalog> = Lazy::new(builtin::catalog);

/// All reference constants consumed by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCatalog {
    pub scaling: ScalingPolicy,
    pub geometry: IndexMap<OrganType, GeometryProfile>,
    pub formulation_policy: FormulationPolicy,
    pub formulations: IndexMap<OrganType, FormulationProfile>,
    /// Component densities (g/ml).
    pub densities: IndexMap<String, f64>,
    pub materials: IndexMap<OrganType, MaterialProfile>,
    pub scaffold_policy: ScaffoldPolicy,
    /// Unit prices keyed by material prefix (USD/kg).
    pub unit_costs_per_kg: IndexMap<String, f64>,
    pub biologicals: BiologicalCatalog,
    pub post_processing: PostProcessingPolicy,
    pub costs: CostPolicy,
    #[serde(default)]
    pub references: IndexMap<OrganType, OrganReference>,
    /// Organ volumes the printer can realistically produce.
    pub printable_volume: VolumeRange,
}

impl ReferenceCatalog {
    /// The built-in catalog, constructed once per process.
    pub fn builtin() -> &'static ReferenceCatalog {
        &BUILTIN
    }

    /// Load a catalog from a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: ReferenceCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ReplicaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&contents)
    }

    /// Serialize the catalog as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Supported organs and their labels, for UI population.
    ///
    /// An organ is listed when it has a geometry profile; later stages may
    /// still reject it if their own profile is missing.
    pub fn organ_labels(&self) -> Vec<(&'static str, &'static str)> {
        self.geometry
            .keys()
            .map(|organ| (organ.as_str(), organ.label()))
            .collect()
    }

    pub fn geometry_profile(&self, organ: OrganType) -> Result<&GeometryProfile> {
        self.geometry
            .get(&organ)
            .ok_or_else(|| unsupported(organ, "geometry"))
    }

    pub fn formulation_profile(&self, organ: OrganType) -> Result<&FormulationProfile> {
        self.formulations
            .get(&organ)
            .ok_or_else(|| unsupported(organ, "formulation"))
    }

    pub fn material_profile(&self, organ: OrganType) -> Result<&MaterialProfile> {
        self.materials
            .get(&organ)
            .ok_or_else(|| unsupported(organ, "material"))
    }

    /// Reference anatomy is optional; absent entries disable range advisories.
    pub fn organ_reference(&self, organ: OrganType) -> Option<&OrganReference> {
        self.references.get(&organ)
    }

    /// Density of a named formulation component.
    pub fn density(&self, component: &str) -> Result<f64> {
        self.densities
            .get(component)
            .copied()
            .ok_or_else(|| ReplicaError::Catalog(format!("no density for '{}'", component)))
    }

    /// Unit price for a material, keyed by its first underscore-delimited token.
    pub fn unit_cost_per_kg(&self, material: &str) -> f64 {
        let prefix = material.split('_').next().unwrap_or(material);
        self.unit_costs_per_kg
            .get(prefix)
            .copied()
            .unwrap_or(self.scaffold_policy.default_cost_per_kg)
    }

    /// Check internal consistency.
    ///
    /// Concentrations that sum above one are deliberately not rejected here;
    /// that surfaces as a formulation consistency error for the affected organ.
    pub fn validate(&self) -> Result<()> {
        let scaling = &self.scaling;
        if !(scaling.reference_height_cm > 0.0 && scaling.reference_weight_kg > 0.0) {
            return Err(ReplicaError::Catalog(
                "reference height and weight must be positive".to_string(),
            ));
        }

        for (organ, profile) in &self.geometry {
            if !(profile.base_volume_ml > 0.0) || !profile.base_dimensions.is_positive() {
                return Err(ReplicaError::Catalog(format!(
                    "{}: base volume and dimensions must be positive",
                    organ
                )));
            }
            if profile.u_samples < 3 || profile.v_samples < 2 {
                return Err(ReplicaError::Catalog(format!(
                    "{}: surface grid {}x{} is too coarse",
                    organ, profile.u_samples, profile.v_samples
                )));
            }
        }

        for (organ, profile) in &self.formulations {
            for (name, concentration) in profile
                .base_components
                .iter()
                .chain(profile.crosslinking_agents.iter())
            {
                if *concentration < 0.0 {
                    return Err(ReplicaError::Catalog(format!(
                        "{}: negative concentration for '{}'",
                        organ, name
                    )));
                }
                self.density(name)?;
            }
            if !(profile.printing_rate_ml_per_hour > 0.0) {
                return Err(ReplicaError::Catalog(format!(
                    "{}: printing rate must be positive",
                    organ
                )));
            }
        }

        for (organ, profile) in &self.materials {
            for (name, component) in &profile.scaffold {
                if let ScaffoldBasis::Porous { porosity } = component.basis {
                    if !(0.0..=1.0).contains(&porosity) {
                        return Err(ReplicaError::Catalog(format!(
                            "{}: porosity of '{}' must be within [0, 1]",
                            organ, name
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        builtin::catalog()
    }
}

fn unsupported(organ: OrganType, stage: &str) -> ReplicaError {
    ReplicaError::UnsupportedOrgan(format!("{} (no {} profile)", organ, stage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        ReferenceCatalog::builtin().validate().unwrap();
    }

    #[test]
    fn test_builtin_covers_every_organ() {
        let catalog = ReferenceCatalog::builtin();
        for organ in OrganType::all() {
            assert!(catalog.geometry_profile(*organ).is_ok());
            assert!(catalog.formulation_profile(*organ).is_ok());
            assert!(catalog.material_profile(*organ).is_ok());
            assert!(catalog.organ_reference(*organ).is_some());
        }
    }

    #[test]
    fn test_organ_labels() {
        let labels = ReferenceCatalog::builtin().organ_labels();
        assert_eq!(
            labels,
            vec![
                ("heart", "Human Heart"),
                ("liver", "Human Liver"),
                ("kidney", "Human Kidney"),
                ("ear", "Human Ear"),
            ]
        );
    }

    #[test]
    fn test_unit_cost_uses_first_token() {
        let catalog = ReferenceCatalog::builtin();
        assert_eq!(catalog.unit_cost_per_kg("collagen_matrix"), 180.0);
        // "pcl_fibers" is priced under its full name, which the prefix never matches.
        assert_eq!(catalog.unit_cost_per_kg("pcl_fibers"), 50.0);
        assert_eq!(catalog.unit_cost_per_kg("alginate"), 45.0);
    }

    #[test]
    fn test_json_round_trip() {
        let catalog = ReferenceCatalog::builtin();
        let json = catalog.to_json_pretty().unwrap();
        let loaded = ReferenceCatalog::from_json_str(&json).unwrap();
        assert_eq!(&loaded, catalog);
    }

    #[test]
    fn test_missing_density_rejected() {
        let mut catalog = ReferenceCatalog::default();
        catalog.densities.shift_remove("thrombin");
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, ReplicaError::Catalog(ref msg) if msg.contains("thrombin")));
    }

    #[test]
    fn test_missing_stage_profile_is_unsupported() {
        let mut catalog = ReferenceCatalog::default();
        catalog.materials.shift_remove(&OrganType::Ear);
        assert!(catalog.geometry_profile(OrganType::Ear).is_ok());
        assert!(matches!(
            catalog.material_profile(OrganType::Ear),
            Err(ReplicaError::UnsupportedOrgan(_))
        ));
    }
}
