//! Immutable per-archetype configuration records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::anthropometry::Dimensions;

/// Reference patient and senescence constants for anthropometric scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingPolicy {
    /// Reference height (cm).
    pub reference_height_cm: f64,
    /// Reference weight (kg).
    pub reference_weight_kg: f64,
    /// Age after which organs shrink linearly (years).
    pub senescence_onset_years: u32,
    /// Fractional volume loss per year past the onset.
    pub senescence_rate_per_year: f64,
}

/// Parametric surface family used to sample an archetype's point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceFamily {
    /// Cardioid-like closed curve extruded along depth.
    Cardioid,
    /// Ellipsoid with a three-by-two lobed radial perturbation.
    LobedEllipsoid,
    /// Bean shape with a concave indentation.
    Bean,
    /// Ellipsoid with fold modulation and a z-axis ripple.
    FoldedEllipsoid,
}

/// Reference geometry of an archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryProfile {
    /// Reference organ volume for the reference patient (ml).
    pub base_volume_ml: f64,
    /// Reference linear dimensions (cm).
    pub base_dimensions: Dimensions,
    /// Exponent applied to the height ratio.
    pub height_exponent: f64,
    /// Exponent applied to the weight ratio.
    pub weight_exponent: f64,
    /// Surface family sampled for the mesh.
    pub surface: SurfaceFamily,
    /// Samples along the first surface parameter.
    pub u_samples: usize,
    /// Samples along the second surface parameter.
    pub v_samples: usize,
}

/// Fixed storage condition for prepared bioink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageTemperature {
    pub temperature_celsius: f64,
    pub temperature_fahrenheit: f64,
    pub notes: String,
}

/// Archetype-independent formulation constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulationPolicy {
    /// Multiplier from organ volume to printed bioink volume.
    pub waste_factor: f64,
    /// Component name given to the solvent residual.
    pub solvent_name: String,
    /// Solvent density (g/ml).
    pub solvent_density: f64,
    /// Weight at which the patient adjustment is log-neutral (kg).
    pub reference_weight_kg: f64,
    /// Lower clamp of the patient adjustment factor.
    pub min_adjustment: f64,
    /// Upper clamp of the patient adjustment factor.
    pub max_adjustment: f64,
    /// Storage condition reported for every archetype.
    pub storage_temperature: StorageTemperature,
}

/// Bioink recipe for an archetype. Concentrations are volume fractions (w/v).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulationProfile {
    /// Hydrogel and ECM components.
    pub base_components: IndexMap<String, f64>,
    /// Crosslinking agents added just before printing.
    pub crosslinking_agents: IndexMap<String, f64>,
    /// Target cell density for the reference patient (cells/ml).
    pub cell_density: f64,
    /// Printing viscosity (mPa·s).
    pub printing_viscosity: f64,
    /// Deposition rate (ml/hour).
    pub printing_rate_ml_per_hour: f64,
    /// Shelf life of the prepared bioink (hours).
    pub shelf_life_hours: f64,
}

/// How a scaffold component's mass is derived from the bioink volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum ScaffoldBasis {
    /// Porous printed framework occupying a share of the bioink volume.
    Porous { porosity: f64 },
    /// Material dispersed at a fixed concentration.
    Dispersed { concentration: f64 },
    /// Structural feature specified by geometry only; not quantified.
    Structural,
}

/// One scaffold material entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldComponent {
    /// Material density (g/ml).
    pub density: f64,
    #[serde(flatten)]
    pub basis: ScaffoldBasis,
    /// Descriptive attributes carried through to the output.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, Value>,
}

/// Scaffold and maturation profile of an archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProfile {
    pub scaffold: IndexMap<String, ScaffoldComponent>,
    /// Growth factors required for this archetype, in order.
    pub growth_factors: Vec<String>,
    pub electrical_stimulation: bool,
    pub flow_perfusion: bool,
}

/// Scaffold allocation and pricing fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldPolicy {
    /// Share of the bioink volume allocated to porous scaffolds.
    pub volume_fraction: f64,
    /// Price used when no unit cost matches a material (USD/kg).
    pub default_cost_per_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthFactorSpec {
    pub molecular_weight: f64,
    pub units_per_mg: f64,
    pub cost_per_mg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinSpec {
    pub concentration_mg_ml: f64,
    pub cost_per_g: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientSpec {
    pub concentration_mg_ml: f64,
    pub cost_per_kg: f64,
}

/// Catalog of biological supplements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiologicalCatalog {
    pub growth_factors: IndexMap<String, GrowthFactorSpec>,
    /// Flat growth factor target concentration (ng/ml).
    pub growth_factor_target_ng_ml: f64,
    pub extracellular_proteins: IndexMap<String, ProteinSpec>,
    pub cell_nutrients: IndexMap<String, NutrientSpec>,
}

/// Culture, antibiotic, maturation and QC constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostProcessingPolicy {
    /// Culture medium volume per ml of bioink.
    pub medium_volume_multiplier: f64,
    pub medium_changes_per_week: u32,
    pub culture_duration_weeks: u32,
    pub medium_cost_per_liter: f64,
    /// Antibiotic volume per ml of bioink.
    pub antibiotic_fraction: f64,
    pub antibiotic_cost_per_ml: f64,
    pub maturation_cost_per_ml: f64,
    /// Fixed quality-control line items (USD).
    pub quality_control: IndexMap<String, f64>,
}

/// Flat costs and overhead applied to every requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostPolicy {
    pub labor_usd: f64,
    pub equipment_usd: f64,
    pub overhead_rate: f64,
}

/// Inclusive volume range (ml).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRange {
    pub min_ml: f64,
    pub max_ml: f64,
}

impl VolumeRange {
    pub fn contains(&self, volume_ml: f64) -> bool {
        volume_ml >= self.min_ml && volume_ml <= self.max_ml
    }
}

/// Static anatomical reference data for an archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganReference {
    pub typical_volume: VolumeRange,
    /// Native tissue density (g/ml).
    pub tissue_density_g_ml: f64,
    /// Cell-type fractions of the native tissue.
    pub cellular_composition: IndexMap<String, f64>,
}
