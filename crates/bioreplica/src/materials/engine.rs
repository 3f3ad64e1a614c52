//! Scaffold, biological and post-processing requirements with cost rollup.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{MaterialProfile, OrganType, ReferenceCatalog, ScaffoldBasis};
use crate::error::{ReplicaError, Result};

use super::handling::{SafetyRequirements, StorageRequirements};

/// One scaffold line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldMaterial {
    pub mass_g: f64,
    /// Solid volume, for porous scaffolds only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_ml: Option<f64>,
    /// Dispersion concentration, for dispersed components only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration: Option<f64>,
    pub cost_usd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalKind {
    GrowthFactor,
    ExtracellularProtein,
    CellNutrient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MassUnit {
    #[serde(rename = "mg")]
    Milligram,
    #[serde(rename = "g")]
    Gram,
}

impl MassUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::Milligram => "mg",
            MassUnit::Gram => "g",
        }
    }
}

/// One biological line item.
///
/// Growth factors are dosed in mg at a target concentration in ng/ml;
/// proteins and nutrients are dosed in g at a concentration in mg/ml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiologicalMaterial {
    pub kind: BiologicalKind,
    pub amount: f64,
    pub unit: MassUnit,
    pub target_concentration: f64,
    pub cost_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molecular_weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureMedium {
    /// Medium held by the culture vessel (ml).
    pub volume_ml: f64,
    pub changes_per_week: u32,
    pub culture_duration_weeks: u32,
    pub cost_per_liter: f64,
    /// Medium consumed over the whole maturation window (ml).
    pub total_volume_ml: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Antibiotics {
    pub penicillin_streptomycin_ml: f64,
    pub cost_per_ml: f64,
    pub cost_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturationPlan {
    pub mechanical_stimulation: bool,
    pub electrical_stimulation: bool,
    pub flow_perfusion: bool,
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostProcessing {
    pub culture_medium: CultureMedium,
    pub antibiotics: Antibiotics,
    pub maturation: MaturationPlan,
    /// Flat per-construct assay costs (USD).
    pub quality_control: IndexMap<String, f64>,
}

/// Cost rollup (USD).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub scaffold_materials: f64,
    pub biological_materials: f64,
    pub culture_medium: f64,
    pub antibiotics: f64,
    pub maturation: f64,
    pub quality_control: f64,
    pub labor_estimate: f64,
    pub equipment_usage: f64,
    pub subtotal: f64,
    pub overhead: f64,
    pub overhead_rate: f64,
    pub total_estimated_cost: f64,
}

/// Everything needed to print and mature one construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequirement {
    pub organ: OrganType,
    pub bioink_volume_ml: f64,
    pub scaffold_materials: IndexMap<String, ScaffoldMaterial>,
    pub biological_materials: IndexMap<String, BiologicalMaterial>,
    pub post_processing: PostProcessing,
    pub cost_breakdown: CostBreakdown,
    pub material_safety: SafetyRequirements,
    pub storage_requirements: StorageRequirements,
}

/// Computes material requirements from catalog material profiles.
#[derive(Debug, Clone, Copy)]
pub struct MaterialRequirementEngine<'a> {
    catalog: &'a ReferenceCatalog,
}

impl<'a> MaterialRequirementEngine<'a> {
    pub fn new(catalog: &'a ReferenceCatalog) -> Self {
        Self { catalog }
    }

    /// Compute requirements for `bioink_volume_ml` of bioink.
    pub fn calculate(
        &self,
        organ: OrganType,
        bioink_volume_ml: f64,
    ) -> Result<MaterialRequirement> {
        let profile = self.catalog.material_profile(organ)?;

        if !(bioink_volume_ml.is_finite() && bioink_volume_ml > 0.0) {
            return Err(ReplicaError::InvalidInput(format!(
                "bioink volume must be positive, got {}",
                bioink_volume_ml
            )));
        }

        let scaffold_materials = self.scaffold_materials(profile, bioink_volume_ml);
        let biological_materials = self.biological_materials(organ, profile, bioink_volume_ml);
        let post_processing = self.post_processing(profile, bioink_volume_ml);
        let cost_breakdown =
            self.cost_breakdown(&scaffold_materials, &biological_materials, &post_processing);

        debug!(
            organ = %organ,
            bioink_volume_ml,
            scaffold_items = scaffold_materials.len(),
            biological_items = biological_materials.len(),
            total_cost = cost_breakdown.total_estimated_cost,
            "calculated material requirements"
        );

        Ok(MaterialRequirement {
            organ,
            bioink_volume_ml,
            scaffold_materials,
            biological_materials,
            post_processing,
            cost_breakdown,
            material_safety: SafetyRequirements::standard(),
            storage_requirements: StorageRequirements::standard(),
        })
    }

    fn scaffold_materials(
        &self,
        profile: &MaterialProfile,
        volume: f64,
    ) -> IndexMap<String, ScaffoldMaterial> {
        let fraction = self.catalog.scaffold_policy.volume_fraction;
        let mut materials = IndexMap::new();

        for (name, component) in &profile.scaffold {
            let item = match component.basis {
                ScaffoldBasis::Porous { porosity } => {
                    let solid_volume = volume * (1.0 - porosity) * fraction;
                    let mass_g = solid_volume * component.density;
                    ScaffoldMaterial {
                        mass_g,
                        volume_ml: Some(solid_volume),
                        concentration: None,
                        cost_usd: self.material_cost(name, mass_g),
                    }
                }
                ScaffoldBasis::Dispersed { concentration } => {
                    let mass_g = volume * concentration * component.density;
                    ScaffoldMaterial {
                        mass_g,
                        volume_ml: None,
                        concentration: Some(concentration),
                        cost_usd: self.material_cost(name, mass_g),
                    }
                }
                // Channels, membranes and coatings are printed, not procured.
                ScaffoldBasis::Structural => continue,
            };
            materials.insert(name.clone(), item);
        }

        materials
    }

    fn material_cost(&self, name: &str, mass_g: f64) -> f64 {
        mass_g * self.catalog.unit_cost_per_kg(name) / 1000.0
    }

    fn biological_materials(
        &self,
        organ: OrganType,
        profile: &MaterialProfile,
        volume: f64,
    ) -> IndexMap<String, BiologicalMaterial> {
        let biologicals = &self.catalog.biologicals;
        let mut materials = IndexMap::new();

        let target_ng_ml = biologicals.growth_factor_target_ng_ml;
        for factor in &profile.growth_factors {
            let Some(spec) = biologicals.growth_factors.get(factor) else {
                warn!(
                    organ = %organ,
                    factor = %factor,
                    "growth factor missing from catalog, skipped"
                );
                continue;
            };
            let total_mg = volume * target_ng_ml / 1e6;
            materials.insert(
                factor.clone(),
                BiologicalMaterial {
                    kind: BiologicalKind::GrowthFactor,
                    amount: total_mg,
                    unit: MassUnit::Milligram,
                    target_concentration: target_ng_ml,
                    cost_usd: total_mg * spec.cost_per_mg,
                    molecular_weight: Some(spec.molecular_weight),
                },
            );
        }

        for (name, spec) in &biologicals.extracellular_proteins {
            let amount_g = volume * spec.concentration_mg_ml / 1000.0;
            materials.insert(
                name.clone(),
                BiologicalMaterial {
                    kind: BiologicalKind::ExtracellularProtein,
                    amount: amount_g,
                    unit: MassUnit::Gram,
                    target_concentration: spec.concentration_mg_ml,
                    cost_usd: amount_g * spec.cost_per_g,
                    molecular_weight: None,
                },
            );
        }

        for (name, spec) in &biologicals.cell_nutrients {
            let amount_g = volume * spec.concentration_mg_ml / 1000.0;
            materials.insert(
                name.clone(),
                BiologicalMaterial {
                    kind: BiologicalKind::CellNutrient,
                    amount: amount_g,
                    unit: MassUnit::Gram,
                    target_concentration: spec.concentration_mg_ml,
                    cost_usd: amount_g * spec.cost_per_kg / 1000.0,
                    molecular_weight: None,
                },
            );
        }

        materials
    }

    fn post_processing(&self, profile: &MaterialProfile, volume: f64) -> PostProcessing {
        let policy = &self.catalog.post_processing;

        let medium_volume = volume * policy.medium_volume_multiplier;
        let total_medium = medium_volume
            * f64::from(policy.medium_changes_per_week)
            * f64::from(policy.culture_duration_weeks);

        let antibiotic_ml = volume * policy.antibiotic_fraction;

        PostProcessing {
            culture_medium: CultureMedium {
                volume_ml: medium_volume,
                changes_per_week: policy.medium_changes_per_week,
                culture_duration_weeks: policy.culture_duration_weeks,
                cost_per_liter: policy.medium_cost_per_liter,
                total_volume_ml: total_medium,
                total_cost: total_medium / 1000.0 * policy.medium_cost_per_liter,
            },
            antibiotics: Antibiotics {
                penicillin_streptomycin_ml: antibiotic_ml,
                cost_per_ml: policy.antibiotic_cost_per_ml,
                cost_usd: antibiotic_ml * policy.antibiotic_cost_per_ml,
            },
            maturation: MaturationPlan {
                mechanical_stimulation: true,
                electrical_stimulation: profile.electrical_stimulation,
                flow_perfusion: profile.flow_perfusion,
                estimated_cost: volume * policy.maturation_cost_per_ml,
            },
            quality_control: policy.quality_control.clone(),
        }
    }

    fn cost_breakdown(
        &self,
        scaffold: &IndexMap<String, ScaffoldMaterial>,
        biological: &IndexMap<String, BiologicalMaterial>,
        post: &PostProcessing,
    ) -> CostBreakdown {
        let costs = &self.catalog.costs;

        let scaffold_materials: f64 = scaffold.values().map(|m| m.cost_usd).sum();
        let biological_materials: f64 = biological.values().map(|m| m.cost_usd).sum();
        let quality_control: f64 = post.quality_control.values().sum();

        let subtotal = scaffold_materials
            + biological_materials
            + post.culture_medium.total_cost
            + post.antibiotics.cost_usd
            + post.maturation.estimated_cost
            + quality_control
            + costs.labor_usd
            + costs.equipment_usd;

        CostBreakdown {
            scaffold_materials,
            biological_materials,
            culture_medium: post.culture_medium.total_cost,
            antibiotics: post.antibiotics.cost_usd,
            maturation: post.maturation.estimated_cost,
            quality_control,
            labor_estimate: costs.labor_usd,
            equipment_usage: costs.equipment_usd,
            subtotal,
            overhead: subtotal * costs.overhead_rate,
            overhead_rate: costs.overhead_rate,
            // exactly subtotal * (1 + rate)
            total_estimated_cost: subtotal * (1.0 + costs.overhead_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn calculate(organ: OrganType, volume: f64) -> MaterialRequirement {
        MaterialRequirementEngine::new(ReferenceCatalog::builtin())
            .calculate(organ, volume)
            .unwrap()
    }

    #[test]
    fn test_kidney_culture_medium() {
        let requirement = calculate(OrganType::Kidney, 100.0);
        let medium = &requirement.post_processing.culture_medium;
        assert_eq!(medium.volume_ml, 500.0);
        assert_eq!(medium.total_volume_ml, 6000.0);
        assert_eq!(medium.total_cost, 150.0);
        assert!(requirement.post_processing.maturation.flow_perfusion);
        assert!(!requirement.post_processing.maturation.electrical_stimulation);
    }

    #[test]
    fn test_scaffold_items() {
        let requirement = calculate(OrganType::Heart, 100.0);
        let scaffold = &requirement.scaffold_materials;

        let pcl = &scaffold["pcl_fibers"];
        assert_relative_eq!(pcl.volume_ml.unwrap(), 100.0 * 0.15 * 0.3, max_relative = 1e-12);
        assert_relative_eq!(pcl.mass_g, 100.0 * 0.15 * 0.3 * 1.145, max_relative = 1e-12);
        // "pcl" is not a priced prefix, so the default rate applies
        assert_relative_eq!(pcl.cost_usd, pcl.mass_g * 50.0 / 1000.0);

        let collagen = &scaffold["collagen_matrix"];
        assert_relative_eq!(collagen.mass_g, 6.5, max_relative = 1e-12);
        assert_relative_eq!(collagen.cost_usd, 6.5 * 180.0 / 1000.0, max_relative = 1e-12);
        assert_eq!(collagen.volume_ml, None);
    }

    #[test]
    fn test_structural_items_are_skipped() {
        let requirement = calculate(OrganType::Liver, 100.0);
        assert_eq!(requirement.scaffold_materials.len(), 3);
        assert!(!requirement.scaffold_materials.contains_key("vascular_channels"));
    }

    #[test]
    fn test_growth_factor_sets() {
        let names = |organ| {
            calculate(organ, 10.0)
                .biological_materials
                .iter()
                .filter(|(_, m)| m.kind == BiologicalKind::GrowthFactor)
                .map(|(name, _)| name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(OrganType::Heart), ["vegf", "bfgf", "pdgf"]);
        assert_eq!(names(OrganType::Liver), ["vegf", "bfgf", "tgf_beta"]);
        assert_eq!(names(OrganType::Kidney), ["vegf", "tgf_beta", "pdgf"]);
        assert_eq!(names(OrganType::Ear), ["tgf_beta", "bfgf"]);
    }

    #[test]
    fn test_biological_amounts() {
        let requirement = calculate(OrganType::Ear, 200.0);
        let tgf = &requirement.biological_materials["tgf_beta"];
        assert_eq!(tgf.unit, MassUnit::Milligram);
        assert_relative_eq!(tgf.amount, 0.01, max_relative = 1e-12);
        assert_relative_eq!(tgf.cost_usd, 3.2, max_relative = 1e-12);

        let glucose = &requirement.biological_materials["glucose"];
        assert_eq!(glucose.unit, MassUnit::Gram);
        assert_relative_eq!(glucose.amount, 0.9, max_relative = 1e-12);
        assert_relative_eq!(glucose.cost_usd, 0.9 * 2.5 / 1000.0, max_relative = 1e-12);

        // every protein and nutrient, regardless of organ
        assert_eq!(requirement.biological_materials.len(), 2 + 5 + 4);
    }

    #[test]
    fn test_cost_rollup() {
        let requirement = calculate(OrganType::Heart, 387.5);
        let costs = &requirement.cost_breakdown;
        assert_eq!(costs.quality_control, 750.0);
        assert_eq!(costs.labor_estimate, 2500.0);
        assert_eq!(costs.equipment_usage, 800.0);
        assert_eq!(costs.total_estimated_cost, costs.subtotal * 1.2);
        assert_relative_eq!(
            costs.subtotal + costs.overhead,
            costs.total_estimated_cost,
            max_relative = 1e-12
        );
        let parts = costs.scaffold_materials
            + costs.biological_materials
            + costs.culture_medium
            + costs.antibiotics
            + costs.maturation
            + costs.quality_control
            + costs.labor_estimate
            + costs.equipment_usage;
        assert_eq!(parts, costs.subtotal);
    }

    #[test]
    fn test_missing_material_profile() {
        let mut catalog = ReferenceCatalog::builtin().clone();
        catalog.materials.shift_remove(&OrganType::Heart);
        let err = MaterialRequirementEngine::new(&catalog)
            .calculate(OrganType::Heart, 100.0)
            .unwrap_err();
        assert!(matches!(err, ReplicaError::UnsupportedOrgan(_)));
    }

    #[test]
    fn test_rejects_non_positive_volume() {
        let engine = MaterialRequirementEngine::new(ReferenceCatalog::builtin());
        assert!(matches!(
            engine.calculate(OrganType::Ear, -1.0),
            Err(ReplicaError::InvalidInput(_))
        ));
    }
}
