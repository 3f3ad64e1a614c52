//! Built-in reference tables.
//!
//! Values describe an adult reference patient (175 cm, 70 kg, 30 years).
//! Concentrations are w/v fractions, densities g/ml, prices USD.

use indexmap::IndexMap;
use serde_json::json;

use crate::anthropometry::Dimensions;

use super::organ::OrganType;
use super::profiles::*;
use super::ReferenceCatalog;

fn table(entries: &[(&str, f64)]) -> IndexMap<String, f64> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

fn porous(density: f64, porosity: f64, attribute: (&str, serde_json::Value)) -> ScaffoldComponent {
    ScaffoldComponent {
        density,
        basis: ScaffoldBasis::Porous { porosity },
        attributes: IndexMap::from([(attribute.0.to_string(), attribute.1)]),
    }
}

fn dispersed(density: f64, concentration: f64) -> ScaffoldComponent {
    ScaffoldComponent {
        density,
        basis: ScaffoldBasis::Dispersed { concentration },
        attributes: IndexMap::new(),
    }
}

fn structural(density: f64, attributes: &[(&str, serde_json::Value)]) -> ScaffoldComponent {
    ScaffoldComponent {
        density,
        basis: ScaffoldBasis::Structural,
        attributes: attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    }
}

fn geometry() -> IndexMap<OrganType, GeometryProfile> {
    IndexMap::from([
        (
            OrganType::Heart,
            GeometryProfile {
                base_volume_ml: 310.0,
                base_dimensions: Dimensions::new(12.0, 8.5, 6.0),
                height_exponent: 0.7,
                weight_exponent: 0.3,
                surface: SurfaceFamily::Cardioid,
                u_samples: 50,
                v_samples: 20,
            },
        ),
        (
            OrganType::Liver,
            GeometryProfile {
                base_volume_ml: 1400.0,
                base_dimensions: Dimensions::new(26.0, 15.0, 8.0),
                height_exponent: 0.8,
                weight_exponent: 0.2,
                surface: SurfaceFamily::LobedEllipsoid,
                u_samples: 30,
                v_samples: 40,
            },
        ),
        (
            OrganType::Kidney,
            GeometryProfile {
                base_volume_ml: 150.0,
                base_dimensions: Dimensions::new(11.0, 6.0, 3.0),
                height_exponent: 0.6,
                weight_exponent: 0.4,
                surface: SurfaceFamily::Bean,
                u_samples: 40,
                v_samples: 30,
            },
        ),
        (
            OrganType::Ear,
            GeometryProfile {
                base_volume_ml: 8.0,
                base_dimensions: Dimensions::new(6.5, 3.5, 2.5),
                height_exponent: 0.9,
                weight_exponent: 0.1,
                surface: SurfaceFamily::FoldedEllipsoid,
                u_samples: 25,
                v_samples: 20,
            },
        ),
    ])
}

fn formulations() -> IndexMap<OrganType, FormulationProfile> {
    IndexMap::from([
        (
            OrganType::Heart,
            FormulationProfile {
                base_components: table(&[
                    ("alginate", 0.02),
                    ("gelatin", 0.05),
                    ("hyaluronic_acid", 0.01),
                    ("collagen", 0.03),
                    ("fibrinogen", 0.002),
                ]),
                crosslinking_agents: table(&[("calcium_chloride", 0.001), ("thrombin", 0.0001)]),
                cell_density: 20e6,
                printing_viscosity: 1500.0,
                printing_rate_ml_per_hour: 8.0,
                shelf_life_hours: 24.0,
            },
        ),
        (
            OrganType::Liver,
            FormulationProfile {
                base_components: table(&[
                    ("alginate", 0.015),
                    ("gelatin", 0.06),
                    ("hyaluronic_acid", 0.008),
                    ("chitosan", 0.01),
                    ("decellularized_ecm", 0.02),
                ]),
                crosslinking_agents: table(&[("calcium_chloride", 0.0008), ("genipin", 0.0002)]),
                cell_density: 15e6,
                printing_viscosity: 1200.0,
                printing_rate_ml_per_hour: 12.0,
                shelf_life_hours: 48.0,
            },
        ),
        (
            OrganType::Kidney,
            FormulationProfile {
                base_components: table(&[
                    ("alginate", 0.025),
                    ("gelatin", 0.04),
                    ("hyaluronic_acid", 0.012),
                    ("peg_diacrylate", 0.015),
                    ("laminin", 0.001),
                ]),
                crosslinking_agents: table(&[
                    ("calcium_chloride", 0.0012),
                    ("photoinitiator", 0.0001),
                ]),
                cell_density: 25e6,
                printing_viscosity: 1800.0,
                printing_rate_ml_per_hour: 10.0,
                shelf_life_hours: 36.0,
            },
        ),
        (
            OrganType::Ear,
            FormulationProfile {
                base_components: table(&[
                    ("alginate", 0.018),
                    ("gelatin", 0.045),
                    ("hyaluronic_acid", 0.006),
                    ("chondroitin_sulfate", 0.008),
                    ("agarose", 0.005),
                ]),
                crosslinking_agents: table(&[("calcium_chloride", 0.0009)]),
                cell_density: 30e6,
                printing_viscosity: 2000.0,
                printing_rate_ml_per_hour: 15.0,
                shelf_life_hours: 72.0,
            },
        ),
    ])
}

fn materials() -> IndexMap<OrganType, MaterialProfile> {
    IndexMap::from([
        (
            OrganType::Heart,
            MaterialProfile {
                scaffold: IndexMap::from([
                    ("pcl_fibers".to_string(), porous(1.145, 0.85, ("fiber_diameter", json!(0.1)))),
                    ("collagen_matrix".to_string(), dispersed(1.3, 0.05)),
                    ("elastin_fibers".to_string(), dispersed(1.2, 0.02)),
                    ("conductive_nanoparticles".to_string(), dispersed(5.2, 0.001)),
                ]),
                growth_factors: vec!["vegf".into(), "bfgf".into(), "pdgf".into()],
                electrical_stimulation: true,
                flow_perfusion: false,
            },
        ),
        (
            OrganType::Liver,
            MaterialProfile {
                scaffold: IndexMap::from([
                    (
                        "pla_framework".to_string(),
                        porous(1.24, 0.80, ("layer_thickness", json!(0.2))),
                    ),
                    ("hepatocyte_matrix".to_string(), dispersed(1.1, 0.08)),
                    ("growth_factors".to_string(), dispersed(1.0, 0.0005)),
                    (
                        "vascular_channels".to_string(),
                        structural(1.19, &[("material", json!("pva")), ("diameter", json!(0.5))]),
                    ),
                ]),
                growth_factors: vec!["vegf".into(), "bfgf".into(), "tgf_beta".into()],
                electrical_stimulation: false,
                flow_perfusion: true,
            },
        ),
        (
            OrganType::Kidney,
            MaterialProfile {
                scaffold: IndexMap::from([
                    ("pga_scaffold".to_string(), porous(1.53, 0.90, ("pore_size", json!(0.15)))),
                    ("nephron_matrix".to_string(), dispersed(1.25, 0.06)),
                    ("basement_membrane".to_string(), dispersed(1.1, 0.03)),
                    (
                        "filtration_membrane".to_string(),
                        structural(1.4, &[("thickness", json!(0.01))]),
                    ),
                ]),
                growth_factors: vec!["vegf".into(), "tgf_beta".into(), "pdgf".into()],
                electrical_stimulation: false,
                flow_perfusion: true,
            },
        ),
        (
            OrganType::Ear,
            MaterialProfile {
                scaffold: IndexMap::from([
                    (
                        "cartilage_scaffold".to_string(),
                        porous(1.2, 0.75, ("elasticity", json!("high"))),
                    ),
                    ("chondrocyte_matrix".to_string(), dispersed(1.15, 0.07)),
                    ("shape_memory_polymer".to_string(), dispersed(1.05, 0.02)),
                    (
                        "surface_coating".to_string(),
                        structural(1.3, &[("thickness", json!(0.005))]),
                    ),
                ]),
                growth_factors: vec!["tgf_beta".into(), "bfgf".into()],
                electrical_stimulation: false,
                flow_perfusion: false,
            },
        ),
    ])
}

fn biologicals() -> BiologicalCatalog {
    let factor = |molecular_weight, units_per_mg, cost_per_mg| GrowthFactorSpec {
        molecular_weight,
        units_per_mg,
        cost_per_mg,
    };
    let protein = |concentration_mg_ml, cost_per_g| ProteinSpec {
        concentration_mg_ml,
        cost_per_g,
    };
    let nutrient = |concentration_mg_ml, cost_per_kg| NutrientSpec {
        concentration_mg_ml,
        cost_per_kg,
    };

    BiologicalCatalog {
        growth_factors: IndexMap::from([
            ("vegf".to_string(), factor(38000.0, 50000.0, 250.0)),
            ("bfgf".to_string(), factor(17800.0, 100000.0, 180.0)),
            ("tgf_beta".to_string(), factor(25000.0, 20000.0, 320.0)),
            ("pdgf".to_string(), factor(28000.0, 30000.0, 290.0)),
        ]),
        growth_factor_target_ng_ml: 50.0,
        extracellular_proteins: IndexMap::from([
            ("collagen_i".to_string(), protein(5.0, 45.0)),
            ("collagen_iv".to_string(), protein(2.0, 85.0)),
            ("laminin".to_string(), protein(1.0, 120.0)),
            ("fibronectin".to_string(), protein(0.5, 95.0)),
            ("elastin".to_string(), protein(3.0, 65.0)),
        ]),
        cell_nutrients: IndexMap::from([
            ("glucose".to_string(), nutrient(4.5, 2.5)),
            ("amino_acids".to_string(), nutrient(0.8, 25.0)),
            ("vitamins".to_string(), nutrient(0.1, 150.0)),
            ("minerals".to_string(), nutrient(0.3, 8.0)),
        ]),
    }
}

fn references() -> IndexMap<OrganType, OrganReference> {
    fn reference(
        min_ml: f64,
        max_ml: f64,
        tissue_density_g_ml: f64,
        composition: &[(&str, f64)],
    ) -> OrganReference {
        OrganReference {
            typical_volume: VolumeRange { min_ml, max_ml },
            tissue_density_g_ml,
            cellular_composition: table(composition),
        }
    }

    IndexMap::from([
        (
            OrganType::Heart,
            reference(
                200.0,
                400.0,
                1.06,
                &[
                    ("cardiomyocytes", 0.35),
                    ("endothelial_cells", 0.25),
                    ("fibroblasts", 0.25),
                    ("smooth_muscle_cells", 0.15),
                ],
            ),
        ),
        (
            OrganType::Liver,
            reference(
                1000.0,
                1800.0,
                1.05,
                &[
                    ("hepatocytes", 0.70),
                    ("stellate_cells", 0.15),
                    ("kupffer_cells", 0.10),
                    ("endothelial_cells", 0.05),
                ],
            ),
        ),
        (
            OrganType::Kidney,
            reference(
                100.0,
                200.0,
                1.04,
                &[
                    ("tubular_epithelial", 0.40),
                    ("podocytes", 0.20),
                    ("mesangial_cells", 0.20),
                    ("endothelial_cells", 0.20),
                ],
            ),
        ),
        (
            OrganType::Ear,
            reference(
                5.0,
                12.0,
                1.10,
                &[
                    ("chondrocytes", 0.80),
                    ("perichondrial_cells", 0.15),
                    ("fibroblasts", 0.05),
                ],
            ),
        ),
    ])
}

/// Assemble the built-in catalog.
pub(super) fn catalog() -> ReferenceCatalog {
    ReferenceCatalog {
        scaling: ScalingPolicy {
            reference_height_cm: 175.0,
            reference_weight_kg: 70.0,
            senescence_onset_years: 30,
            senescence_rate_per_year: 0.002,
        },
        geometry: geometry(),
        formulation_policy: FormulationPolicy {
            waste_factor: 1.25,
            solvent_name: "pbs_medium".to_string(),
            solvent_density: 1.0,
            reference_weight_kg: 70.0,
            min_adjustment: 0.5,
            max_adjustment: 1.5,
            storage_temperature: StorageTemperature {
                temperature_celsius: 4.0,
                temperature_fahrenheit: 39.2,
                notes: "Store in refrigerator, use within recommended shelf life".to_string(),
            },
        },
        formulations: formulations(),
        densities: table(&[
            ("alginate", 1.6),
            ("gelatin", 1.27),
            ("hyaluronic_acid", 1.2),
            ("collagen", 1.3),
            ("fibrinogen", 1.4),
            ("chitosan", 1.35),
            ("decellularized_ecm", 1.1),
            ("peg_diacrylate", 1.12),
            ("laminin", 1.2),
            ("chondroitin_sulfate", 1.25),
            ("agarose", 1.02),
            ("calcium_chloride", 2.15),
            ("thrombin", 1.3),
            ("genipin", 1.27),
            ("photoinitiator", 1.1),
        ]),
        materials: materials(),
        scaffold_policy: ScaffoldPolicy {
            volume_fraction: 0.3,
            default_cost_per_kg: 50.0,
        },
        unit_costs_per_kg: table(&[
            ("alginate", 45.0),
            ("gelatin", 25.0),
            ("hyaluronic_acid", 280.0),
            ("collagen", 180.0),
            ("chitosan", 35.0),
            ("peg_diacrylate", 95.0),
            ("calcium_chloride", 15.0),
            ("pbs_medium", 8.0),
            ("pcl_fibers", 120.0),
            ("pla_framework", 85.0),
            ("pga_scaffold", 150.0),
        ]),
        biologicals: biologicals(),
        post_processing: PostProcessingPolicy {
            medium_volume_multiplier: 5.0,
            medium_changes_per_week: 3,
            culture_duration_weeks: 4,
            medium_cost_per_liter: 25.0,
            antibiotic_fraction: 0.01,
            antibiotic_cost_per_ml: 0.15,
            maturation_cost_per_ml: 2.5,
            quality_control: table(&[
                ("histology_staining", 150.0),
                ("immunofluorescence", 200.0),
                ("mechanical_testing", 300.0),
                ("viability_assays", 100.0),
            ]),
        },
        costs: CostPolicy {
            labor_usd: 2500.0,
            equipment_usd: 800.0,
            overhead_rate: 0.20,
        },
        references: references(),
        printable_volume: VolumeRange {
            min_ml: 1.0,
            max_ml: 2000.0,
        },
    }
}
