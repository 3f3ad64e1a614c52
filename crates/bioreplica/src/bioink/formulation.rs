//! Bioink formulation sized to an organ volume.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{OrganType, ReferenceCatalog, StorageTemperature};
use crate::error::{ReplicaError, Result};

/// Part a component plays in the bioink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    /// Polymer or protein from the base formulation.
    Base,
    /// Crosslinking agent added just before printing.
    Crosslinker,
    /// Buffer filling the remaining volume.
    Solvent,
}

/// Amount of one named component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Volume fraction of the total bioink.
    pub concentration: f64,
    pub volume_ml: f64,
    pub mass_g: f64,
    pub role: ComponentRole,
}

/// Printing duration at the archetype's extrusion rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintingTime {
    pub hours: f64,
    pub minutes: f64,
    pub rate_ml_per_hour: f64,
}

/// Itemized bioink recipe for one print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BioinkFormulation {
    pub organ: OrganType,
    /// Organ volume plus the waste allowance (ml).
    pub total_volume_ml: f64,
    /// Base components, then crosslinkers, then the solvent residual.
    pub components: IndexMap<String, Component>,
    /// Cell density after the patient adjustment (cells/ml).
    pub cell_density: f64,
    /// Target viscosity (mPa s).
    pub printing_viscosity: f64,
    pub patient_weight_kg: f64,
    pub adjustment_factor: f64,
    pub estimated_printing_time: PrintingTime,
    pub storage_temperature: StorageTemperature,
    pub shelf_life_hours: f64,
}

impl BioinkFormulation {
    /// Components playing the given role, in formulation order.
    pub fn components_with_role(
        &self,
        role: ComponentRole,
    ) -> impl Iterator<Item = (&String, &Component)> {
        self.components.iter().filter(move |(_, c)| c.role == role)
    }

    /// The solvent residual entry.
    pub fn solvent(&self) -> Option<&Component> {
        self.components_with_role(ComponentRole::Solvent)
            .map(|(_, c)| c)
            .next()
    }

    /// Volume of every non-solvent component, summed in formulation order.
    pub fn solids_volume_ml(&self) -> f64 {
        self.components
            .values()
            .filter(|c| c.role != ComponentRole::Solvent)
            .map(|c| c.volume_ml)
            .sum()
    }

    /// Solids plus solvent; equals `total_volume_ml` exactly.
    pub fn component_volume_ml(&self) -> f64 {
        self.solids_volume_ml() + self.solvent().map_or(0.0, |c| c.volume_ml)
    }

    pub fn total_mass_g(&self) -> f64 {
        self.components.values().map(|c| c.mass_g).sum()
    }
}

/// Computes bioink recipes from catalog formulation profiles.
#[derive(Debug, Clone, Copy)]
pub struct BioinkFormulationEngine<'a> {
    catalog: &'a ReferenceCatalog,
}

impl<'a> BioinkFormulationEngine<'a> {
    pub fn new(catalog: &'a ReferenceCatalog) -> Self {
        Self { catalog }
    }

    /// Formulate bioink for an organ of `organ_volume_ml`.
    ///
    /// The solvent is whatever volume the named components leave over. A
    /// profile whose concentrations sum above one yields a negative residual
    /// and fails with [`ReplicaError::FormulationConsistency`].
    pub fn formulate(
        &self,
        organ: OrganType,
        organ_volume_ml: f64,
        patient_weight_kg: f64,
    ) -> Result<BioinkFormulation> {
        let profile = self.catalog.formulation_profile(organ)?;
        let policy = &self.catalog.formulation_policy;

        if !(organ_volume_ml.is_finite() && organ_volume_ml > 0.0) {
            return Err(ReplicaError::InvalidInput(format!(
                "organ volume must be positive, got {}",
                organ_volume_ml
            )));
        }

        let total_volume_ml = organ_volume_ml * policy.waste_factor;
        if !total_volume_ml.is_finite() {
            return Err(ReplicaError::InvalidInput(format!(
                "bioink volume overflows for organ volume {}",
                organ_volume_ml
            )));
        }
        // Named volumes sit on the ulp grid of the total, so every partial
        // sum and the solvent residual are exact.
        let grid = ulp(total_volume_ml);

        let mut components = IndexMap::new();
        let mut solids_volume_ml = 0.0;
        let named = profile
            .base_components
            .iter()
            .map(|entry| (entry, ComponentRole::Base))
            .chain(
                profile
                    .crosslinking_agents
                    .iter()
                    .map(|entry| (entry, ComponentRole::Crosslinker)),
            );
        for ((name, &concentration), role) in named {
            let volume_ml = ((total_volume_ml * concentration) / grid).round() * grid;
            let mass_g = volume_ml * self.catalog.density(name)?;
            solids_volume_ml += volume_ml;
            components.insert(
                name.clone(),
                Component {
                    concentration,
                    volume_ml,
                    mass_g,
                    role,
                },
            );
        }

        let solvent_volume_ml = total_volume_ml - solids_volume_ml;
        if solvent_volume_ml < 0.0 {
            return Err(ReplicaError::FormulationConsistency {
                organ: organ.to_string(),
                solvent_volume_ml,
            });
        }
        components.insert(
            policy.solvent_name.clone(),
            Component {
                concentration: solvent_volume_ml / total_volume_ml,
                volume_ml: solvent_volume_ml,
                mass_g: solvent_volume_ml * policy.solvent_density,
                role: ComponentRole::Solvent,
            },
        );

        let adjustment_factor = self.patient_adjustment_factor(patient_weight_kg);
        let hours = total_volume_ml / profile.printing_rate_ml_per_hour;

        let formulation = BioinkFormulation {
            organ,
            total_volume_ml,
            components,
            cell_density: profile.cell_density * adjustment_factor,
            printing_viscosity: profile.printing_viscosity,
            patient_weight_kg,
            adjustment_factor,
            estimated_printing_time: PrintingTime {
                hours,
                minutes: hours * 60.0,
                rate_ml_per_hour: profile.printing_rate_ml_per_hour,
            },
            storage_temperature: policy.storage_temperature.clone(),
            shelf_life_hours: profile.shelf_life_hours,
        };

        debug!(
            organ = %organ,
            total_volume_ml,
            solvent_volume_ml,
            adjustment_factor,
            printing_hours = hours,
            "formulated bioink"
        );

        Ok(formulation)
    }

    /// Cell-density multiplier for a patient's weight.
    ///
    /// Logarithmic in weight and clamped to the policy range; non-positive
    /// (or non-finite) weights fall back to exactly 1.0.
    pub fn patient_adjustment_factor(&self, patient_weight_kg: f64) -> f64 {
        let policy = &self.catalog.formulation_policy;
        if patient_weight_kg > 0.0 && patient_weight_kg.is_finite() {
            let raw = 0.8 + 0.4 * (patient_weight_kg / policy.reference_weight_kg).log2();
            raw.clamp(policy.min_adjustment, policy.max_adjustment)
        } else {
            1.0
        }
    }
}

/// Spacing between `value` and the next larger float. `value` must be
/// finite and positive.
fn ulp(value: f64) -> f64 {
    f64::from_bits(value.to_bits() + 1) - value
}
