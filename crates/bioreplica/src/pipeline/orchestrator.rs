//! End-to-end replica generation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::anthropometry::{AnthropometricScaler, Dimensions, PatientVitals, ScaledGeometry};
use crate::bioink::{BioinkFormulation, BioinkFormulationEngine};
use crate::catalog::{OrganType, ReferenceCatalog};
use crate::error::{ReplicaError, Result};
use crate::materials::{MaterialRequirement, MaterialRequirementEngine, ProcurementList};
use crate::mesh::{Mesh, ParametricMeshGenerator, SizeAdjustment, StlFormat, export_stl};

use super::advisory::{Advisory, AdvisoryCode, Severity};

/// Configuration for the generation pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Encoding used by [`OrganGenerationPipeline::export_mesh`].
    pub stl_format: StlFormat,
    /// Fail instead of warning when the scaled volume is outside the
    /// printable range, and raise atypical volumes to error advisories.
    pub enforce_volume_bounds: bool,
}

/// One replica request as received from a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub organ_type: String,
    /// Height (cm).
    pub height: f64,
    /// Weight (kg).
    pub weight: f64,
    /// Age (years).
    pub age: u32,
    /// Weight used for the cell-density adjustment; defaults to `weight`.
    #[serde(default)]
    pub patient_weight_for_bioink: Option<f64>,
    #[serde(default)]
    pub special_requirements: String,
}

impl GenerationRequest {
    pub fn new(organ_type: impl Into<String>, height: f64, weight: f64, age: u32) -> Self {
        Self {
            organ_type: organ_type.into(),
            height,
            weight,
            age,
            patient_weight_for_bioink: None,
            special_requirements: String::new(),
        }
    }

    pub fn with_bioink_weight(mut self, weight: f64) -> Self {
        self.patient_weight_for_bioink = Some(weight);
        self
    }

    pub fn with_special_requirements(mut self, text: impl Into<String>) -> Self {
        self.special_requirements = text.into();
        self
    }

    pub fn bioink_weight(&self) -> f64 {
        self.patient_weight_for_bioink.unwrap_or(self.weight)
    }
}

/// Patient inputs echoed back with a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub patient: PatientVitals,
    /// Weight the cell density was adjusted for (kg).
    pub bioink_weight_kg: f64,
    pub special_requirements: String,
}

/// Everything computed for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub organ: OrganType,
    pub metadata: GenerationMetadata,
    pub mesh: Mesh,
    /// Scaled organ volume (ml).
    pub volume: f64,
    pub dimensions: Dimensions,
    pub scale_factor: f64,
    pub age_factor: f64,
    pub size_adjustment: SizeAdjustment,
    pub bioink_formula: BioinkFormulation,
    pub material_requirements: MaterialRequirement,
    pub advisories: Vec<Advisory>,
    /// Scaled volume times reference tissue density, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_tissue_mass_g: Option<f64>,
}

impl GenerationOutput {
    /// `sha256:<hex>` over the canonical JSON of this output.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("sha256:{:x}", hasher.finalize()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the full result as pretty JSON.
    pub fn write_report(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let export_error = |source| ReplicaError::Export {
            path: path.to_path_buf(),
            source,
        };
        let json = self.to_json_pretty()?;
        let file = File::create(path).map_err(export_error)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(json.as_bytes()).map_err(export_error)?;
        writer.flush().map_err(export_error)?;
        Ok(())
    }

    pub fn procurement_list(&self) -> ProcurementList {
        ProcurementList::from_requirement(&self.material_requirements)
    }

    pub fn has_warnings(&self) -> bool {
        self.advisories
            .iter()
            .any(|a| a.severity >= Severity::Warning)
    }

    /// True when an advisory requires sign-off before printing.
    pub fn has_errors(&self) -> bool {
        self.advisories.iter().any(|a| a.severity == Severity::Error)
    }
}

/// Scaler, mesh generator, formulation and material engines in sequence.
///
/// Holds only a borrowed catalog and its config, so one pipeline can serve
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct OrganGenerationPipeline<'a> {
    catalog: &'a ReferenceCatalog,
    config: PipelineConfig,
}

impl OrganGenerationPipeline<'static> {
    /// Pipeline over the built-in catalog with default configuration.
    pub fn builtin() -> Self {
        Self::new(ReferenceCatalog::builtin())
    }
}

impl<'a> OrganGenerationPipeline<'a> {
    pub fn new(catalog: &'a ReferenceCatalog) -> Self {
        Self::with_config(catalog, PipelineConfig::default())
    }

    pub fn with_config(catalog: &'a ReferenceCatalog, config: PipelineConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'a ReferenceCatalog {
        self.catalog
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage for one request.
    ///
    /// Any failure aborts the remaining stages; nothing partial is returned.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput> {
        let organ: OrganType = request.organ_type.parse()?;
        let vitals = PatientVitals::new(request.height, request.weight, request.age)?;
        let mut advisories = Vec::new();

        // Scale
        let geometry = AnthropometricScaler::new(self.catalog).scale(organ, &vitals)?;
        if !(geometry.scale_factor > 0.0) {
            return Err(ReplicaError::InvalidInput(format!(
                "age {} drives the {} scale factor to {}",
                vitals.age_years, organ, geometry.scale_factor
            )));
        }
        self.check_geometry(organ, &vitals, &geometry, &mut advisories)?;

        // Mesh
        let size_adjustment = SizeAdjustment::from_requirements(&request.special_requirements);
        let mesh = ParametricMeshGenerator::new(self.catalog).generate_adjusted(
            organ,
            &geometry.dimensions,
            size_adjustment,
        )?;

        // Bioink
        let bioink_weight = request.bioink_weight();
        if !(bioink_weight > 0.0) {
            advisories.push(Advisory::info(
                AdvisoryCode::WeightAdjustmentSkipped,
                format!(
                    "bioink patient weight {} kg is not positive; cell density left unadjusted",
                    bioink_weight
                ),
            ));
        }
        let bioink_formula = BioinkFormulationEngine::new(self.catalog).formulate(
            organ,
            geometry.volume_ml,
            bioink_weight,
        )?;

        // Materials
        let material_requirements = MaterialRequirementEngine::new(self.catalog)
            .calculate(organ, bioink_formula.total_volume_ml)?;

        let estimated_tissue_mass_g = self
            .catalog
            .organ_reference(organ)
            .map(|reference| geometry.volume_ml * reference.tissue_density_g_ml);

        for advisory in advisories.iter().filter(|a| a.severity >= Severity::Warning) {
            warn!(organ = %organ, "{}", advisory);
        }
        info!(
            organ = %organ,
            volume_ml = geometry.volume_ml,
            faces = mesh.face_count(),
            bioink_ml = bioink_formula.total_volume_ml,
            total_cost = material_requirements.cost_breakdown.total_estimated_cost,
            advisories = advisories.len(),
            "generated organ replica"
        );

        Ok(GenerationOutput {
            organ,
            metadata: GenerationMetadata {
                patient: vitals,
                bioink_weight_kg: bioink_weight,
                special_requirements: request.special_requirements.clone(),
            },
            mesh,
            volume: geometry.volume_ml,
            dimensions: geometry.dimensions,
            scale_factor: geometry.scale_factor,
            age_factor: geometry.age_factor,
            size_adjustment,
            bioink_formula,
            material_requirements,
            advisories,
            estimated_tissue_mass_g,
        })
    }

    /// Range checks on the scaled geometry.
    fn check_geometry(
        &self,
        organ: OrganType,
        vitals: &PatientVitals,
        geometry: &ScaledGeometry,
        advisories: &mut Vec<Advisory>,
    ) -> Result<()> {
        let volume = geometry.volume_ml;

        if vitals.age_years > self.catalog.scaling.senescence_onset_years {
            advisories.push(Advisory::info(
                AdvisoryCode::SenescenceApplied,
                format!(
                    "age {} is past {}; volume reduced by factor {:.4}",
                    vitals.age_years,
                    self.catalog.scaling.senescence_onset_years,
                    geometry.age_factor
                ),
            ));
        }

        if let Some(reference) = self.catalog.organ_reference(organ) {
            let range = reference.typical_volume;
            if !range.contains(volume) {
                let severity = if self.config.enforce_volume_bounds {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                advisories.push(Advisory::new(
                    AdvisoryCode::AtypicalVolume,
                    severity,
                    format!(
                        "{:.1} ml is outside the typical {} range of {}-{} ml",
                        volume, organ, range.min_ml, range.max_ml
                    ),
                ));
            }
        }

        let printable = self.catalog.printable_volume;
        if !printable.contains(volume) {
            let message = format!(
                "{:.1} ml is outside the printable range of {}-{} ml",
                volume, printable.min_ml, printable.max_ml
            );
            if self.config.enforce_volume_bounds {
                return Err(ReplicaError::InvalidInput(message));
            }
            advisories.push(Advisory::warning(AdvisoryCode::UnprintableVolume, message));
        }

        Ok(())
    }

    /// Write the output mesh in the configured STL encoding.
    pub fn export_mesh(&self, output: &GenerationOutput, path: impl AsRef<Path>) -> Result<()> {
        export_stl(&output.mesh, path, self.config.stl_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_heart() {
        let output = OrganGenerationPipeline::builtin()
            .generate(&GenerationRequest::new("heart", 175.0, 70.0, 30))
            .unwrap();
        assert_eq!(output.organ, OrganType::Heart);
        assert_eq!(output.volume, 310.0);
        assert_eq!(output.scale_factor, 1.0);
        assert_eq!(output.bioink_formula.total_volume_ml, 387.5);
        assert_eq!(output.material_requirements.bioink_volume_ml, 387.5);
        assert_eq!(output.size_adjustment, SizeAdjustment::None);
        assert!(output.advisories.is_empty());
        assert!(output.mesh.is_closed());
        assert_eq!(output.metadata.patient.height_cm, 175.0);
        assert_eq!(output.metadata.patient.age_years, 30);
        assert_eq!(output.metadata.bioink_weight_kg, 70.0);
    }

    #[test]
    fn test_metadata_echoes_request() {
        let request = GenerationRequest::new("ear", 150.0, 48.5, 12)
            .with_bioink_weight(50.0)
            .with_special_requirements("Reduced size");
        let output = OrganGenerationPipeline::builtin().generate(&request).unwrap();
        let metadata = &output.metadata;
        assert_eq!(metadata.patient, PatientVitals::new(150.0, 48.5, 12).unwrap());
        assert_eq!(metadata.bioink_weight_kg, 50.0);
        assert_eq!(metadata.special_requirements, "Reduced size");

        let json: serde_json::Value =
            serde_json::from_str(&output.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["metadata"]["patient"]["weight_kg"], 48.5);
    }

    #[test]
    fn test_strict_atypical_volume_is_error_advisory() {
        let request = GenerationRequest::new("kidney", 210.0, 150.0, 25);
        let lenient = OrganGenerationPipeline::builtin().generate(&request).unwrap();
        assert!(lenient.has_warnings());
        assert!(!lenient.has_errors());

        let strict = OrganGenerationPipeline::with_config(
            ReferenceCatalog::builtin(),
            PipelineConfig {
                enforce_volume_bounds: true,
                ..PipelineConfig::default()
            },
        )
        .generate(&request)
        .unwrap();
        assert!(strict.has_errors());
        let atypical = strict
            .advisories
            .iter()
            .find(|a| a.code == AdvisoryCode::AtypicalVolume)
            .unwrap();
        assert_eq!(atypical.severity, Severity::Error);
        // computation is not blocked
        assert_eq!(strict.bioink_formula, lenient.bioink_formula);
    }

    #[test]
    fn test_bioink_weight_defaults_to_patient_weight() {
        let request = GenerationRequest::new("ear", 160.0, 55.0, 20);
        assert_eq!(request.bioink_weight(), 55.0);
        assert_eq!(request.clone().with_bioink_weight(0.0).bioink_weight(), 0.0);
    }

    #[test]
    fn test_zero_bioink_weight_is_advisory() {
        let request = GenerationRequest::new("kidney", 175.0, 70.0, 30).with_bioink_weight(0.0);
        let output = OrganGenerationPipeline::builtin().generate(&request).unwrap();
        assert_eq!(output.bioink_formula.adjustment_factor, 1.0);
        assert_eq!(output.advisories.len(), 1);
        assert_eq!(
            output.advisories[0].code,
            AdvisoryCode::WeightAdjustmentSkipped
        );
        assert!(!output.has_warnings());
    }

    #[test]
    fn test_extreme_age_rejected_before_meshing() {
        // age factor 1 - 0.002 * 570 is negative
        let err = OrganGenerationPipeline::builtin()
            .generate(&GenerationRequest::new("liver", 175.0, 70.0, 600))
            .unwrap_err();
        assert!(matches!(err, ReplicaError::InvalidInput(_)));
    }

    #[test]
    fn test_enforced_volume_bounds() {
        let mut catalog = ReferenceCatalog::builtin().clone();
        catalog.printable_volume.max_ml = 300.0;
        let request = GenerationRequest::new("heart", 175.0, 70.0, 30);

        let lenient = OrganGenerationPipeline::new(&catalog).generate(&request).unwrap();
        assert!(lenient
            .advisories
            .iter()
            .any(|a| a.code == AdvisoryCode::UnprintableVolume));

        let strict = OrganGenerationPipeline::with_config(
            &catalog,
            PipelineConfig {
                enforce_volume_bounds: true,
                ..PipelineConfig::default()
            },
        );
        assert!(matches!(
            strict.generate(&request),
            Err(ReplicaError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_tissue_mass() {
        let output = OrganGenerationPipeline::builtin()
            .generate(&GenerationRequest::new("kidney", 175.0, 70.0, 30))
            .unwrap();
        assert_eq!(output.estimated_tissue_mass_g, Some(150.0 * 1.04));
    }
}
