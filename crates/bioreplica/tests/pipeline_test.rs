//! Integration tests for the generation pipeline.

use std::fs;

use approx::assert_relative_eq;
use tempfile::TempDir;

use bioreplica::bioink::ComponentRole;
use bioreplica::mesh::{StlFormat, write_stl};
use bioreplica::pipeline::AdvisoryCode;
use bioreplica::{
    BioinkFormulationEngine, GenerationRequest, MaterialRequirementEngine, OrganGenerationPipeline,
    OrganType, ParametricMeshGenerator, PipelineConfig, PreparationProtocol, ReferenceCatalog,
    ReplicaError, SizeAdjustment,
};

fn reference_request(organ: &str) -> GenerationRequest {
    GenerationRequest::new(organ, 175.0, 70.0, 30)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_reference_patient_every_organ() {
    let pipeline = OrganGenerationPipeline::builtin();
    let catalog = pipeline.catalog();

    for organ in OrganType::all() {
        let output = pipeline.generate(&reference_request(organ.as_str())).unwrap();
        let profile = catalog.geometry_profile(*organ).unwrap();

        assert_eq!(output.scale_factor, 1.0);
        assert_eq!(output.volume, profile.base_volume_ml);
        assert_eq!(output.dimensions, profile.base_dimensions);
        assert_eq!(output.bioink_formula.total_volume_ml, profile.base_volume_ml * 1.25);
        assert!(output.mesh.is_closed(), "{} mesh is open", organ);
        assert!(output.mesh.indices_in_range());
    }
}

#[test]
fn test_heart_scenario() {
    let output = OrganGenerationPipeline::builtin()
        .generate(&reference_request("heart"))
        .unwrap();

    assert_eq!(output.volume, 310.0);
    assert_eq!(output.scale_factor, 1.0);
    assert_eq!(output.bioink_formula.total_volume_ml, 387.5);
    assert_relative_eq!(output.bioink_formula.cell_density, 20e6 * 0.8);
    assert!(output.material_requirements.post_processing.maturation.electrical_stimulation);
}

#[test]
fn test_kidney_material_scenario() {
    let requirement = MaterialRequirementEngine::new(ReferenceCatalog::builtin())
        .calculate(OrganType::Kidney, 100.0)
        .unwrap();
    let medium = &requirement.post_processing.culture_medium;
    assert_eq!(medium.volume_ml, 500.0);
    assert_eq!(medium.total_volume_ml, 6000.0);
}

#[test]
fn test_older_taller_patient() {
    let output = OrganGenerationPipeline::builtin()
        .generate(&GenerationRequest::new("liver", 190.0, 95.0, 65))
        .unwrap();

    let expected_age = 1.0 - 0.002 * 35.0;
    assert_relative_eq!(output.age_factor, expected_age, max_relative = 1e-12);
    let expected = (190.0f64 / 175.0).powf(0.8) * (95.0f64 / 70.0).powf(0.2) * expected_age;
    assert_relative_eq!(output.scale_factor, expected, max_relative = 1e-12);
    assert_relative_eq!(output.volume, 1400.0 * expected, max_relative = 1e-12);
    assert!(output
        .advisories
        .iter()
        .any(|a| a.code == AdvisoryCode::SenescenceApplied));
}

#[test]
fn test_special_requirements_scale_mesh() {
    let pipeline = OrganGenerationPipeline::builtin();
    let plain = pipeline.generate(&reference_request("ear")).unwrap();
    let reduced = pipeline
        .generate(&reference_request("ear").with_special_requirements("Reduced size for child"))
        .unwrap();

    assert_eq!(reduced.size_adjustment, SizeAdjustment::Reduced);
    assert_eq!(plain.mesh.faces, reduced.mesh.faces);
    for (a, b) in plain.mesh.vertices.iter().zip(&reduced.mesh.vertices) {
        assert_eq!(a.coords * 0.9, b.coords);
    }
    // chemistry follows the analytic volume, not the mesh
    assert_eq!(plain.bioink_formula, reduced.bioink_formula);
    assert_eq!(plain.material_requirements, reduced.material_requirements);
}

#[test]
fn test_typical_range_warning() {
    // large, heavy patient pushes the kidney past 200 ml
    let output = OrganGenerationPipeline::builtin()
        .generate(&GenerationRequest::new("kidney", 210.0, 150.0, 25))
        .unwrap();
    assert!(output.volume > 200.0);
    assert!(output.has_warnings());
    assert!(output
        .advisories
        .iter()
        .any(|a| a.code == AdvisoryCode::AtypicalVolume));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_brain_is_unsupported() {
    let err = OrganGenerationPipeline::builtin()
        .generate(&reference_request("brain"))
        .unwrap_err();
    assert!(matches!(err, ReplicaError::UnsupportedOrgan(_)));
    assert!("brain".parse::<OrganType>().is_err());
}

#[test]
fn test_each_stage_checks_its_own_profile() {
    let base = ReferenceCatalog::builtin();

    let mut no_materials = base.clone();
    no_materials.materials.shift_remove(&OrganType::Ear);
    // earlier stages still succeed for the ear
    let dims = base.geometry_profile(OrganType::Ear).unwrap().base_dimensions;
    ParametricMeshGenerator::new(&no_materials)
        .generate(OrganType::Ear, &dims)
        .unwrap();
    BioinkFormulationEngine::new(&no_materials)
        .formulate(OrganType::Ear, 8.0, 70.0)
        .unwrap();
    let err = OrganGenerationPipeline::new(&no_materials)
        .generate(&reference_request("ear"))
        .unwrap_err();
    assert!(matches!(err, ReplicaError::UnsupportedOrgan(ref m) if m.contains("material")));

    let mut no_formulation = base.clone();
    no_formulation.formulations.shift_remove(&OrganType::Ear);
    let err = OrganGenerationPipeline::new(&no_formulation)
        .generate(&reference_request("ear"))
        .unwrap_err();
    assert!(matches!(err, ReplicaError::UnsupportedOrgan(ref m) if m.contains("formulation")));
}

#[test]
fn test_invalid_vitals() {
    let pipeline = OrganGenerationPipeline::builtin();
    for request in [
        GenerationRequest::new("heart", 0.0, 70.0, 30),
        GenerationRequest::new("heart", 175.0, -1.0, 30),
        GenerationRequest::new("heart", f64::NAN, 70.0, 30),
    ] {
        let err = pipeline.generate(&request).unwrap_err();
        assert!(matches!(err, ReplicaError::InvalidInput(_)));
    }
}

#[test]
fn test_request_from_json() {
    let json = r#"{"organ_type": "Kidney", "height": 168, "weight": 61.5, "age": 44}"#;
    let request: GenerationRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.bioink_weight(), 61.5);
    assert!(request.special_requirements.is_empty());

    let bad = r#"{"organ_type": "kidney", "height": "tall", "weight": 61.5, "age": 44}"#;
    assert!(serde_json::from_str::<GenerationRequest>(bad).is_err());
}

// =============================================================================
// Reproducibility
// =============================================================================

#[test]
fn test_pipeline_is_idempotent() {
    let pipeline = OrganGenerationPipeline::builtin();
    let request = GenerationRequest::new("liver", 181.0, 77.3, 52).with_bioink_weight(80.0);

    let first = pipeline.generate(&request).unwrap();
    let second = pipeline.generate(&request).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
    assert!(first.fingerprint().unwrap().starts_with("sha256:"));

    let other = pipeline
        .generate(&request.clone().with_bioink_weight(60.0))
        .unwrap();
    assert_ne!(first.fingerprint().unwrap(), other.fingerprint().unwrap());
}

#[test]
fn test_json_report_preserves_precision() {
    let output = OrganGenerationPipeline::builtin()
        .generate(&GenerationRequest::new("heart", 171.3, 64.9, 37))
        .unwrap();
    let json = output.to_json_pretty().unwrap();
    let parsed: bioreplica::GenerationOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.bioink_formula, output.bioink_formula);
    assert_eq!(parsed.material_requirements, output.material_requirements);
    assert_eq!(parsed.volume, output.volume);
}

#[test]
fn test_parallel_requests_share_catalog() {
    let pipeline = OrganGenerationPipeline::builtin();
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = OrganType::all()
            .iter()
            .map(|organ| {
                let pipeline = &pipeline;
                scope.spawn(move || pipeline.generate(&reference_request(organ.as_str())))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for (organ, result) in OrganType::all().iter().zip(results) {
        assert_eq!(result.unwrap().organ, *organ);
    }
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_export_artifacts() {
    let dir = TempDir::new().unwrap();
    let output = OrganGenerationPipeline::builtin()
        .generate(&reference_request("kidney"))
        .unwrap();

    let stl_path = dir.path().join("nested").join("kidney.stl");
    OrganGenerationPipeline::builtin()
        .export_mesh(&output, &stl_path)
        .unwrap();
    let bytes = fs::read(&stl_path).unwrap();
    assert_eq!(bytes.len(), 84 + 50 * output.mesh.face_count());

    let report_path = dir.path().join("kidney.json");
    output.write_report(&report_path).unwrap();
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["organ"], "kidney");
    assert_eq!(report["bioink_formula"]["total_volume_ml"], 187.5);

    let csv_path = dir.path().join("kidney_procurement.csv");
    output.procurement_list().export_csv(&csv_path).unwrap();
    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("category,material,name,amount,unit,cost_usd,supplier"));
}

#[test]
fn test_ascii_export_via_config() {
    let dir = TempDir::new().unwrap();
    let pipeline = OrganGenerationPipeline::with_config(
        ReferenceCatalog::builtin(),
        PipelineConfig {
            stl_format: StlFormat::Ascii,
            enforce_volume_bounds: false,
        },
    );
    let output = pipeline.generate(&reference_request("ear")).unwrap();
    let path = dir.path().join("ear.stl");
    pipeline.export_mesh(&output, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("endfacet").count(), output.mesh.face_count());

    let mut buffer = Vec::new();
    write_stl(&output.mesh, &mut buffer, StlFormat::Ascii).unwrap();
    assert_eq!(buffer, text.as_bytes());
}

#[test]
fn test_export_failure_keeps_results() {
    let dir = TempDir::new().unwrap();
    // a regular file where a directory is expected
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"").unwrap();

    let pipeline = OrganGenerationPipeline::builtin();
    let output = pipeline.generate(&reference_request("heart")).unwrap();
    let err = pipeline
        .export_mesh(&output, blocker.join("heart.stl"))
        .unwrap_err();
    assert!(err.is_export());

    // the computed result is untouched and export can be retried elsewhere
    assert_eq!(output.volume, 310.0);
    pipeline
        .export_mesh(&output, dir.path().join("heart.stl"))
        .unwrap();
}

#[test]
fn test_protocol_from_pipeline_output() {
    let output = OrganGenerationPipeline::builtin()
        .generate(&reference_request("kidney"))
        .unwrap();
    let protocol = PreparationProtocol::from_formulation(&output.bioink_formula);
    assert!(protocol.steps.iter().any(|s| s.contains("Peg Diacrylate")));
    assert!(protocol.steps.iter().any(|s| s.ends_with("g Photoinitiator")));

    let solvent = output
        .bioink_formula
        .components_with_role(ComponentRole::Solvent)
        .count();
    assert_eq!(solvent, 1);
}
