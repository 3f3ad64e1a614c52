//! Generate command - run the full pipeline and write the artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use bioreplica::{
    GenerationOutput, GenerationRequest, OrganGenerationPipeline, PatientVitals, PipelineConfig,
    ReplicaError, Severity,
};
use colored::Colorize;

use super::load_catalog;
use crate::cli::GenerateArgs;

pub fn run(
    catalog: Option<PathBuf>,
    args: GenerateArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(catalog)?;
    let vitals = PatientVitals::parse(&args.height, &args.weight, &args.age)?;

    let mut request = GenerationRequest::new(
        &args.organ,
        vitals.height_cm,
        vitals.weight_kg,
        vitals.age_years,
    )
    .with_special_requirements(args.special);
    if let Some(weight) = args.bioink_weight {
        request = request.with_bioink_weight(weight);
    }

    let pipeline = OrganGenerationPipeline::with_config(
        &catalog,
        PipelineConfig {
            stl_format: args.format,
            enforce_volume_bounds: args.strict,
        },
    );
    let output = pipeline.generate(&request)?;
    let fingerprint = output.fingerprint()?;

    if let Err(e) = fs::create_dir_all(&args.output_dir) {
        tracing::warn!(
            dir = %args.output_dir.display(),
            "could not create output directory: {}",
            e
        );
    }
    let stem = format!(
        "{}_{}",
        output.organ,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let artifacts = export_artifacts(
        &pipeline,
        &output,
        &args.output_dir,
        &stem,
        args.procurement,
    );
    let failed = artifacts.iter().filter(|a| a.result.is_err()).count();

    if args.json {
        let files: serde_json::Map<String, serde_json::Value> = artifacts
            .iter()
            .map(|artifact| {
                let value = match &artifact.result {
                    Ok(()) => serde_json::json!({ "path": artifact.path }),
                    Err(e) => serde_json::json!({
                        "path": artifact.path,
                        "error": e.to_string(),
                    }),
                };
                (artifact.kind.to_string(), value)
            })
            .collect();
        let summary = serde_json::json!({
            "organ": output.organ,
            "volume_ml": output.volume,
            "dimensions_cm": output.dimensions,
            "scale_factor": output.scale_factor,
            "bioink_volume_ml": output.bioink_formula.total_volume_ml,
            "total_estimated_cost": output.material_requirements.cost_breakdown.total_estimated_cost,
            "advisories": output.advisories,
            "metadata": output.metadata,
            "fingerprint": fingerprint,
            "files": files,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return export_outcome(failed, artifacts.len());
    }

    println!(
        "{} {} for {:.0} cm / {:.1} kg / {} y",
        "Generated".cyan().bold(),
        output.organ.label().white().bold(),
        vitals.height_cm,
        vitals.weight_kg,
        vitals.age_years
    );
    println!(
        "Volume:        {:.2} ml (scale {:.4}, age factor {:.3})",
        output.volume, output.scale_factor, output.age_factor
    );
    println!(
        "Dimensions:    {:.2} x {:.2} x {:.2} cm",
        output.dimensions.length, output.dimensions.width, output.dimensions.height
    );
    println!(
        "Mesh:          {} vertices, {} faces",
        output.mesh.vertex_count(),
        output.mesh.face_count()
    );
    println!(
        "Bioink:        {:.2} ml, {:.2} h printing",
        output.bioink_formula.total_volume_ml, output.bioink_formula.estimated_printing_time.hours
    );
    println!(
        "Estimated cost: {}",
        format!(
            "${:.2}",
            output.material_requirements.cost_breakdown.total_estimated_cost
        )
        .green()
        .bold()
    );

    if verbose {
        if let Some(mass) = output.estimated_tissue_mass_g {
            println!("Tissue mass:   {:.1} g", mass);
        }
        println!("Size:          {:?}", output.size_adjustment);
    }

    if !output.advisories.is_empty() {
        println!();
        println!("{}", "Advisories:".yellow().bold());
        for advisory in &output.advisories {
            let line = advisory.to_string();
            match advisory.severity {
                Severity::Error => println!("  {}", line.red()),
                Severity::Warning => println!("  {}", line.yellow()),
                Severity::Info => println!("  {}", line.blue()),
            }
        }
    }

    println!();
    println!("{}", "Artifacts:".green().bold());
    for artifact in &artifacts {
        match &artifact.result {
            Ok(()) => println!("  {:12} {}", artifact.kind, artifact.path.display()),
            Err(e) => println!("  {:12} {}", artifact.kind, e.to_string().red()),
        }
    }
    println!("Fingerprint: {}", fingerprint.dimmed());

    export_outcome(failed, artifacts.len())
}

/// One file written (or not) for a generation result.
pub struct Artifact {
    pub kind: &'static str,
    pub path: PathBuf,
    pub result: Result<(), ReplicaError>,
}

/// Write the report, the optional procurement list and the mesh.
///
/// Every artifact is attempted even when an earlier one fails, so a bad mesh
/// path never loses the formulation and material data in the report.
pub fn export_artifacts(
    pipeline: &OrganGenerationPipeline<'_>,
    output: &GenerationOutput,
    dir: &Path,
    stem: &str,
    procurement: bool,
) -> Vec<Artifact> {
    let mut artifacts = Vec::with_capacity(3);

    let path = dir.join(format!("{}.json", stem));
    let result = output.write_report(&path);
    artifacts.push(Artifact {
        kind: "report",
        path,
        result,
    });

    if procurement {
        let path = dir.join(format!("{}_procurement.csv", stem));
        let result = output.procurement_list().export_csv(&path);
        artifacts.push(Artifact {
            kind: "procurement",
            path,
            result,
        });
    }

    let path = dir.join(format!("{}.stl", stem));
    let result = pipeline.export_mesh(output, &path);
    artifacts.push(Artifact {
        kind: "mesh",
        path,
        result,
    });

    for artifact in &artifacts {
        if let Err(e) = &artifact.result {
            tracing::warn!(kind = artifact.kind, "{}", e);
        }
    }
    artifacts
}

fn export_outcome(failed: usize, total: usize) -> Result<(), Box<dyn std::error::Error>> {
    if failed == 0 {
        Ok(())
    } else {
        Err(format!("{} of {} artifacts could not be written", failed, total).into())
    }
}
