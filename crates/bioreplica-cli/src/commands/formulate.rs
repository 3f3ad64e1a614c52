//! Formulate command - bioink recipe for a given organ volume.

use std::path::PathBuf;

use bioreplica::bioink::ComponentRole;
use bioreplica::{BioinkFormulationEngine, OrganType, PreparationProtocol};
use colored::Colorize;

use super::load_catalog;

pub fn run(
    catalog: Option<PathBuf>,
    organ: String,
    volume: f64,
    weight: f64,
    protocol: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(catalog)?;
    let organ: OrganType = organ.parse()?;

    let formulation = BioinkFormulationEngine::new(&catalog).formulate(organ, volume, weight)?;
    let steps = protocol.then(|| PreparationProtocol::from_formulation(&formulation));

    if json {
        let value = match steps {
            Some(steps) => serde_json::json!({
                "formulation": formulation,
                "protocol": steps.steps,
            }),
            None => serde_json::to_value(&formulation)?,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{} {} ({:.1} ml organ volume)",
        "Bioink for".cyan().bold(),
        organ.label().white().bold(),
        volume
    );
    println!("Total volume:     {:.2} ml", formulation.total_volume_ml);
    println!(
        "Cell density:     {:.3e} cells/ml (x{:.3})",
        formulation.cell_density, formulation.adjustment_factor
    );
    println!("Viscosity:        {:.0} mPa s", formulation.printing_viscosity);
    println!(
        "Printing time:    {:.2} h ({:.0} min)",
        formulation.estimated_printing_time.hours, formulation.estimated_printing_time.minutes
    );
    println!(
        "Storage:          {:.0} C, {:.0} h shelf life",
        formulation.storage_temperature.temperature_celsius, formulation.shelf_life_hours
    );

    println!();
    println!("{}", "Components:".yellow().bold());
    for (name, component) in &formulation.components {
        let role = match component.role {
            ComponentRole::Base => "base".normal(),
            ComponentRole::Crosslinker => "crosslinker".magenta(),
            ComponentRole::Solvent => "solvent".blue(),
        };
        println!(
            "  {:24} {:>10.3} ml {:>10.3} g  {:>6.2}%  {}",
            name,
            component.volume_ml,
            component.mass_g,
            component.concentration * 100.0,
            role
        );
    }

    if let Some(steps) = steps {
        println!();
        println!("{}", "Preparation protocol:".yellow().bold());
        for step in &steps.steps {
            println!("  {}", step);
        }
    }

    Ok(())
}
