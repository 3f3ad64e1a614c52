//! Materials command - scaffold, biological and post-processing requirements.

use std::path::PathBuf;

use bioreplica::{MaterialRequirementEngine, OrganType};
use colored::Colorize;

use super::load_catalog;

pub fn run(
    catalog: Option<PathBuf>,
    organ: String,
    bioink_volume: f64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(catalog)?;
    let organ: OrganType = organ.parse()?;

    let requirement = MaterialRequirementEngine::new(&catalog).calculate(organ, bioink_volume)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&requirement)?);
        return Ok(());
    }

    println!(
        "{} {} ({:.1} ml bioink)",
        "Materials for".cyan().bold(),
        organ.label().white().bold(),
        bioink_volume
    );

    println!();
    println!("{}", "Scaffold:".yellow().bold());
    for (name, item) in &requirement.scaffold_materials {
        println!("  {:24} {:>10.3} g  ${:>9.2}", name, item.mass_g, item.cost_usd);
    }

    println!();
    println!("{}", "Biological:".yellow().bold());
    for (name, item) in &requirement.biological_materials {
        println!(
            "  {:24} {:>10.4} {:2} ${:>9.2}",
            name,
            item.amount,
            item.unit.symbol(),
            item.cost_usd
        );
    }

    let post = &requirement.post_processing;
    println!();
    println!("{}", "Post-processing:".yellow().bold());
    println!(
        "  Culture medium: {:.0} ml per change, {:.0} ml total",
        post.culture_medium.volume_ml, post.culture_medium.total_volume_ml
    );

    let costs = &requirement.cost_breakdown;
    println!();
    println!("{}", "Costs (USD):".yellow().bold());
    for (label, value) in [
        ("Scaffold materials", costs.scaffold_materials),
        ("Biological materials", costs.biological_materials),
        ("Culture medium", costs.culture_medium),
        ("Antibiotics", costs.antibiotics),
        ("Maturation", costs.maturation),
        ("Quality control", costs.quality_control),
        ("Labor", costs.labor_estimate),
        ("Equipment", costs.equipment_usage),
    ] {
        println!("  {:22} {:>12.2}", label, value);
    }
    println!("  {:22} {:>12.2}", "Subtotal", costs.subtotal);
    println!(
        "  {:22} {:>12.2}",
        format!("Overhead ({:.0}%)", costs.overhead_rate * 100.0),
        costs.overhead
    );
    println!(
        "  {:22} {}",
        "Total".bold(),
        format!("{:>12.2}", costs.total_estimated_cost).green().bold()
    );

    Ok(())
}
