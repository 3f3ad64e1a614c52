//! Organs command - list the organs the catalog can generate.

use std::path::PathBuf;

use colored::Colorize;

use super::load_catalog;

pub fn run(catalog: Option<PathBuf>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(catalog)?;
    let labels = catalog.organ_labels();

    if json {
        let entries: Vec<_> = labels
            .iter()
            .map(|(key, label)| serde_json::json!({ "key": key, "label": label }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "Supported organs".cyan().bold());
    for (key, label) in labels {
        let volume = key
            .parse()
            .ok()
            .and_then(|organ| catalog.geometry_profile(organ).ok())
            .map(|profile| format!("{:.0} ml reference", profile.base_volume_ml))
            .unwrap_or_default();
        println!("  {:8} {:14} {}", key.white().bold(), label, volume.dimmed());
    }

    Ok(())
}
