//! Bench preparation protocol derived from a formulation.
//!
//! Advisory output only; no later stage reads it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::formulation::BioinkFormulation;

/// Base components dissolve in this order; absent ones are skipped.
pub const DISSOLUTION_ORDER: [&str; 9] = [
    "gelatin",
    "alginate",
    "hyaluronic_acid",
    "collagen",
    "chitosan",
    "decellularized_ecm",
    "peg_diacrylate",
    "chondroitin_sulfate",
    "agarose",
];

/// Crosslinking chemistries recognised by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrosslinkChemistry {
    Calcium,
    Thrombin,
    Genipin,
    Photoinitiator,
}

impl CrosslinkChemistry {
    pub const ALL: [CrosslinkChemistry; 4] = [
        CrosslinkChemistry::Calcium,
        CrosslinkChemistry::Thrombin,
        CrosslinkChemistry::Genipin,
        CrosslinkChemistry::Photoinitiator,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            CrosslinkChemistry::Calcium => "calcium",
            CrosslinkChemistry::Thrombin => "thrombin",
            CrosslinkChemistry::Genipin => "genipin",
            CrosslinkChemistry::Photoinitiator => "photoinitiator",
        }
    }

    /// Classify a component by substring match on its name.
    pub fn detect(component: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|chemistry| component.contains(chemistry.keyword()))
    }
}

/// Ordered, numbered preparation steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparationProtocol {
    pub steps: Vec<String>,
}

impl PreparationProtocol {
    pub fn from_formulation(formulation: &BioinkFormulation) -> Self {
        let mut steps = vec![
            "1. Pre-cool all solutions to 4°C".to_string(),
            "2. Prepare sterile PBS medium in biosafety cabinet".to_string(),
            "3. Dissolve polymers in the following order:".to_string(),
        ];

        let mut step = 4;
        for name in DISSOLUTION_ORDER {
            if let Some(component) = formulation.components.get(name) {
                steps.push(format!(
                    "{}. Add {:.3}g {}",
                    step,
                    component.mass_g,
                    title_case(name)
                ));
                steps.push("   Mix at 37°C for 30 minutes until fully dissolved".to_string());
                step += 1;
            }
        }

        steps.push(format!("{}. Cool solution to room temperature", step));
        steps.push(format!(
            "{}. Add crosslinking agents just before printing:",
            step + 1
        ));
        step += 2;

        for (name, component) in &formulation.components {
            if CrosslinkChemistry::detect(name).is_some() {
                steps.push(format!("   - {:.4}g {}", component.mass_g, title_case(name)));
            }
        }

        steps.push(format!("{}. Filter sterilize through 0.22μm filter", step));
        steps.push(format!("{}. Load into bioprinter cartridge", step + 1));
        steps.push(format!(
            "{}. Begin printing within 30 minutes of preparation",
            step + 2
        ));

        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for PreparationProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.steps {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// `hyaluronic_acid` -> `Hyaluronic Acid`.
pub(crate) fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
