//! Procurement list grouped by ordering lead time.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bioink::title_case;
use crate::error::{ReplicaError, Result};

use super::engine::{MassUnit, MaterialRequirement};

pub const DEFAULT_SUPPLIER: &str = "Standard biochemical supplier";

/// Lead-time category of a procured item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderCategory {
    /// Stock items.
    Immediate,
    /// Matrices and growth factors with longer lead times.
    Advance,
    /// Made to order.
    CustomSynthesis,
}

impl OrderCategory {
    /// Categorise by material name; advance keywords win over custom ones.
    pub fn for_material(name: &str) -> Self {
        if name.contains("growth_factor") || name.contains("matrix") {
            OrderCategory::Advance
        } else if name.contains("custom") || name.contains("specialized") {
            OrderCategory::CustomSynthesis
        } else {
            OrderCategory::Immediate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementItem {
    /// Material key as it appears in the requirement.
    pub material: String,
    /// Display name.
    pub name: String,
    pub amount: f64,
    pub unit: MassUnit,
    pub cost_usd: f64,
    pub supplier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementList {
    pub immediate_order: Vec<ProcurementItem>,
    pub advance_order: Vec<ProcurementItem>,
    pub custom_synthesis: Vec<ProcurementItem>,
    pub total_estimated_cost: f64,
}

/// Flat CSV row.
#[derive(Debug, Serialize)]
struct ProcurementRecord<'a> {
    category: OrderCategory,
    material: &'a str,
    name: &'a str,
    amount: f64,
    unit: &'static str,
    cost_usd: f64,
    supplier: &'a str,
}

impl ProcurementList {
    /// Scaffold materials first, then biological materials.
    pub fn from_requirement(requirement: &MaterialRequirement) -> Self {
        let scaffold = requirement
            .scaffold_materials
            .iter()
            .map(|(key, m)| (key, m.mass_g, MassUnit::Gram, m.cost_usd));
        let biological = requirement
            .biological_materials
            .iter()
            .map(|(key, m)| (key, m.amount, m.unit, m.cost_usd));

        let mut list = ProcurementList {
            immediate_order: Vec::new(),
            advance_order: Vec::new(),
            custom_synthesis: Vec::new(),
            total_estimated_cost: requirement.cost_breakdown.total_estimated_cost,
        };

        for (key, amount, unit, cost_usd) in scaffold.chain(biological) {
            let item = ProcurementItem {
                material: key.clone(),
                name: title_case(key),
                amount,
                unit,
                cost_usd,
                supplier: DEFAULT_SUPPLIER.to_string(),
            };
            match OrderCategory::for_material(key) {
                OrderCategory::Immediate => list.immediate_order.push(item),
                OrderCategory::Advance => list.advance_order.push(item),
                OrderCategory::CustomSynthesis => list.custom_synthesis.push(item),
            }
        }

        list
    }

    /// All items with their category, in list order.
    pub fn items(&self) -> impl Iterator<Item = (OrderCategory, &ProcurementItem)> {
        let immediate = self
            .immediate_order
            .iter()
            .map(|item| (OrderCategory::Immediate, item));
        let advance = self
            .advance_order
            .iter()
            .map(|item| (OrderCategory::Advance, item));
        let custom = self
            .custom_synthesis
            .iter()
            .map(|item| (OrderCategory::CustomSynthesis, item));
        immediate.chain(advance).chain(custom)
    }

    pub fn len(&self) -> usize {
        self.immediate_order.len() + self.advance_order.len() + self.custom_synthesis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the list as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for (category, item) in self.items() {
            csv_writer.serialize(ProcurementRecord {
                category,
                material: &item.material,
                name: &item.name,
                amount: item.amount,
                unit: item.unit.symbol(),
                cost_usd: item.cost_usd,
                supplier: &item.supplier,
            })?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Write the list to a CSV file.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ReplicaError::Export {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.write_csv(file)?;
        debug!(path = %path.display(), items = self.len(), "exported procurement list");
        Ok(())
    }
}
