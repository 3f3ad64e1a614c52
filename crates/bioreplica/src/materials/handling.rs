//! Static safety and storage guidance returned with every requirement.

use serde::{Deserialize, Serialize};

/// Laboratory safety requirements for handling the materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyRequirements {
    pub biosafety_level: String,
    pub ppe_required: Vec<String>,
    pub ventilation: String,
    pub waste_disposal: String,
    pub special_precautions: Vec<String>,
}

impl SafetyRequirements {
    /// Guidance shared by every archetype.
    pub fn standard() -> Self {
        Self {
            biosafety_level: "BSL-2".to_string(),
            ppe_required: strings(&["gloves", "lab_coat", "safety_glasses", "face_mask"]),
            ventilation: "biosafety_cabinet_class_ii".to_string(),
            waste_disposal: "biohazard_autoclave".to_string(),
            special_precautions: strings(&[
                "All work must be performed in sterile conditions",
                "Regular sterility testing required",
                "Temperature monitoring throughout process",
                "Documentation of all material lots and expiration dates",
            ]),
        }
    }
}

/// Storage conditions for one class of material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageCondition {
    pub temperature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf_life: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handling: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRequirements {
    pub bioink_components: StorageCondition,
    pub biological_materials: StorageCondition,
    pub scaffold_materials: StorageCondition,
    pub finished_constructs: StorageCondition,
}

impl StorageRequirements {
    pub fn standard() -> Self {
        Self {
            bioink_components: StorageCondition {
                temperature: "2-8°C".to_string(),
                humidity: Some("<60%".to_string()),
                shelf_life: Some("6-24 months depending on component".to_string()),
                handling: strings(&["protect from light"]),
            },
            biological_materials: StorageCondition {
                temperature: "-20°C to -80°C".to_string(),
                humidity: None,
                shelf_life: Some("12-36 months".to_string()),
                handling: strings(&["aliquot to avoid freeze-thaw cycles"]),
            },
            scaffold_materials: StorageCondition {
                temperature: "room temperature".to_string(),
                humidity: Some("<30%".to_string()),
                shelf_life: None,
                handling: strings(&["sealed containers with desiccant"]),
            },
            finished_constructs: StorageCondition {
                temperature: "37°C in incubator".to_string(),
                humidity: Some("95%".to_string()),
                shelf_life: None,
                handling: strings(&["5% CO2", "medium changes every 2-3 days"]),
            },
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
