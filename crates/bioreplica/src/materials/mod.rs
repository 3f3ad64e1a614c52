//! Material requirements, cost rollup and procurement.

mod engine;
mod handling;
mod procurement;

pub use engine::{
    Antibiotics, BiologicalKind, BiologicalMaterial, CostBreakdown, CultureMedium, MassUnit,
    MaterialRequirement, MaterialRequirementEngine, MaturationPlan, PostProcessing,
    ScaffoldMaterial,
};
pub use handling::{SafetyRequirements, StorageCondition, StorageRequirements};
pub use procurement::{DEFAULT_SUPPLIER, OrderCategory, ProcurementItem, ProcurementList};
