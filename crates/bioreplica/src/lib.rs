//! Bioreplica: patient-specific organ replica planning for bioprinting.
//!
//! Given a patient's height, weight and age and a target organ, bioreplica
//! scales a reference geometry to the patient, synthesizes a closed surface
//! mesh, formulates the bioink and derives the scaffold, biological and
//! post-processing materials with a cost rollup.
//!
//! # Core Principles
//!
//! - **Pure stages**: every engine is a function of its inputs and a borrowed
//!   [`ReferenceCatalog`]; there is no hidden mutable state
//! - **Explicit configuration**: all reference constants live in the catalog
//!   and can be swapped per run
//! - **Isolated side effects**: files are written only by export functions,
//!   after computation has finished
//!
//! # Example
//!
//! ```
//! use bioreplica::{GenerationRequest, OrganGenerationPipeline};
//!
//! let pipeline = OrganGenerationPipeline::builtin();
//! let output = pipeline
//!     .generate(&GenerationRequest::new("heart", 175.0, 70.0, 30))
//!     .unwrap();
//!
//! assert_eq!(output.volume, 310.0);
//! assert_eq!(output.bioink_formula.total_volume_ml, 387.5);
//! println!("Faces: {}", output.mesh.face_count());
//! ```

pub mod anthropometry;
pub mod bioink;
pub mod catalog;
pub mod error;
pub mod materials;
pub mod mesh;
pub mod pipeline;

pub use anthropometry::{AnthropometricScaler, Dimensions, PatientVitals, ScaledGeometry};
pub use bioink::{BioinkFormulation, BioinkFormulationEngine, PreparationProtocol};
pub use catalog::{OrganType, ReferenceCatalog};
pub use error::{ReplicaError, Result};
pub use materials::{MaterialRequirement, MaterialRequirementEngine, ProcurementList};
pub use mesh::{Mesh, ParametricMeshGenerator, SizeAdjustment, StlFormat, export_stl};
pub use pipeline::{
    Advisory, GenerationOutput, GenerationRequest, OrganGenerationPipeline, PipelineConfig,
    Severity,
};
