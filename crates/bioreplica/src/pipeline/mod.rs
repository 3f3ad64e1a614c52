//! Orchestration of the four stages into one request/response call.
//!
//! Stages run strictly in sequence: the scaler's dimensions feed the mesh
//! generator, its volume feeds the formulation engine, and the formulation's
//! total volume feeds the material engine. Export is a separate step taken
//! only after every stage has succeeded.

mod advisory;
mod orchestrator;

pub use advisory::{Advisory, AdvisoryCode, Severity};
pub use orchestrator::{
    GenerationMetadata, GenerationOutput, GenerationRequest, OrganGenerationPipeline,
    PipelineConfig,
};
