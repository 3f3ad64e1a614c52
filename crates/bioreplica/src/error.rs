//! Error types for the bioreplica library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for replica planning operations.
#[derive(Debug, Error)]
pub enum ReplicaError {
    /// Patient vitals missing, non-numeric, or outside their valid domain.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Organ type absent from the catalog consulted by a stage.
    #[error("Unsupported organ type: {0}")]
    UnsupportedOrgan(String),

    /// Named components of a formulation exceed the total bioink volume.
    #[error(
        "Formulation for '{organ}' is inconsistent: solvent residual is {solvent_volume_ml} ml"
    )]
    FormulationConsistency {
        organ: String,
        solvent_volume_ml: f64,
    },

    /// Reference catalog is malformed or references an unknown entry.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Sampled point cloud does not span a three-dimensional hull.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Writing an artifact (mesh, report, procurement list) failed.
    #[error("Export to '{path}' failed: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error reading an input file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the CSV writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ReplicaError {
    /// Returns true if the error came from writing an artifact rather than
    /// from computation. Computed results remain valid and export may be retried.
    pub fn is_export(&self) -> bool {
        matches!(self, ReplicaError::Export { .. } | ReplicaError::Csv(_))
    }
}

/// Result type alias for replica planning operations.
pub type Result<T> = std::result::Result<T, ReplicaError>;
