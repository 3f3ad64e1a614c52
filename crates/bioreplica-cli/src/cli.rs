//! Command-line argument definitions.

use std::path::PathBuf;

use bioreplica::StlFormat;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bioreplica")]
#[command(version, about = "Patient-specific organ replica planning", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (implies debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Reference catalog JSON to use instead of the built-in one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the organs the catalog can generate
    Organs {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the full pipeline for one patient and write the artifacts
    Generate(GenerateArgs),

    /// Formulate the bioink for a given organ volume
    Formulate {
        /// Organ type (heart, kidney, liver, ear)
        organ: String,

        /// Organ volume (ml)
        #[arg(long)]
        volume: f64,

        /// Patient weight used for the cell-density adjustment (kg)
        #[arg(long, default_value = "70")]
        weight: f64,

        /// Also print the preparation protocol
        #[arg(long)]
        protocol: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute material requirements and costs for a bioink volume
    Materials {
        /// Organ type (heart, kidney, liver, ear)
        organ: String,

        /// Bioink volume (ml)
        #[arg(long)]
        bioink_volume: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Organ type (heart, kidney, liver, ear)
    pub organ: String,

    /// Patient height (cm)
    #[arg(long)]
    pub height: String,

    /// Patient weight (kg)
    #[arg(long)]
    pub weight: String,

    /// Patient age (years)
    #[arg(long)]
    pub age: String,

    /// Weight used for the bioink adjustment (defaults to the patient weight)
    #[arg(long)]
    pub bioink_weight: Option<f64>,

    /// Free-text requirements, e.g. "reduced size"
    #[arg(long, default_value = "")]
    pub special: String,

    /// Directory for the generated files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// STL encoding (binary, ascii)
    #[arg(long, default_value = "binary")]
    pub format: StlFormat,

    /// Fail when the volume leaves the printable range
    #[arg(long)]
    pub strict: bool,

    /// Also write a procurement CSV
    #[arg(long)]
    pub procurement: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}
