//! Bioreplica CLI - plan patient-specific organ replicas.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.verbose);

    let catalog = cli.catalog;
    let result = match cli.command {
        Commands::Organs { json } => commands::organs::run(catalog, json),
        Commands::Generate(args) => commands::generate::run(catalog, args, cli.verbose),
        Commands::Formulate {
            organ,
            volume,
            weight,
            protocol,
            json,
        } => commands::formulate::run(catalog, organ, volume, weight, protocol, json),
        Commands::Materials {
            organ,
            bioink_volume,
            json,
        } => commands::materials::run(catalog, organ, bioink_volume, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: &str, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        match level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    };

    // logs go to stderr so JSON output on stdout stays parseable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {}", e);
    }
}
