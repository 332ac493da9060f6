//! layer-lint CLI tool.
//!
//! Usage:
//! ```bash
//! layer-lint check --imports imports.json [--config layer-lint.toml]
//! layer-lint rules [--config layer-lint.toml]
//! layer-lint init
//! ```
//!
//! Exit codes: 0 when the report passed, 1 when violations were found,
//! 2 when the rule file or the import data could not be used.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod ingest;

/// Architecture boundary validator: checks component dependency graphs
/// against declared layering rules
#[derive(Parser)]
#[command(name = "layer-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the rule configuration file
    #[arg(short, long, global = true, default_value = "layer-lint.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an import list against the configured rules
    Check {
        /// Path to the JSON import list produced by an extractor
        #[arg(short, long)]
        imports: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the effective rule set in declaration order
    Rules,

    /// Write a starter configuration file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for validation reports.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let outcome = match cli.command {
        Commands::Check { imports, format } => commands::check::run(&cli.config, &imports, format),
        Commands::Rules => commands::rules::run(&cli.config),
        Commands::Init { force } => commands::init::run(&cli.config, force),
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            // Rule-file and ingestion problems abort the run; a distinct
            // exit code lets operators tell them apart from violations.
            eprintln!("error: {error:#}");
            std::process::exit(2);
        }
    }
}
