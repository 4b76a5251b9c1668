//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Multi-source transaction history exporter
#[derive(Parser, Debug)]
#[command(name = "ledger-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short, long, global = true, default_value = "settings.yaml")]
    pub config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export all configured sources and write the report
    Export {
        /// Report output path (overrides the settings file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Comma-separated source names to export (empty = all)
        #[arg(long)]
        sources: Option<String>,
    },

    /// Validate the settings file and list the configured sources
    Validate,
}
