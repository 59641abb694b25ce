//! CLI interface for ht-triad
//!
//! Provides subcommands for:
//! - `extract`: process a directory tree of market files
//! - `inspect`: show one match's resolved roles, kick-off, and triads
//! - `config`: show effective configuration

mod extract;
mod inspect;

pub use extract::ExtractArgs;
pub use inspect::InspectArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ht-triad")]
#[command(about = "Synchronized half-time odds triad extractor for football 1X2 markets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a directory tree of market files
    Extract(ExtractArgs),
    /// Show one match's resolved roles, kick-off, and triads
    Inspect(InspectArgs),
    /// Show effective configuration
    Config,
}
