pub mod analyze;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use augur_core::EngineConfig;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "augur",
    about = "Causal knowledge graphs and outcome forecasts from source text",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a causal graph and predictions for an event
    Analyze {
        /// JSON file holding `event` and `sources`
        request: PathBuf,
        /// Engine configuration file (JSON)
        #[arg(long, env = "AUGUR_CONFIG")]
        config: Option<PathBuf>,
        /// Part of the analysis to print
        #[arg(long, value_enum, default_value_t = OutputMode::All)]
        output: OutputMode,
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Show raw entities and relationships extracted from a text file
    Extract {
        /// Plain text file
        path: PathBuf,
        /// Engine configuration file (JSON)
        #[arg(long, env = "AUGUR_CONFIG")]
        config: Option<PathBuf>,
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print the default engine configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    All,
    Graph,
    Predictions,
}

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    path.map_or_else(
        || Ok(EngineConfig::default()),
        |p| {
            EngineConfig::from_file(p)
                .with_context(|| format!("Failed to load config from {}", p.display()))
        },
    )
}

pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;

    println!("{json}");
    Ok(())
}
