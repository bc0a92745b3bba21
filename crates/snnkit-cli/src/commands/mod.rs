//! CLI command implementations for snnkit

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::SnnkitConfig;
use crate::error::CliResult;
use crate::input::{load_spike_data, InputLayout};
use snnkit_core::{BinnerConfig, SpikeData};

pub mod config;
pub mod convert;
pub mod inspect;
pub mod plot;
pub mod snapshot;
pub mod store;

/// snnkit - spike-sequence conversion and plotting
#[derive(Parser, Debug)]
#[command(
    name = "snnkit",
    version,
    about = "Spike-sequence conversion and plotting",
    long_about = "snnkit converts multi-channel spike recordings between event lists, \
                  rasters and binned matrices, summarizes directories of recordings \
                  and renders raster, heat-map and population figures."
)]
pub struct SnnkitCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SNNKIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a spike file to another representation
    Convert(convert::ConvertCommand),

    /// Summarize a spike file
    Inspect(inspect::InspectCommand),

    /// Snapshot export/import of whole spike data
    Snapshot(snapshot::SnapshotCommand),

    /// Render figures into the configured figure directory
    #[command(alias = "viz")]
    Plot(plot::PlotCommand),

    /// Record table operations over directories of spike files
    Store(store::StoreCommand),

    /// Show or initialize the configuration
    Config(config::ConfigCommand),
}

impl SnnkitCli {
    /// Load the configuration this invocation should use
    pub fn load_config(&self) -> CliResult<SnnkitConfig> {
        SnnkitConfig::load(self.config.as_deref())
    }

    /// Whether this invocation is `config init`, which must run even when
    /// the existing config file cannot be read
    pub fn initializes_config(&self) -> bool {
        matches!(
            self.command,
            Commands::Config(config::ConfigCommand {
                sub: config::ConfigSubcommand::Init { .. }
            })
        )
    }

    /// Execute the CLI command
    pub fn execute(self, config: &SnnkitConfig) -> CliResult<()> {
        match self.command {
            Commands::Convert(cmd) => cmd.execute(config),
            Commands::Inspect(cmd) => cmd.execute(config),
            Commands::Snapshot(cmd) => cmd.execute(config),
            Commands::Plot(cmd) => cmd.execute(config),
            Commands::Store(cmd) => cmd.execute(config),
            Commands::Config(cmd) => cmd.execute(config, self.config),
        }
    }
}

/// Spike file arguments shared by the commands that read one
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Spike file (JSON)
    pub input: PathBuf,

    /// JSON layout of the spike file
    #[arg(short, long, value_enum, default_value = "map")]
    pub layout: InputLayout,

    /// Declared channel count (inferred from the data when omitted)
    #[arg(long)]
    pub channels: Option<usize>,
}

impl InputArgs {
    /// Load the spike file with an optional binner attached
    pub fn load(&self, binner: Option<BinnerConfig>) -> CliResult<SpikeData> {
        load_spike_data(&self.input, self.layout, self.channels, binner)
    }
}

/// Write pretty JSON to `out`, or to stdout when no path is given
pub fn emit_json<T: Serialize + ?Sized>(value: &T, out: Option<&Path>) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initializes_config() {
        let init = SnnkitCli::try_parse_from(["snnkit", "config", "init", "--force"]).unwrap();
        assert!(init.initializes_config());

        let show = SnnkitCli::try_parse_from(["snnkit", "config", "show"]).unwrap();
        assert!(!show.initializes_config());
    }
}
