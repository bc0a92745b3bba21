//! Snapshot export/import of whole spike data
//!
//! A snapshot stores the validated events together with the binner
//! configuration and label, so an imported snapshot bins exactly like the
//! original. Derived caches are never stored.
//!
//! Example:
//!   snnkit snapshot export trial.json --layout pairs --bin-width 5 --format bincode -o trial.bin
//!   snnkit snapshot import trial.bin --format bincode

use clap::{Args, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;

use super::convert::BinningArgs;
use super::inspect::summary;
use super::InputArgs;
use crate::config::SnnkitConfig;
use crate::error::CliResult;
use snnkit_core::SpikeData;

#[derive(Args, Debug)]
pub struct SnapshotCommand {
    #[command(subcommand)]
    pub sub: SnapshotSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SnapshotSubcommand {
    /// Export a spike file as a snapshot
    Export(SnapshotExport),
    /// Import a snapshot and print its summary
    Import(SnapshotImport),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Bincode,
}

#[derive(Args, Debug)]
pub struct SnapshotExport {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub binning: BinningArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: SnapshotFormat,

    /// Output snapshot file path
    #[arg(short, long)]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct SnapshotImport {
    /// Input snapshot file path
    pub snapshot: PathBuf,

    /// Input format
    #[arg(long, value_enum, default_value = "json")]
    pub format: SnapshotFormat,

    /// Also print per-channel counts
    #[arg(long)]
    pub detailed: bool,
}

impl SnapshotCommand {
    pub fn execute(self, config: &SnnkitConfig) -> CliResult<()> {
        match self.sub {
            SnapshotSubcommand::Export(cmd) => cmd.execute(config),
            SnapshotSubcommand::Import(cmd) => cmd.execute(),
        }
    }
}

impl SnapshotExport {
    pub fn execute(self, config: &SnnkitConfig) -> CliResult<()> {
        let data = self.input.load(self.binning.binner(config)?)?;
        write_snapshot(&data, &self.out, self.format)?;
        info!(
            "Exported snapshot ({:?}) with {} spike(s) to {}",
            self.format,
            data.spike_counts(false).total(),
            self.out.display()
        );
        Ok(())
    }
}

impl SnapshotImport {
    pub fn execute(self) -> CliResult<()> {
        let data = read_snapshot(&self.snapshot, self.format)?;
        info!("Imported snapshot from {}", self.snapshot.display());
        print!("{}", summary(&data, self.detailed)?);
        Ok(())
    }
}

/// Serialize spike data to `path` in the given format
pub fn write_snapshot(data: &SpikeData, path: &Path, format: SnapshotFormat) -> CliResult<()> {
    let bytes = match format {
        SnapshotFormat::Json => serde_json::to_string_pretty(data)?.into_bytes(),
        SnapshotFormat::Bincode => bincode::serialize(data)?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Deserialize spike data from `path`; validation runs during decoding
pub fn read_snapshot(path: &Path, format: SnapshotFormat) -> CliResult<SpikeData> {
    let bytes = std::fs::read(path)?;
    let data = match format {
        SnapshotFormat::Json => serde_json::from_slice(&bytes)?,
        SnapshotFormat::Bincode => bincode::deserialize(&bytes)?,
    };
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snnkit_core::{BinMode, BinnerConfig};

    #[test]
    fn test_snapshot_keeps_binner_and_label() {
        let tmp = tempfile::tempdir().unwrap();
        let data = SpikeData::builder()
            .binner(BinnerConfig::new(0.5).with_range(0.0, 1.0))
            .label("scenario")
            .build_from_indexed(vec![vec![0.1, 0.5, 0.9]])
            .unwrap();
        data.binary_matrix(BinMode::Count).unwrap();

        for format in [SnapshotFormat::Json, SnapshotFormat::Bincode] {
            let path = tmp.path().join(format!("snap-{:?}", format));
            write_snapshot(&data, &path, format).unwrap();
            let back = read_snapshot(&path, format).unwrap();
            assert_eq!(back, data);
            assert_eq!(back.label(), Some("scenario"));
            assert_eq!(
                back.binary_matrix(BinMode::Count).unwrap().to_rows(),
                vec![vec![1, 2]]
            );
        }
    }

    #[test]
    fn test_tampered_json_snapshot_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, r#"{"events": [[-1.0]]}"#).unwrap();
        assert!(read_snapshot(&path, SnapshotFormat::Json).is_err());
    }
}
