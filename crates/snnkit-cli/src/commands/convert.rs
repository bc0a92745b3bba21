//! Conversion between spike representations
//!
//! Example:
//!   snnkit convert spikes.json --layout pairs --to matrix --bin-width 5 --mode count

use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use super::{emit_json, InputArgs};
use crate::config::SnnkitConfig;
use crate::error::{CliError, CliResult};
use crate::input::ColumnsFile;
use snnkit_core::{BinMode, BinaryMatrix};

/// Representation written by `convert`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConvertTarget {
    /// Per-channel ascending spike times
    Raster,
    /// Channel × bin matrix
    Matrix,
    /// Spike counts per channel and in total
    Counts,
    /// Spikes per bin summed over channels
    Population,
    /// `(channel, time)` pairs in channel order
    Pairs,
    /// Parallel index and time columns
    Columns,
}

/// Matrix cell semantics on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// 1 when the bin holds any spike
    Presence,
    /// Number of spikes in the bin
    Count,
}

impl From<ModeArg> for BinMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Presence => BinMode::Presence,
            ModeArg::Count => BinMode::Count,
        }
    }
}

/// Binning flags shared by `convert` and `plot`
#[derive(Args, Debug, Clone, Default)]
pub struct BinningArgs {
    /// Bin width (falls back to `binning.bin_width` from the config)
    #[arg(long)]
    pub bin_width: Option<f64>,

    /// Lower bound of the binned range
    #[arg(long)]
    pub t_min: Option<f64>,

    /// Upper bound of the binned range
    #[arg(long)]
    pub t_max: Option<f64>,

    /// Matrix mode (falls back to `binning.mode` from the config)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
}

impl BinningArgs {
    /// Resolve the binner, rejecting range bounds without a width
    pub fn binner(&self, config: &SnnkitConfig) -> CliResult<Option<snnkit_core::BinnerConfig>> {
        let binner = config.binner(self.bin_width, self.t_min, self.t_max);
        if binner.is_none() && (self.t_min.is_some() || self.t_max.is_some()) {
            return Err(CliError::invalid_args(
                "--t-min/--t-max need a bin width (--bin-width or binning.bin_width)",
            ));
        }
        Ok(binner)
    }

    /// Resolve the matrix mode
    pub fn mode(&self, config: &SnnkitConfig) -> BinMode {
        self.mode.map(BinMode::from).unwrap_or(config.binning.mode)
    }
}

#[derive(Args, Debug)]
pub struct ConvertCommand {
    #[command(flatten)]
    pub input: InputArgs,

    /// Target representation
    #[arg(long, value_enum)]
    pub to: ConvertTarget,

    #[command(flatten)]
    pub binning: BinningArgs,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// JSON form of a binned matrix
#[derive(Debug, Serialize)]
pub struct MatrixOutput {
    /// Cell semantics
    pub mode: BinMode,
    /// Bin edges, `bin_count + 1` values (empty for an empty matrix)
    pub bin_edges: Vec<f64>,
    /// One row of cells per channel
    pub rows: Vec<Vec<u32>>,
}

impl From<&BinaryMatrix> for MatrixOutput {
    fn from(matrix: &BinaryMatrix) -> Self {
        Self {
            mode: matrix.mode(),
            bin_edges: matrix.binner().map(|b| b.bin_edges()).unwrap_or_default(),
            rows: matrix.to_rows(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CountsOutput {
    total: usize,
    per_channel: Vec<usize>,
}

impl ConvertCommand {
    pub fn execute(self, config: &SnnkitConfig) -> CliResult<()> {
        let binner = self.binning.binner(config)?;
        let data = self.input.load(binner)?;
        let out = self.output.as_deref();

        info!(
            "Converting {} to {:?}",
            self.input.input.display(),
            self.to
        );

        match self.to {
            ConvertTarget::Raster => emit_json(data.raster().rows(), out),
            ConvertTarget::Matrix => {
                let matrix = data.binary_matrix(self.binning.mode(config))?;
                emit_json(&MatrixOutput::from(matrix), out)
            }
            ConvertTarget::Counts => {
                let output = CountsOutput {
                    total: data.spike_counts(false).total(),
                    per_channel: data.events().channel_spike_counts(),
                };
                emit_json(&output, out)
            }
            ConvertTarget::Population => emit_json(&data.population_counts()?, out),
            ConvertTarget::Pairs => emit_json(&data.events().to_pairs(), out),
            ConvertTarget::Columns => {
                let (indices, times) = data.events().to_columns();
                emit_json(&ColumnsFile { indices, times }, out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snnkit_core::{BinnerConfig, SpikeData};

    #[test]
    fn test_matrix_output_edges() {
        let data = SpikeData::builder()
            .binner(BinnerConfig::new(0.5).with_range(0.0, 1.0))
            .build_from_indexed(vec![vec![0.1, 0.5, 0.9]])
            .unwrap();
        let output = MatrixOutput::from(data.binary_matrix(BinMode::Count).unwrap());
        assert_eq!(output.bin_edges, vec![0.0, 0.5, 1.0]);
        assert_eq!(output.rows, vec![vec![1, 2]]);
    }

    #[test]
    fn test_range_without_width_rejected() {
        let args = BinningArgs {
            t_max: Some(3.0),
            ..BinningArgs::default()
        };
        let err = args.binner(&SnnkitConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgs(_)));
    }

    #[test]
    fn test_mode_falls_back_to_config() {
        let mut config = SnnkitConfig::default();
        config.binning.mode = BinMode::Count;
        assert_eq!(BinningArgs::default().mode(&config), BinMode::Count);
        let args = BinningArgs {
            mode: Some(ModeArg::Presence),
            ..BinningArgs::default()
        };
        assert_eq!(args.mode(&config), BinMode::Presence);
    }
}
