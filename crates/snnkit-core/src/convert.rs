//! Format conversion between event sets, rasters and binned matrices
//!
//! Every conversion here is pure: inputs are borrowed and never modified, and
//! identical inputs always produce identical outputs.

use crate::binner::{Binner, BinnerConfig};
use crate::error::{Result, SpikeDataError};
use crate::event::{EventSet, SpikeEvent};
use ndarray::{Array2, ArrayView1, Axis};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest number of cells a [`BinaryMatrix`] may hold
pub const MAX_MATRIX_CELLS: usize = 1 << 26;

/// Per-channel ascending spike times with dense channel coverage
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Raster {
    rows: Vec<Vec<f64>>,
}

impl Raster {
    /// Number of rows (channels)
    pub fn channel_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the raster has no channels
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Spike times of one channel; empty for unknown channels
    pub fn row(&self, channel: usize) -> &[f64] {
        self.rows.get(channel).map(Vec::as_slice).unwrap_or_default()
    }

    /// All rows in channel order
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// `(channel, times)` for every channel
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[f64])> {
        self.rows.iter().map(Vec::as_slice).enumerate()
    }

    /// Rows in the order given by `key`
    ///
    /// A key may name only some channels; channels it names that do not
    /// exist yield empty rows.
    pub fn ordered(&self, key: &[usize]) -> Vec<Vec<f64>> {
        key.iter().map(|&channel| self.row(channel).to_vec()).collect()
    }

    /// Channel-keyed view of the raster
    pub fn to_map(&self) -> BTreeMap<usize, Vec<f64>> {
        self.rows.iter().cloned().enumerate().collect()
    }

    /// Flatten back into spike events, ordered by channel then time
    pub fn to_events(&self) -> Vec<SpikeEvent> {
        self.iter()
            .flat_map(|(channel, times)| times.iter().map(move |&t| SpikeEvent::new(channel, t)))
            .collect()
    }

    /// Earliest and latest spike over all rows, if any
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let first = self.rows.iter().filter_map(|row| row.first()).copied();
        let last = self.rows.iter().filter_map(|row| row.last()).copied();
        let lo = first.reduce(f64::min)?;
        let hi = last.reduce(f64::max)?;
        Some((lo, hi))
    }
}

/// How spikes sharing a bin are accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum BinMode {
    /// Cell is 1 if the bin holds any spike
    #[default]
    Presence,
    /// Cell holds the number of spikes in the bin
    Count,
}

/// Channel × bin grid of spike presence or counts
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinaryMatrix {
    cells: Array2<u32>,
    mode: BinMode,
    binner: Option<Binner>,
}

impl BinaryMatrix {
    /// A matrix with no channels and no bins
    pub fn empty(mode: BinMode) -> Self {
        Self {
            cells: Array2::zeros((0, 0)),
            mode,
            binner: None,
        }
    }

    /// Number of rows
    pub fn channel_count(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns
    pub fn bin_count(&self) -> usize {
        self.cells.ncols()
    }

    /// `(channels, bins)`
    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Whether the matrix has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Accumulation mode used to fill the cells
    pub fn mode(&self) -> BinMode {
        self.mode
    }

    /// Binning that produced the columns (`None` for a matrix without channels)
    pub fn binner(&self) -> Option<&Binner> {
        self.binner.as_ref()
    }

    /// Cell value, `None` when out of bounds
    pub fn get(&self, channel: usize, bin: usize) -> Option<u32> {
        self.cells.get((channel, bin)).copied()
    }

    /// One channel's row
    pub fn row(&self, channel: usize) -> Option<ArrayView1<'_, u32>> {
        (channel < self.channel_count()).then(|| self.cells.row(channel))
    }

    /// Rows as plain vectors
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.cells.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// Underlying array, shape `(channels, bins)`
    pub fn as_array(&self) -> &Array2<u32> {
        &self.cells
    }

    /// Per-bin totals across channels
    pub fn column_sums(&self) -> Vec<u32> {
        if self.channel_count() == 0 {
            return vec![0; self.bin_count()];
        }
        self.cells.sum_axis(Axis(0)).to_vec()
    }

    /// Largest cell value (0 for an empty matrix)
    pub fn max_value(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }
}

/// Group an event set into a raster
///
/// Channels without spikes appear as empty rows up to `channel_count() - 1`.
pub fn to_raster(events: &EventSet) -> Raster {
    Raster {
        rows: events.channels().map(<[f64]>::to_vec).collect(),
    }
}

/// Bin a raster into a channel × bin matrix
///
/// Fails with [`SpikeDataError::BinnerConfigRequired`] when `config` is
/// `None`. A raster without channels produces an empty matrix.
pub fn to_binary_matrix(
    raster: &Raster,
    config: Option<&BinnerConfig>,
    mode: BinMode,
) -> Result<BinaryMatrix> {
    if raster.is_empty() {
        return Ok(BinaryMatrix::empty(mode));
    }
    let config = config.ok_or(SpikeDataError::BinnerConfigRequired)?;
    let binner = config.resolve(raster.time_range())?;
    bin_raster(raster, &binner, mode)
}

/// Bin a raster with an already resolved binner
///
/// Fails when the matrix would exceed [`MAX_MATRIX_CELLS`].
pub fn bin_raster(raster: &Raster, binner: &Binner, mode: BinMode) -> Result<BinaryMatrix> {
    let shape = (raster.channel_count(), binner.bin_count());
    match shape.0.checked_mul(shape.1) {
        Some(n) if n <= MAX_MATRIX_CELLS => {}
        _ => {
            return Err(SpikeDataError::invalid_binner(format!(
                "{} channel(s) x {} bin(s) exceeds {} matrix cells",
                shape.0, shape.1, MAX_MATRIX_CELLS
            )))
        }
    }
    let mut cells = Array2::<u32>::zeros(shape);
    for (channel, times) in raster.iter() {
        for &t in times {
            let cell = &mut cells[[channel, binner.bin_index(t)]];
            *cell = match mode {
                BinMode::Presence => 1,
                BinMode::Count => *cell + 1,
            };
        }
    }
    log::trace!(
        "binned {} channel(s) into {} bin(s) ({:?})",
        raster.channel_count(),
        binner.bin_count(),
        mode
    );
    Ok(BinaryMatrix {
        cells,
        mode,
        binner: Some(*binner),
    })
}

/// Population histogram: total spikes per bin across all channels
pub fn to_counts(raster: &Raster, config: Option<&BinnerConfig>) -> Result<Vec<u32>> {
    Ok(to_binary_matrix(raster, config, BinMode::Count)?.column_sums())
}

/// Rebuild spike events from a binned matrix
///
/// A cell holding `n` yields `n` spikes at the lower edge of its bin. Matrices
/// without channels yield an empty event set.
pub fn from_binary_matrix(matrix: &BinaryMatrix) -> Result<EventSet> {
    let Some(binner) = matrix.binner() else {
        return Ok(EventSet::new());
    };
    if binner.bin_count() != matrix.bin_count() {
        return Err(SpikeDataError::invalid_binner(format!(
            "matrix has {} bins but its binner defines {}",
            matrix.bin_count(),
            binner.bin_count()
        )));
    }
    let pairs = matrix
        .cells
        .indexed_iter()
        .flat_map(|((channel, bin), &n)| {
            std::iter::repeat((channel, binner.bin_start(bin))).take(n as usize)
        });
    EventSet::from_pairs(pairs, Some(matrix.channel_count()))
}
