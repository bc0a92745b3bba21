//! The `SpikeData` facade
//!
//! [`SpikeData`] owns one validated [`EventSet`] and lazily derives the raster
//! and binned matrices from it. Derived forms are memoized; changing the
//! binner configuration drops the matrices but keeps the raster.

use crate::binner::BinnerConfig;
use crate::convert::{self, BinMode, BinaryMatrix, Raster};
use crate::error::{Result, SpikeDataError};
use crate::event::{EventSet, MergePolicy};
use core::fmt;
use std::cell::OnceCell;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which derived representations are currently cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpikeDataState {
    /// Events validated, nothing derived yet
    Validated,
    /// Raster derived
    Rastered,
    /// At least one binned matrix derived
    Binned,
}

impl fmt::Display for SpikeDataState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validated => "validated",
            Self::Rastered => "rastered",
            Self::Binned => "binned",
        };
        f.write_str(name)
    }
}

/// Spike totals, either per channel or summed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpikeCounts {
    /// One count per channel, in channel order
    PerChannel(Vec<usize>),
    /// Sum over all channels
    Total(usize),
}

impl SpikeCounts {
    /// Total regardless of variant
    pub fn total(&self) -> usize {
        match self {
            Self::PerChannel(counts) => counts.iter().sum(),
            Self::Total(total) => *total,
        }
    }
}

/// Multi-channel spike data with cached derived representations
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpikeData {
    events: EventSet,
    #[cfg_attr(feature = "serde", serde(default))]
    binner: Option<BinnerConfig>,
    #[cfg_attr(feature = "serde", serde(default))]
    label: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    raster: OnceCell<Raster>,
    #[cfg_attr(feature = "serde", serde(skip))]
    presence: OnceCell<BinaryMatrix>,
    #[cfg_attr(feature = "serde", serde(skip))]
    counts: OnceCell<BinaryMatrix>,
}

impl SpikeData {
    /// Start building spike data with optional settings
    pub fn builder() -> SpikeDataBuilder {
        SpikeDataBuilder::default()
    }

    /// Build from a channel → timestamps mapping
    pub fn from_channel_map<I, T>(map: I, channel_count: Option<usize>) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, T)>,
        T: IntoIterator<Item = f64>,
    {
        Self::builder()
            .maybe_channel_count(channel_count)
            .build_from_channel_map(map)
    }

    /// Build from `(channel, timestamp)` pairs
    pub fn from_pairs<I>(pairs: I, channel_count: Option<usize>) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        Self::builder()
            .maybe_channel_count(channel_count)
            .build_from_pairs(pairs)
    }

    /// Build from per-channel lists indexed by position
    pub fn from_indexed<I, T>(lists: I, channel_count: Option<usize>) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = f64>,
    {
        Self::builder()
            .maybe_channel_count(channel_count)
            .build_from_indexed(lists)
    }

    /// Build from parallel index and time columns
    pub fn from_columns(
        indices: &[usize],
        times: &[f64],
        channel_count: Option<usize>,
    ) -> Result<Self> {
        Self::builder()
            .maybe_channel_count(channel_count)
            .build_from_columns(indices, times)
    }

    /// Wrap an already validated event set
    pub fn from_event_set(events: EventSet) -> Self {
        Self::assemble(events, None, None)
    }

    /// Rebuild spike data from a binned matrix, keeping its binning
    pub fn from_binary_matrix(matrix: &BinaryMatrix) -> Result<Self> {
        let events = convert::from_binary_matrix(matrix)?;
        let binner = matrix.binner().map(|b| b.config());
        Ok(Self::assemble(events, binner, None))
    }

    fn assemble(events: EventSet, binner: Option<BinnerConfig>, label: Option<String>) -> Self {
        log::debug!(
            "spike data: {} channel(s), {} spike(s)",
            events.channel_count(),
            events.total_spike_count()
        );
        Self {
            events,
            binner,
            label,
            ..Self::default()
        }
    }

    /// Attach a descriptive label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Descriptive label, if any
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The underlying validated events
    pub fn events(&self) -> &EventSet {
        &self.events
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.events.channel_count()
    }

    /// Earliest and latest spike time
    pub fn time_range(&self) -> Result<(f64, f64)> {
        self.events.time_range()
    }

    /// Current binner configuration
    pub fn binner_config(&self) -> Option<&BinnerConfig> {
        self.binner.as_ref()
    }

    /// Replace the binner configuration
    ///
    /// Cached matrices are dropped; the raster does not depend on binning and
    /// stays cached. An invalid configuration leaves the current one in place.
    pub fn set_binner(&mut self, config: BinnerConfig) -> Result<()> {
        config.validate()?;
        self.binner = Some(config);
        let dropped = [self.presence.take(), self.counts.take()]
            .iter()
            .filter(|cached| cached.is_some())
            .count();
        if dropped > 0 {
            log::debug!("binner changed, dropped {} cached matrix(es)", dropped);
        }
        Ok(())
    }

    /// Which derived representations are cached
    pub fn state(&self) -> SpikeDataState {
        if self.presence.get().is_some() || self.counts.get().is_some() {
            SpikeDataState::Binned
        } else if self.raster.get().is_some() {
            SpikeDataState::Rastered
        } else {
            SpikeDataState::Validated
        }
    }

    /// Per-channel sorted timestamps (cached)
    pub fn raster(&self) -> &Raster {
        self.raster.get_or_init(|| {
            log::trace!("deriving raster");
            convert::to_raster(&self.events)
        })
    }

    /// Channel × bin matrix in the given mode (cached per mode)
    ///
    /// Requires a binner configuration, except for data without channels
    /// which always yields an empty matrix.
    pub fn binary_matrix(&self, mode: BinMode) -> Result<&BinaryMatrix> {
        let cell = match mode {
            BinMode::Presence => &self.presence,
            BinMode::Count => &self.counts,
        };
        if let Some(matrix) = cell.get() {
            return Ok(matrix);
        }
        let matrix = convert::to_binary_matrix(self.raster(), self.binner.as_ref(), mode)?;
        log::debug!(
            "derived {:?} matrix {}x{}",
            mode,
            matrix.channel_count(),
            matrix.bin_count()
        );
        Ok(cell.get_or_init(|| matrix))
    }

    /// Spike totals per channel or overall
    pub fn spike_counts(&self, per_channel: bool) -> SpikeCounts {
        if per_channel {
            SpikeCounts::PerChannel(self.events.channel_spike_counts())
        } else {
            SpikeCounts::Total(self.events.total_spike_count())
        }
    }

    /// Total spikes per bin across all channels
    pub fn population_counts(&self) -> Result<Vec<u32>> {
        Ok(self.binary_matrix(BinMode::Count)?.column_sums())
    }

    /// New spike data holding the spikes with `t_min <= t <= t_max`
    ///
    /// With `relative` set, times and explicit binner bounds are shifted by
    /// `-t_min`.
    pub fn window(
        &self,
        t_min: f64,
        t_max: f64,
        relative: bool,
        channels: Option<&[usize]>,
    ) -> Result<Self> {
        if !(t_min.is_finite() && t_max.is_finite()) || t_max < t_min {
            return Err(SpikeDataError::invalid_binner(format!(
                "window [{}, {}] is not a valid time range",
                t_min, t_max
            )));
        }
        let events = self.events.window(t_min, t_max, relative, channels);
        let binner = self
            .binner
            .map(|config| if relative { config.shifted(t_min) } else { config });
        Ok(Self::assemble(events, binner, self.label.clone()))
    }

    /// Merge two spike data sets
    ///
    /// The result keeps the first non-empty label and binner of `a`, then `b`.
    pub fn combine(a: &SpikeData, b: &SpikeData, policy: MergePolicy) -> Self {
        let events = a.events.merge(&b.events, policy);
        let binner = a.binner.or(b.binner);
        let label = a.label.clone().or_else(|| b.label.clone());
        Self::assemble(events, binner, label)
    }
}

impl PartialEq for SpikeData {
    fn eq(&self, other: &Self) -> bool {
        self.events == other.events && self.binner == other.binner && self.label == other.label
    }
}

impl From<EventSet> for SpikeData {
    fn from(events: EventSet) -> Self {
        Self::from_event_set(events)
    }
}

/// Optional construction settings for [`SpikeData`]
#[derive(Debug, Clone, Default)]
pub struct SpikeDataBuilder {
    channel_count: Option<usize>,
    binner: Option<BinnerConfig>,
    label: Option<String>,
}

impl SpikeDataBuilder {
    /// Declare the channel count instead of inferring it
    pub fn channel_count(mut self, channel_count: usize) -> Self {
        self.channel_count = Some(channel_count);
        self
    }

    fn maybe_channel_count(mut self, channel_count: Option<usize>) -> Self {
        self.channel_count = channel_count;
        self
    }

    /// Configure binning up front
    pub fn binner(mut self, config: BinnerConfig) -> Self {
        self.binner = Some(config);
        self
    }

    /// Attach a label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Build from a channel → timestamps mapping
    pub fn build_from_channel_map<I, T>(self, map: I) -> Result<SpikeData>
    where
        I: IntoIterator<Item = (usize, T)>,
        T: IntoIterator<Item = f64>,
    {
        let events = EventSet::from_channel_map(map, self.channel_count)?;
        self.finish(events)
    }

    /// Build from `(channel, timestamp)` pairs
    pub fn build_from_pairs<I>(self, pairs: I) -> Result<SpikeData>
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let events = EventSet::from_pairs(pairs, self.channel_count)?;
        self.finish(events)
    }

    /// Build from per-channel lists indexed by position
    pub fn build_from_indexed<I, T>(self, lists: I) -> Result<SpikeData>
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = f64>,
    {
        let events = EventSet::from_indexed(lists, self.channel_count)?;
        self.finish(events)
    }

    /// Build from parallel index and time columns
    pub fn build_from_columns(self, indices: &[usize], times: &[f64]) -> Result<SpikeData> {
        let events = EventSet::from_columns(indices, times, self.channel_count)?;
        self.finish(events)
    }

    /// Build from an existing event set, applying the declared channel count
    pub fn build_from_event_set(self, events: EventSet) -> Result<SpikeData> {
        let events = match self.channel_count {
            Some(n) => events.with_channel_count(n)?,
            None => events,
        };
        self.finish(events)
    }

    fn finish(self, events: EventSet) -> Result<SpikeData> {
        if let Some(config) = &self.binner {
            config.validate()?;
        }
        Ok(SpikeData::assemble(events, self.binner, self.label))
    }
}
