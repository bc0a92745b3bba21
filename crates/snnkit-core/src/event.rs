//! Spike events and validated multi-channel event sets
//!
//! An [`EventSet`] is the raw input representation of spike data: every
//! channel owns an ascending list of timestamps. Construction validates all
//! entries up front and reports every violation at once.

use crate::error::{Result, SpikeDataError, Violation, ViolationKind};
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single spike: the channel that emitted it and when
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpikeEvent {
    /// Emitting channel
    pub channel: usize,
    /// Spike time (finite, non-negative)
    pub timestamp: f64,
}

impl SpikeEvent {
    /// Create a new spike event
    pub const fn new(channel: usize, timestamp: f64) -> Self {
        Self { channel, timestamp }
    }
}

impl fmt::Display for SpikeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Spike(ch{} @ {})", self.channel, self.timestamp)
    }
}

/// How two event sets are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Keep every spike of both sets, duplicates included
    #[default]
    Concatenate,
    /// Keep each distinct timestamp once per channel
    Union,
}

/// Validated multi-channel spike timestamps
///
/// Channels are dense: every index below [`EventSet::channel_count`] is
/// present, possibly with no spikes. Timestamps within a channel are sorted
/// ascending and duplicates are preserved.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")
)]
pub struct EventSet {
    channels: Vec<Vec<f64>>,
}

/// Accumulates raw entries and their violations before an [`EventSet`] is built
struct Assembler {
    channels: Vec<Vec<f64>>,
    declared: Option<usize>,
    violations: Vec<Violation>,
}

impl Assembler {
    fn new(declared: Option<usize>) -> Self {
        Self {
            channels: vec![Vec::new(); declared.unwrap_or(0)],
            declared,
            violations: Vec::new(),
        }
    }

    /// Register a channel even if it carries no spikes
    fn touch(&mut self, channel: usize) -> bool {
        if let Some(declared) = self.declared {
            if channel >= declared {
                return false;
            }
        } else if channel >= self.channels.len() {
            self.channels.resize_with(channel + 1, Vec::new);
        }
        true
    }

    fn declare_channel(&mut self, channel: usize) {
        if !self.touch(channel) {
            let declared = self.declared.unwrap_or(0);
            self.violations.push(Violation::channel(
                channel,
                ViolationKind::ChannelOutOfRange { declared },
            ));
        }
    }

    fn push(&mut self, channel: usize, timestamp: f64) {
        if !timestamp.is_finite() {
            self.violations.push(Violation::timestamp(
                channel,
                timestamp,
                ViolationKind::NonFiniteTimestamp,
            ));
            return;
        }
        if timestamp < 0.0 {
            self.violations.push(Violation::timestamp(
                channel,
                timestamp,
                ViolationKind::NegativeTimestamp,
            ));
            return;
        }
        if !self.touch(channel) {
            let declared = self.declared.unwrap_or(0);
            self.violations.push(Violation::timestamp(
                channel,
                timestamp,
                ViolationKind::ChannelOutOfRange { declared },
            ));
            return;
        }
        self.channels[channel].push(timestamp);
    }

    fn finish(self) -> Result<EventSet> {
        if !self.violations.is_empty() {
            log::debug!(
                "rejecting event set with {} violation(s)",
                self.violations.len()
            );
            return Err(SpikeDataError::invalid_spike_data(self.violations));
        }
        let mut channels = self.channels;
        for times in channels.iter_mut() {
            sort_times(times);
        }
        Ok(EventSet { channels })
    }
}

/// Sort finite timestamps ascending
fn sort_times(times: &mut [f64]) {
    times.sort_by(f64::total_cmp);
}

impl EventSet {
    /// Create an event set with no channels
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a mapping of channel index to spike times
    ///
    /// Every key counts as an observed channel, even when its list is empty.
    pub fn from_channel_map<I, T>(map: I, channel_count: Option<usize>) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, T)>,
        T: IntoIterator<Item = f64>,
    {
        let mut asm = Assembler::new(channel_count);
        for (channel, times) in map {
            // spikes report their own channel violations
            let mut times = times.into_iter().peekable();
            if times.peek().is_none() {
                asm.declare_channel(channel);
            }
            for t in times {
                asm.push(channel, t);
            }
        }
        asm.finish()
    }

    /// Build from a flat sequence of `(channel, timestamp)` pairs
    pub fn from_pairs<I>(pairs: I, channel_count: Option<usize>) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut asm = Assembler::new(channel_count);
        for (channel, t) in pairs {
            asm.push(channel, t);
        }
        asm.finish()
    }

    /// Build from per-channel lists; the channel index is the list position
    pub fn from_indexed<I, T>(lists: I, channel_count: Option<usize>) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = f64>,
    {
        Self::from_channel_map(lists.into_iter().enumerate(), channel_count)
    }

    /// Build from parallel index and time columns (the shape `np.where` produces)
    pub fn from_columns(
        indices: &[usize],
        times: &[f64],
        channel_count: Option<usize>,
    ) -> Result<Self> {
        let mut asm = Assembler::new(channel_count);
        if indices.len() != times.len() {
            asm.violations.push(Violation::channel(
                0,
                ViolationKind::ColumnLengthMismatch {
                    indices: indices.len(),
                    times: times.len(),
                },
            ));
        }
        for (&channel, &t) in indices.iter().zip(times) {
            asm.push(channel, t);
        }
        asm.finish()
    }

    /// Number of channels: highest observed index + 1, or the declared count
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Highest channel index that actually carries a spike, plus one
    fn spiking_extent(&self) -> usize {
        self.channels
            .iter()
            .rposition(|times| !times.is_empty())
            .map_or(0, |idx| idx + 1)
    }

    /// Re-declare the channel count
    ///
    /// Fails if a channel at or above `channel_count` carries spikes.
    pub fn with_channel_count(mut self, channel_count: usize) -> Result<Self> {
        if channel_count < self.spiking_extent() {
            let violations = self
                .channels
                .iter()
                .enumerate()
                .skip(channel_count)
                .flat_map(|(channel, times)| {
                    times.iter().map(move |&t| {
                        Violation::timestamp(
                            channel,
                            t,
                            ViolationKind::ChannelOutOfRange {
                                declared: channel_count,
                            },
                        )
                    })
                })
                .collect();
            return Err(SpikeDataError::invalid_spike_data(violations));
        }
        self.channels.resize_with(channel_count, Vec::new);
        Ok(self)
    }

    /// Sorted spike times for a channel; empty for channels without spikes
    pub fn timestamps_for(&self, channel: usize) -> &[f64] {
        self.channels.get(channel).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of spikes across all channels
    pub fn total_spike_count(&self) -> usize {
        self.channels.iter().map(Vec::len).sum()
    }

    /// Spike count of every channel, in channel order
    pub fn channel_spike_counts(&self) -> Vec<usize> {
        self.channels.iter().map(Vec::len).collect()
    }

    /// Whether the set holds no spikes at all
    pub fn is_empty(&self) -> bool {
        self.total_spike_count() == 0
    }

    /// Earliest and latest spike time over all channels
    pub fn time_range(&self) -> Result<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for times in &self.channels {
            if let (Some(&first), Some(&last)) = (times.first(), times.last()) {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(first), hi.max(last)),
                    None => (first, last),
                });
            }
        }
        range.ok_or(SpikeDataError::EmptyEventSet)
    }

    /// Per-channel timestamp slices, in channel order
    pub fn channels(&self) -> impl Iterator<Item = &[f64]> {
        self.channels.iter().map(Vec::as_slice)
    }

    /// All spikes ordered by channel, then time
    pub fn events(&self) -> impl Iterator<Item = SpikeEvent> + '_ {
        self.channels.iter().enumerate().flat_map(|(channel, times)| {
            times.iter().map(move |&t| SpikeEvent::new(channel, t))
        })
    }

    /// Flatten into `(channel, timestamp)` pairs
    pub fn to_pairs(&self) -> Vec<(usize, f64)> {
        self.events().map(|e| (e.channel, e.timestamp)).collect()
    }

    /// Flatten into parallel index and time columns
    pub fn to_columns(&self) -> (Vec<usize>, Vec<f64>) {
        self.events().map(|e| (e.channel, e.timestamp)).unzip()
    }

    /// Spikes with `t_min <= t <= t_max`, optionally restricted to some channels
    ///
    /// The channel count is preserved; channels outside `channels` come back
    /// empty. With `relative` set, kept times are shifted by `-t_min`.
    pub fn window(
        &self,
        t_min: f64,
        t_max: f64,
        relative: bool,
        channels: Option<&[usize]>,
    ) -> EventSet {
        let offset = if relative { t_min } else { 0.0 };
        let kept = self
            .channels
            .iter()
            .enumerate()
            .map(|(channel, times)| {
                if channels.is_some_and(|keep| !keep.contains(&channel)) {
                    return Vec::new();
                }
                times
                    .iter()
                    .filter(|&&t| t_min <= t && t <= t_max)
                    .map(|&t| t - offset)
                    .collect()
            })
            .collect();
        EventSet { channels: kept }
    }

    /// Combine two event sets channel by channel
    pub fn merge(&self, other: &EventSet, policy: MergePolicy) -> EventSet {
        let count = self.channel_count().max(other.channel_count());
        let channels = (0..count)
            .map(|channel| {
                let mut times: Vec<f64> = self
                    .timestamps_for(channel)
                    .iter()
                    .chain(other.timestamps_for(channel))
                    .copied()
                    .collect();
                sort_times(&mut times);
                if policy == MergePolicy::Union {
                    times.dedup();
                }
                times
            })
            .collect();
        EventSet { channels }
    }
}

impl TryFrom<Vec<Vec<f64>>> for EventSet {
    type Error = SpikeDataError;

    fn try_from(lists: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_indexed(lists, None)
    }
}

impl From<EventSet> for Vec<Vec<f64>> {
    fn from(events: EventSet) -> Self {
        events.channels
    }
}
