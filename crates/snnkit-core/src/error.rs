//! Error types for spike data construction and conversion

use core::fmt;
use thiserror::Error;

/// Result type for spike data operations
pub type Result<T> = std::result::Result<T, SpikeDataError>;

/// Errors that can occur while building or converting spike data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpikeDataError {
    /// One or more spike entries failed validation
    #[error("Invalid spike data ({} violation(s)): {}", .violations.len(), join_violations(.violations))]
    InvalidSpikeData {
        /// Every offending entry, in input order
        violations: Vec<Violation>,
    },

    /// An operation needed at least one spike
    #[error("Event set contains no spikes")]
    EmptyEventSet,

    /// Binner configuration is unusable
    #[error("Invalid binner configuration: {reason}")]
    InvalidBinnerConfig {
        /// Reason the configuration was rejected
        reason: String,
    },

    /// Binning was requested before any binner configuration was supplied
    #[error("No binner configuration supplied; construct with one or call set_binner first")]
    BinnerConfigRequired,
}

impl SpikeDataError {
    /// Create an invalid binner configuration error
    pub fn invalid_binner(reason: impl Into<String>) -> Self {
        Self::InvalidBinnerConfig {
            reason: reason.into(),
        }
    }

    /// Create an invalid spike data error from collected violations
    pub fn invalid_spike_data(violations: Vec<Violation>) -> Self {
        Self::InvalidSpikeData { violations }
    }

    /// Violations carried by an `InvalidSpikeData` error (empty for other kinds)
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidSpikeData { violations } => violations,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why a single entry was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViolationKind {
    /// Timestamp below zero
    NegativeTimestamp,
    /// NaN or infinite timestamp
    NonFiniteTimestamp,
    /// Channel index at or above the declared channel count
    ChannelOutOfRange {
        /// Declared channel count
        declared: usize,
    },
    /// Parallel index/time columns differ in length
    ColumnLengthMismatch {
        /// Length of the channel index column
        indices: usize,
        /// Length of the timestamp column
        times: usize,
    },
}

/// A single rejected spike entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Violation {
    /// Channel the entry belongs to
    pub channel: usize,
    /// Offending timestamp, if the entry carried one
    pub timestamp: Option<f64>,
    /// Reason for rejection
    pub kind: ViolationKind,
}

impl Violation {
    /// Violation for a timestamp on a channel
    pub fn timestamp(channel: usize, timestamp: f64, kind: ViolationKind) -> Self {
        Self {
            channel,
            timestamp: Some(timestamp),
            kind,
        }
    }

    /// Violation for a channel that carries no timestamp (e.g. a declared empty channel)
    pub fn channel(channel: usize, kind: ViolationKind) -> Self {
        Self {
            channel,
            timestamp: None,
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.timestamp) {
            (ViolationKind::NegativeTimestamp, Some(t)) => {
                write!(f, "channel {}: timestamp {} is negative", self.channel, t)
            }
            (ViolationKind::NonFiniteTimestamp, Some(t)) => {
                write!(f, "channel {}: timestamp {} is not finite", self.channel, t)
            }
            (ViolationKind::ChannelOutOfRange { declared }, Some(t)) => write!(
                f,
                "channel {} (timestamp {}) exceeds declared channel count {}",
                self.channel, t, declared
            ),
            (ViolationKind::ChannelOutOfRange { declared }, None) => write!(
                f,
                "channel {} exceeds declared channel count {}",
                self.channel, declared
            ),
            (ViolationKind::ColumnLengthMismatch { indices, times }, _) => write!(
                f,
                "index column has {} entries but time column has {}",
                indices, times
            ),
            (kind, None) => write!(f, "channel {}: {:?}", self.channel, kind),
        }
    }
}
