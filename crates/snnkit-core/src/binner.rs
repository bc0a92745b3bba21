//! Timestamp-to-bin mapping
//!
//! Bins are closed-open intervals `[t_min + k·w, t_min + (k+1)·w)`, except the
//! final bin which also contains `t_max`. Timestamps outside the range are
//! clamped into the first or last bin.

use crate::error::{Result, SpikeDataError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest number of bins a [`Binner`] may define
pub const MAX_BIN_COUNT: usize = 1 << 24;

/// User-facing binning parameters
///
/// `t_min` and `t_max` are optional; missing bounds are taken from the data
/// when the configuration is resolved into a [`Binner`].
///
/// Decoding validates the configuration like [`BinnerConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "UncheckedBinnerConfig")
)]
pub struct BinnerConfig {
    /// Width of every bin (must be positive and finite)
    pub bin_width: f64,
    /// Lower edge of the first bin (default: earliest spike, or 0)
    pub t_min: Option<f64>,
    /// Upper edge of the last bin (default: latest spike)
    pub t_max: Option<f64>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct UncheckedBinnerConfig {
    bin_width: f64,
    #[serde(default)]
    t_min: Option<f64>,
    #[serde(default)]
    t_max: Option<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedBinnerConfig> for BinnerConfig {
    type Error = SpikeDataError;

    fn try_from(raw: UncheckedBinnerConfig) -> Result<Self> {
        let config = Self {
            bin_width: raw.bin_width,
            t_min: raw.t_min,
            t_max: raw.t_max,
        };
        config.validate()?;
        Ok(config)
    }
}

impl BinnerConfig {
    /// Configuration with data-derived bounds
    pub fn new(bin_width: f64) -> Self {
        Self {
            bin_width,
            t_min: None,
            t_max: None,
        }
    }

    /// Fix both bounds
    pub fn with_range(mut self, t_min: f64, t_max: f64) -> Self {
        self.t_min = Some(t_min);
        self.t_max = Some(t_max);
        self
    }

    /// Fix the lower bound
    pub fn with_t_min(mut self, t_min: f64) -> Self {
        self.t_min = Some(t_min);
        self
    }

    /// Fix the upper bound
    pub fn with_t_max(mut self, t_max: f64) -> Self {
        self.t_max = Some(t_max);
        self
    }

    /// Check the parts of the configuration that do not depend on data
    pub fn validate(&self) -> Result<()> {
        if !self.bin_width.is_finite() || self.bin_width <= 0.0 {
            return Err(SpikeDataError::invalid_binner(format!(
                "bin width must be positive and finite, got {}",
                self.bin_width
            )));
        }
        for (name, bound) in [("t_min", self.t_min), ("t_max", self.t_max)] {
            if let Some(value) = bound {
                if !value.is_finite() {
                    return Err(SpikeDataError::invalid_binner(format!(
                        "{} must be finite, got {}",
                        name, value
                    )));
                }
            }
        }
        if let (Some(t_min), Some(t_max)) = (self.t_min, self.t_max) {
            if t_max < t_min {
                return Err(SpikeDataError::invalid_binner(format!(
                    "t_max ({}) is below t_min ({})",
                    t_max, t_min
                )));
            }
        }
        Ok(())
    }

    /// Shift explicit bounds by `-offset`
    pub fn shifted(self, offset: f64) -> Self {
        Self {
            bin_width: self.bin_width,
            t_min: self.t_min.map(|t| t - offset),
            t_max: self.t_max.map(|t| t - offset),
        }
    }

    /// Resolve missing bounds against the data's `(min, max)` spike times
    ///
    /// `data_range` is `None` when there are no spikes; an upper bound then
    /// has to be configured explicitly.
    pub fn resolve(&self, data_range: Option<(f64, f64)>) -> Result<Binner> {
        self.validate()?;
        let t_min = match (self.t_min, data_range) {
            (Some(t_min), _) => t_min,
            (None, Some((lo, _))) => lo,
            (None, None) => 0.0,
        };
        let t_max = match (self.t_max, data_range) {
            (Some(t_max), _) => t_max,
            (None, Some((_, hi))) => hi,
            (None, None) => return Err(SpikeDataError::EmptyEventSet),
        };
        Binner::new(self.bin_width, t_min, t_max)
    }
}

/// A fully resolved binning with known bounds
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "BinnerConfig", into = "BinnerConfig")
)]
pub struct Binner {
    bin_width: f64,
    t_min: f64,
    t_max: f64,
    bin_count: usize,
}

impl Binner {
    /// Create a binner over `[t_min, t_max]`
    ///
    /// Fails when the range needs more than [`MAX_BIN_COUNT`] bins.
    pub fn new(bin_width: f64, t_min: f64, t_max: f64) -> Result<Self> {
        BinnerConfig::new(bin_width)
            .with_range(t_min, t_max)
            .validate()?;

        let span = ((t_max - t_min) / bin_width).ceil();
        if !span.is_finite() || span > MAX_BIN_COUNT as f64 {
            return Err(SpikeDataError::invalid_binner(format!(
                "range [{}, {}] at width {} needs more than {} bins",
                t_min, t_max, bin_width, MAX_BIN_COUNT
            )));
        }
        let bin_count = if span >= 1.0 { span as usize } else { 1 };
        log::trace!(
            "binner: width={} range=[{}, {}] bins={}",
            bin_width,
            t_min,
            t_max,
            bin_count
        );

        Ok(Self {
            bin_width,
            t_min,
            t_max,
            bin_count,
        })
    }

    /// Bin width
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Lower edge of the first bin
    pub fn t_min(&self) -> f64 {
        self.t_min
    }

    /// Upper bound of the binned range
    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    /// Number of bins, `max(1, ceil((t_max - t_min) / bin_width))`
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Bin holding `timestamp`, clamped into `[0, bin_count - 1]`
    pub fn bin_index(&self, timestamp: f64) -> usize {
        let raw = ((timestamp - self.t_min) / self.bin_width).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.bin_count - 1)
        }
    }

    /// Lower edge of bin `k`
    pub fn bin_start(&self, k: usize) -> f64 {
        self.t_min + k as f64 * self.bin_width
    }

    /// All `bin_count + 1` bin edges
    pub fn bin_edges(&self) -> Vec<f64> {
        (0..=self.bin_count).map(|k| self.bin_start(k)).collect()
    }

    /// The configuration that reproduces this binner
    pub fn config(&self) -> BinnerConfig {
        BinnerConfig::new(self.bin_width).with_range(self.t_min, self.t_max)
    }
}

impl TryFrom<BinnerConfig> for Binner {
    type Error = SpikeDataError;

    fn try_from(config: BinnerConfig) -> Result<Self> {
        config.resolve(None)
    }
}

impl From<Binner> for BinnerConfig {
    fn from(binner: Binner) -> Self {
        binner.config()
    }
}
