//! Spike-sequence conversion engine
//!
//! This crate turns raw multi-channel spike times into the representations
//! used for analysis and plotting: validated event sets, per-channel rasters
//! and time-binned matrices (presence or counts).
//!
//! ```
//! use snnkit_core::{BinMode, BinnerConfig, SpikeData};
//!
//! let data = SpikeData::builder()
//!     .binner(BinnerConfig::new(0.5).with_range(0.0, 1.0))
//!     .build_from_indexed(vec![vec![0.1, 0.5, 0.9]])?;
//! let counts = data.binary_matrix(BinMode::Count)?;
//! assert_eq!(counts.to_rows(), vec![vec![1, 2]]);
//! # Ok::<(), snnkit_core::SpikeDataError>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod binner;
pub mod convert;
pub mod error;
pub mod event;
pub mod spike_data;

pub use binner::{Binner, BinnerConfig, MAX_BIN_COUNT};
pub use convert::{BinMode, BinaryMatrix, Raster, MAX_MATRIX_CELLS};
pub use error::{Result, SpikeDataError, Violation, ViolationKind};
pub use event::{EventSet, MergePolicy, SpikeEvent};
pub use spike_data::{SpikeCounts, SpikeData, SpikeDataBuilder, SpikeDataState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
