//! snnkit CLI crate
//!
//! The binary (`src/main.rs`) wires up logging and argument parsing and calls
//! [`SnnkitCli::execute`]. The library surface exposes the command modules so
//! they can be exercised in tests without spawning a process.
//!
//! Commands (see [`commands`]):
//! - `convert`: spike file → raster, matrix, counts, population, pairs or columns JSON.
//! - `inspect`: channel/spike counts and time range.
//! - `snapshot`: export/import whole spike data as JSON or bincode.
//! - `plot`: raster, heat-map and population figures.
//! - `store`: record tables over directories of spike files.
//! - `config`: show, query or initialize the TOML configuration.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;

pub use commands::SnnkitCli;
