//! Fixed-schema in-memory record tables
//!
//! Records declare their columns once through the [`Record`] trait; a
//! [`Table`] keeps them in insertion order, indexed by primary key, and
//! answers value-list queries and per-group statistics.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod record;
pub mod schema;
pub mod table;

pub use error::{Result, StoreError};
pub use record::{Entry, Record, ScoreEntry, SpikeRecord};
pub use schema::{Column, ColumnType, GroupKey, Query, Value};
pub use table::{GroupStat, Table};
