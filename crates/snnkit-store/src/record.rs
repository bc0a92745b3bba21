//! The `Record` trait and the built-in record types

use crate::schema::{Column, ColumnType, Value};
use core::fmt;
use snnkit_core::SpikeData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A row type with a fixed schema and a primary key
pub trait Record: Clone {
    /// Primary key type
    type Key: Ord + Clone + fmt::Display;

    /// Columns every record of this type exposes
    const SCHEMA: &'static [Column];

    /// Primary key of this record
    fn key(&self) -> &Self::Key;

    /// Value of a schema column, `None` for columns outside the schema
    fn get(&self, column: &str) -> Option<Value>;
}

/// A labelled numeric value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry {
    /// Primary key
    pub key: String,
    /// Free-form label
    pub label: String,
    /// Stored value
    pub value: f64,
}

impl Entry {
    /// Create an entry
    pub fn new(key: impl Into<String>, label: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value,
        }
    }
}

impl Record for Entry {
    type Key = String;

    const SCHEMA: &'static [Column] = &[
        Column::new("key", ColumnType::Text),
        Column::new("label", ColumnType::Text),
        Column::new("value", ColumnType::Float),
    ];

    fn key(&self) -> &String {
        &self.key
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "key" => Some(self.key.as_str().into()),
            "label" => Some(self.label.as_str().into()),
            "value" => Some(self.value.into()),
            _ => None,
        }
    }
}

/// A score measured under one experimental condition
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreEntry {
    /// Primary key
    pub key: String,
    /// Free-form label
    pub label: String,
    /// Condition (template) identifier
    pub cond_id: i64,
    /// Score
    pub value: f64,
}

impl ScoreEntry {
    /// Create a score entry
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        cond_id: i64,
        value: f64,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            cond_id,
            value,
        }
    }
}

impl Record for ScoreEntry {
    type Key = String;

    const SCHEMA: &'static [Column] = &[
        Column::new("key", ColumnType::Text),
        Column::new("label", ColumnType::Text),
        Column::new("cond_id", ColumnType::Integer),
        Column::new("value", ColumnType::Float),
    ];

    fn key(&self) -> &String {
        &self.key
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "key" => Some(self.key.as_str().into()),
            "label" => Some(self.label.as_str().into()),
            "cond_id" => Some(self.cond_id.into()),
            "value" => Some(self.value.into()),
            _ => None,
        }
    }
}

/// Spike data stored under a key
///
/// The spike data itself is opaque to queries; the `channels` and `spikes`
/// columns expose its size.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpikeRecord {
    /// Primary key
    pub key: String,
    /// Free-form label
    pub label: String,
    /// Stored spike data
    pub data: SpikeData,
}

impl SpikeRecord {
    /// Create a spike record; the label defaults to the data's own label
    pub fn new(key: impl Into<String>, data: SpikeData) -> Self {
        let label = data.label().unwrap_or_default().to_owned();
        Self {
            key: key.into(),
            label,
            data,
        }
    }

    /// Override the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl Record for SpikeRecord {
    type Key = String;

    const SCHEMA: &'static [Column] = &[
        Column::new("key", ColumnType::Text),
        Column::new("label", ColumnType::Text),
        Column::new("channels", ColumnType::Integer),
        Column::new("spikes", ColumnType::Integer),
    ];

    fn key(&self) -> &String {
        &self.key
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "key" => Some(self.key.as_str().into()),
            "label" => Some(self.label.as_str().into()),
            "channels" => Some(self.data.channel_count().into()),
            "spikes" => Some(self.data.events().total_spike_count().into()),
            _ => None,
        }
    }
}
