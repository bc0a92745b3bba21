//! Column types, cell values and queries

use crate::error::{Result, StoreError};
use core::fmt;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type of a schema column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// UTF-8 text
    Text,
    /// Signed integer
    Integer,
    /// Floating point number
    Float,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
        };
        f.write_str(name)
    }
}

/// A named, typed column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: &'static str,
    /// Column type
    pub ty: ColumnType,
}

impl Column {
    /// Create a column definition
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self { name, ty }
    }
}

/// Look up a column in a schema
pub fn find_column(schema: &[Column], name: &str) -> Result<Column> {
    schema
        .iter()
        .find(|column| column.name == name)
        .copied()
        .ok_or_else(|| StoreError::unknown_column(name))
}

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum Value {
    /// Text cell
    Text(String),
    /// Integer cell
    Integer(i64),
    /// Float cell
    Float(f64),
}

impl Value {
    /// Column type this value belongs to
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Text(_) => ColumnType::Text,
            Self::Integer(_) => ColumnType::Integer,
            Self::Float(_) => ColumnType::Float,
        }
    }

    /// Numeric view; integers widen to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Text view
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => f.write_str(v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// Ordered key used when grouping records by a text or integer column
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum GroupKey {
    /// Integer group
    Integer(i64),
    /// Text group
    Text(String),
}

impl GroupKey {
    pub(crate) fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(v) => Some(Self::Integer(v)),
            Value::Text(v) => Some(Self::Text(v)),
            Value::Float(_) => None,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Accepted values per column
///
/// A record matches when, for every listed column, its value is one of the
/// accepted values. Columns that are not listed match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    accepted: BTreeMap<String, Vec<Value>>,
}

impl Query {
    /// A query matching every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept any of `values` in `column`
    pub fn with<V: Into<Value>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.accepted
            .entry(column.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Constrained columns
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.accepted.keys().map(String::as_str)
    }

    /// Whether the query constrains nothing
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    pub(crate) fn constraints(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.accepted
            .iter()
            .map(|(column, values)| (column.as_str(), values.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &[Column] = &[
        Column::new("key", ColumnType::Text),
        Column::new("value", ColumnType::Float),
    ];

    #[test]
    fn test_find_column() {
        assert_eq!(find_column(SCHEMA, "value").unwrap().ty, ColumnType::Float);
        assert_eq!(
            find_column(SCHEMA, "nope"),
            Err(StoreError::unknown_column("nope"))
        );
    }

    #[test]
    fn test_query_accumulates_values() {
        let query = Query::new().with("cond_id", [1i64]).with("cond_id", [2i64]);
        let (_, values) = query.constraints().next().unwrap();
        assert_eq!(values, &[Value::Integer(1), Value::Integer(2)]);
        assert!(!query.is_empty());
    }

    #[test]
    fn test_group_key_rejects_floats() {
        assert_eq!(GroupKey::from_value(Value::Float(1.0)), None);
        assert_eq!(
            GroupKey::from_value(Value::Integer(3)),
            Some(GroupKey::Integer(3))
        );
    }
}
