//! Error types for the record store

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while manipulating a table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A record with the same primary key already exists
    #[error("Duplicate key: {key}")]
    DuplicateKey {
        /// Offending key
        key: String,
    },

    /// No record carries the requested key
    #[error("Key not found: {key}")]
    KeyNotFound {
        /// Requested key
        key: String,
    },

    /// Column is not part of the record schema
    #[error("Unknown column: {column}")]
    UnknownColumn {
        /// Requested column
        column: String,
    },

    /// Column holds a different type than the operation needs
    #[error("Column {column} has type {found}, expected {expected}")]
    TypeMismatch {
        /// Column name
        column: String,
        /// Type the operation needs
        expected: String,
        /// Type declared in the schema
        found: String,
    },

    /// Operation needs at least one record
    #[error("Table is empty: {reason}")]
    Empty {
        /// What required data
        reason: String,
    },
}

impl StoreError {
    /// Create a duplicate key error
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Create a key not found error
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Create an unknown column error
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an empty table error
    pub fn empty(reason: impl Into<String>) -> Self {
        Self::Empty {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(StoreError::duplicate_key("a").to_string(), "Duplicate key: a");
        assert_eq!(
            StoreError::type_mismatch("label", "float", "text").to_string(),
            "Column label has type text, expected float"
        );
    }
}
