//! Error types for figure rendering

use plotters::drawing::DrawingAreaErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for plotting operations
pub type Result<T> = std::result::Result<T, PlotError>;

/// Errors that can occur while rendering or saving figures
#[derive(Error, Debug)]
pub enum PlotError {
    /// The drawing backend failed
    #[error("Drawing backend error: {reason}")]
    Backend {
        /// Backend error message
        reason: String,
    },

    /// Style file does not exist
    #[error("Style file not found: {}", .path.display())]
    StyleNotFound {
        /// Path that was searched
        path: PathBuf,
    },

    /// Style file exists but is not a valid style
    #[error("Invalid style file {}: {reason}", .path.display())]
    StyleParse {
        /// Path of the style file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        /// Source I/O error
        source: std::io::Error,
    },

    /// Nothing to draw
    #[error("Nothing to plot: {reason}")]
    EmptyData {
        /// What was empty
        reason: String,
    },

    /// Input data is inconsistent
    #[error("Invalid plot data: {reason}")]
    InvalidData {
        /// Reason the data was rejected
        reason: String,
    },

    /// Image format has no backend
    #[error("Unsupported image format: {format} (expected svg or png)")]
    UnsupportedFormat {
        /// Requested format
        format: String,
    },
}

impl PlotError {
    /// Create a backend error
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend {
            reason: reason.into(),
        }
    }

    /// Create an empty data error
    pub fn empty_data(reason: impl Into<String>) -> Self {
        Self::EmptyData {
            reason: reason.into(),
        }
    }

    /// Create an invalid data error
    pub fn invalid_data(reason: impl Into<String>) -> Self {
        Self::InvalidData {
            reason: reason.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for PlotError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::backend(err.to_string())
    }
}
