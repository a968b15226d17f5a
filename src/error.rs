//! Centralized error types for pff2eml.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the pff2eml library.
///
/// Conditions that only cause an item to be skipped (missing headers,
/// already converted, meetings) are not errors; see [`crate::export::Skip`].
#[derive(Error, Debug)]
pub enum ConvertError {
    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An attachment subfolder holds something that is not an exported message.
    #[error("Unknown attachment '{path}': attachment folders may only contain messages")]
    Structural { path: PathBuf },

    /// An invalid path was provided.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Convenience alias for `Result<T, ConvertError>`.
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// `true` for the attachment-shape violation that aborts a run.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. })
    }
}
