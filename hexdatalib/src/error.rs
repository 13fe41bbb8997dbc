//! The `error` module defines the [`HexDataError`] enum that describes the errors that
//! can occur when loading, editing, or writing the byte buffer via [`HexData`](crate::HexData).
//!
//! None of these errors is fatal. Reads past the end of the buffer never produce an error
//! (they return `0`), writes past the end produce [`HexDataError::OutOfBounds`] and leave
//! the buffer untouched.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HexDataError {
    /// File is missing, unreadable or was truncated while reading
    #[error("Failed to open or read file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// File could not be created or fully written
    #[error("Failed to write file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Save was requested but the buffer was never bound to a file
    #[error("No file path set")]
    NoFilePath,
    /// Write access outside of `[0, size)`
    #[error("Offset 0x{offset:X} is out of bounds (data size: {size} bytes)")]
    OutOfBounds { offset: usize, size: usize },
    /// Options file exists but is not valid JSON for [`AppOptions`](crate::AppOptions)
    #[error("Failed to parse options: {0}")]
    Options(#[from] serde_json::Error),
}

impl HexDataError {
    /// Check if the error was caused by an out-of-range write
    #[must_use]
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}
