//! Error types for the storage layer.

use std::path::PathBuf;

/// Errors that can occur while reading or writing persisted session data.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read, written, or renamed.
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object of strings.
    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
