use std::path::PathBuf;

use thiserror::Error;

use crate::types::ItemId;

#[derive(Error, Debug)]
pub enum RecorderError {
    /// A container or widget the producer wanted is not present yet.
    #[error("Host state unavailable: {what}")]
    HostStateUnavailable { what: &'static str },

    #[error("Price lookup failed for item {item_id}: {reason}")]
    PriceLookupFailure { item_id: ItemId, reason: String },

    /// Existing record file could not be parsed; it is replaced by a fresh document.
    #[error("Existing record file {path} is corrupt: {reason}")]
    ExistingFileCorrupt { path: PathBuf, reason: String },

    #[error("Write to {path} failed: {source}")]
    WriteFailure {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Read of {path} failed: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No active session identity")]
    IdentityUnresolved,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RecorderError {
    pub fn write_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailure { path: path.into(), source }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type RecorderResult<T> = Result<T, RecorderError>;
