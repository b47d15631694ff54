//! Error types for journey_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for journey_core operations.
#[derive(Error, Debug)]
pub enum JourneyError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The embedded key-value backend reported a failure.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A stored value could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A stored value could not be decoded into the expected shape.
    #[error("deserialization error for key '{key}': {reason}")]
    Deserialization {
        /// Store key holding the bad value
        key: String,
        /// What went wrong
        reason: String,
    },

    /// Compression or decompression failed.
    #[error("compression error: {0}")]
    Compression(String),

    /// Checksum verification failed while reading a stored value.
    #[error("corrupted value for key '{key}': expected checksum {expected}, got {actual}")]
    CorruptedValue {
        /// Store key holding the corrupted value
        key: String,
        /// Checksum recorded alongside the value
        expected: String,
        /// Checksum computed from the stored bytes
        actual: String,
    },

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The directory does not contain a journey store.
    #[error("not a journey directory: {}", .0.display())]
    NotAJourneyDir(PathBuf),

    /// A journey store already exists at the target location.
    #[error("journey store already exists at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    /// The store is locked by another writer.
    #[error("journey store locked by another process")]
    StoreLocked,

    /// The store lock is held by a live process.
    #[error("journey store lock held by another process (PID: {pid})")]
    StoreLockHeld {
        /// Process ID holding the lock
        pid: u32,
    },

    /// A path index was requested that does not exist in the current graph.
    #[error("no path at index {index} (graph has {count} paths)")]
    PathNotFound {
        /// Requested index
        index: usize,
        /// Number of paths available
        count: usize,
    },

    /// A time window with its end before its start.
    #[error("invalid time window: start {start} is after end {end}")]
    InvalidWindow {
        /// Window start (ms since epoch)
        start: i64,
        /// Window end (ms since epoch)
        end: i64,
    },
}

impl JourneyError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::CorruptedValue { .. } | Self::Deserialization { .. } => Some(
                "The store is damaged. Export what is still readable with 'journey export', then re-initialize.",
            ),
            Self::NotAJourneyDir(_) => Some("Create a store first with 'journey init'."),
            Self::StoreLockHeld { .. } => {
                Some("Another journey process is writing to this store. Wait for it to finish.")
            }
            Self::StoreLocked => Some(
                "Wait for the other process to finish, or remove .journey/LOCK if the process is dead.",
            ),
            Self::PathNotFound { .. } => Some("List available paths with 'journey paths'."),
            _ => None,
        }
    }
}

impl From<redb::Error> for JourneyError {
    fn from(err: redb::Error) -> Self {
        JourneyError::Backend(err.to_string())
    }
}

impl From<redb::DatabaseError> for JourneyError {
    fn from(err: redb::DatabaseError) -> Self {
        JourneyError::Backend(err.to_string())
    }
}

impl From<redb::TransactionError> for JourneyError {
    fn from(err: redb::TransactionError) -> Self {
        JourneyError::Backend(err.to_string())
    }
}

impl From<redb::TableError> for JourneyError {
    fn from(err: redb::TableError) -> Self {
        JourneyError::Backend(err.to_string())
    }
}

impl From<redb::StorageError> for JourneyError {
    fn from(err: redb::StorageError) -> Self {
        JourneyError::Backend(err.to_string())
    }
}

impl From<redb::CommitError> for JourneyError {
    fn from(err: redb::CommitError) -> Self {
        JourneyError::Backend(err.to_string())
    }
}

/// Convenience Result type for journey_core operations.
pub type Result<T> = std::result::Result<T, JourneyError>;
