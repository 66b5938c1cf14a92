//! Storage error types.
//!
//! Backends report failures as [`StorageError`]. The record store and the
//! draft manager never hand these to their callers: they log them and fall
//! back to safe defaults. The typed errors exist so the log line says what
//! actually went wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Key/value storage failure.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage backend cannot be used at all.
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },

    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete write of key `{key}`")]
    AtomicWriteFailed {
        key: String,
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the value would exceed the backend's size limit.
    #[error("Storage quota exceeded writing `{key}` ({required} of {limit} bytes)")]
    QuotaExceeded {
        key: String,
        required: usize,
        limit: usize,
    },

    /// Key contains characters the backend cannot store.
    #[error("Invalid storage key: `{key}`")]
    InvalidKey { key: String },

    /// Value could not be encoded as JSON.
    #[error("Failed to serialize value for `{key}`")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unavailable { .. } => {
                "Local storage is not available; changes are kept for this session only."
                    .to_string()
            }
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::QuotaExceeded { .. } => {
                "Local storage is full; the latest change was not saved.".to_string()
            }
            Self::InvalidKey { key } => format!("'{key}' cannot be used as a storage key."),
            Self::Serialization { .. } => "An error occurred while saving the data.".to_string(),
        }
    }
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
