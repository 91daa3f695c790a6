//! Error types for the store
//!
//! Provides error handling for:
//! - Storage backend failures (read/write/remove of a key)
//! - Store operations (unknown issue ids, codec failures)
//! - Configuration loading

use ciras_model::IssueId;
use std::path::PathBuf;

/// Main store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Mutation targeted an id that is not in the collection
    #[error("issue not found: {0}")]
    IssueNotFound(IssueId),

    /// Durable storage failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Persisted state could not be encoded or decoded
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl StoreError {
    /// Check if the error only reports an unknown id
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IssueNotFound(_))
    }
}

/// Errors raised by a [`Storage`](crate::storage::Storage) backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error touching a key's backing file
    #[error("io error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Key contains characters the backend cannot store
    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),

    /// Background writer is no longer running
    #[error("storage writer closed")]
    Closed,
}

impl StorageError {
    /// Create IO error for key
    pub fn io_error(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }
}

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML did not match the expected shape
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::IssueNotFound(IssueId::from("ISS-404"));
        assert_eq!(err.to_string(), "issue not found: ISS-404");
        assert!(err.is_not_found());
    }

    #[test]
    fn storage_error_converts() {
        let err: StoreError = StorageError::InvalidKey("../x".to_string()).into();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("invalid storage key"));
    }
}
