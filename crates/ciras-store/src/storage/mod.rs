//! Durable key-value storage
//!
//! The store and the session provider read and write whole records under
//! string keys. Backends:
//! - [`MemoryStorage`]: process-local map
//! - [`FileStorage`]: one JSON file per key in a data directory
//! - [`WriteBehindStorage`]: queues writes to a background task over any backend

mod file;
mod memory;
mod write_behind;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use write_behind::WriteBehindStorage;

use crate::error::StorageError;
use std::fmt::Debug;

/// Marker key set once demo issues have been seeded
pub const DEMO_MARKER_KEY: &str = "ciras-demo-initialized";

/// Marker key set once a real issue has been reported
pub const REAL_ISSUES_MARKER_KEY: &str = "ciras-has-real-issues";

/// String key-value store
pub trait Storage: Send + Sync + Debug {
    /// Read the value under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Whether `key` currently holds a value
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}
