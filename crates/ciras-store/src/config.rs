//! Store configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid:
//!
//! ```toml
//! data_dir = ".ciras"
//! assignment_policy = "guarded"
//! persistence = "write-behind"
//!
//! [keys]
//! user = "ciras-user"
//! issues = "ciras-issues"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What assigning a department does to the status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentPolicy {
    /// Always set the status to assigned, whatever it was
    #[default]
    Unconditional,
    /// Promote submitted issues only; later statuses are kept
    Guarded,
}

/// How mutations reach durable storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersistenceMode {
    /// Write before the mutation returns
    #[default]
    WriteThrough,
    /// Queue the write to a background task
    WriteBehind,
}

/// Storage keys for the two persisted records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub user: String,
    pub issues: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            user: "ciras-user".to_string(),
            issues: "ciras-issues".to_string(),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory for file-backed storage
    pub data_dir: PathBuf,
    pub assignment_policy: AssignmentPolicy,
    pub persistence: PersistenceMode,
    pub keys: StorageKeys,
}

impl StoreConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// With assignment policy
    #[inline]
    #[must_use]
    pub fn with_assignment_policy(mut self, policy: AssignmentPolicy) -> Self {
        self.assignment_policy = policy;
        self
    }

    /// With persistence mode
    #[inline]
    #[must_use]
    pub fn with_persistence(mut self, mode: PersistenceMode) -> Self {
        self.persistence = mode;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".ciras"),
            assignment_policy: AssignmentPolicy::default(),
            persistence: PersistenceMode::default(),
            keys: StorageKeys::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.keys.issues, "ciras-issues");
        assert_eq!(config.assignment_policy, AssignmentPolicy::Unconditional);
    }

    #[test]
    fn toml_overrides_fields() {
        let config = StoreConfig::from_toml_str(
            r#"
            data_dir = "/var/lib/ciras"
            assignment_policy = "guarded"
            persistence = "write-behind"

            [keys]
            issues = "campus-issues"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/ciras"));
        assert_eq!(config.assignment_policy, AssignmentPolicy::Guarded);
        assert_eq!(config.persistence, PersistenceMode::WriteBehind);
        assert_eq!(config.keys.issues, "campus-issues");
        assert_eq!(config.keys.user, "ciras-user");
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = StoreConfig::from_toml_str("assignment_policy = \"lenient\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = StoreConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
