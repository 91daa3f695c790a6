use super::Storage;
use crate::error::StorageError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory-backed storage: key `k` lives in `<dir>/k.json`
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never sees a half-written record.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the data directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| StorageError::io_error(dir.display().to_string(), e))?;
        Ok(Self { dir })
    }

    /// Data directory
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| StorageError::io_error(key, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| StorageError::io_error(key, e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io_error(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.set("ciras-issues", "[]").unwrap();

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("ciras-issues").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("ciras-issues.json").exists());
        assert!(!dir.path().join("ciras-issues.json.tmp").exists());
    }

    #[test]
    fn missing_key_reads_as_none_and_removes_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.get("ciras-user").unwrap().is_none());
        storage.remove("ciras-user").unwrap();
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        for key in ["../escape", "a/b", "", "dot.key"] {
            assert!(
                matches!(storage.set(key, "x"), Err(StorageError::InvalidKey(_))),
                "{key:?} accepted"
            );
        }
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::open(&nested).unwrap();
        assert_eq!(storage.dir(), nested.as_path());
        assert!(nested.is_dir());
    }
}
