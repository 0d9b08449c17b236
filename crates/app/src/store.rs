//! File-backed client storage

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use solarstore::storage::{ClientStore, StorageError, StorageKey};

/// Errors raised while opening a file store.
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// The store file could not be read.
    #[error("failed to read store file {}", path.display())]
    Read {
        /// Store file
        path: PathBuf,

        /// Underlying I/O error
        source: io::Error,
    },

    /// The store file is not a JSON object of strings.
    #[error("store file {} is not valid", path.display())]
    Parse {
        /// Store file
        path: PathBuf,

        /// Underlying parse error
        source: serde_json::Error,
    },
}

/// Client storage persisted as one JSON object on disk.
///
/// The file is read once when opened and rewritten in full on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns a `FileStoreError` if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let path = path.into();

        let values = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| FileStoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(FileStoreError::Read { path, source }),
        };

        debug!(path = %path.display(), keys = values.len(), "opened client store");

        Ok(Self { path, values })
    }

    /// Path of the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, key: StorageKey) -> Result<(), StorageError> {
        let backend = |message: String| StorageError::Backend { key, message };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| backend(error.to_string()))?;
        }

        let raw =
            serde_json::to_string_pretty(&self.values).map_err(|error| backend(error.to_string()))?;

        fs::write(&self.path, raw).map_err(|error| backend(error.to_string()))
    }
}

impl ClientStore for FileStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key.as_str()).cloned())
    }

    fn set(&mut self, key: StorageKey, value: String) -> Result<(), StorageError> {
        self.values.insert(key.as_str().to_string(), value);

        self.persist(key)
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError> {
        if self.values.remove(key.as_str()).is_none() {
            return Ok(());
        }

        self.persist(key)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_file_opens_empty() -> TestResult {
        let dir = tempdir()?;

        let store = FileStore::open(dir.path().join("store.json"))?;

        assert_eq!(store.get(StorageKey::Cart)?, None);

        Ok(())
    }

    #[test]
    fn values_survive_reopen() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("store.json");

        let mut store = FileStore::open(&path)?;
        store.set(StorageKey::AuthToken, "abc".to_string())?;
        store.set(StorageKey::Cart, r#"{"items":[],"expires":0}"#.to_string())?;

        let reopened = FileStore::open(&path)?;

        assert_eq!(reopened.get(StorageKey::AuthToken)?.as_deref(), Some("abc"));
        assert_eq!(
            reopened.get(StorageKey::Cart)?.as_deref(),
            Some(r#"{"items":[],"expires":0}"#)
        );

        Ok(())
    }

    #[test]
    fn file_uses_storage_key_names() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("store.json");

        let mut store = FileStore::open(&path)?;
        store.set(StorageKey::AuthToken, "abc".to_string())?;

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;

        assert_eq!(raw, serde_json::json!({ "authToken": "abc" }));

        Ok(())
    }

    #[test]
    fn remove_deletes_key() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("store.json");

        let mut store = FileStore::open(&path)?;
        store.set(StorageKey::User, "{}".to_string())?;
        store.remove(StorageKey::User)?;

        assert_eq!(FileStore::open(&path)?.get(StorageKey::User)?, None);

        Ok(())
    }

    #[test]
    fn corrupt_file_is_an_error() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("store.json");
        fs::write(&path, "not json")?;

        let result = FileStore::open(&path);

        assert!(
            matches!(result, Err(FileStoreError::Parse { .. })),
            "expected Parse, got {result:?}"
        );

        Ok(())
    }
}
