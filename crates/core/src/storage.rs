//! Persisted client storage

use std::fmt::{Display, Formatter, Result as FmtResult};

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Keys of the durable client storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Session user and role, as JSON.
    User,

    /// Opaque API token.
    AuthToken,

    /// Cart items and expiry, as JSON.
    Cart,
}

impl StorageKey {
    /// The key as it is written to storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StorageKey::User => "user",
            StorageKey::AuthToken => "authToken",
            StorageKey::Cart => "cart",
        }
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend failed to read or write a value.
    #[error("storage backend error for key {key}: {message}")]
    Backend {
        /// Key being accessed
        key: StorageKey,

        /// Backend failure description
        message: String,
    },
}

/// Durable key-value storage for string blobs.
///
/// Writes are plain read-modify-write with no locking. Two writers sharing
/// one backend overwrite each other.
pub trait ClientStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be written.
    fn set(&mut self, key: StorageKey, value: String) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be written.
    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError>;
}

impl<S: ClientStore + ?Sized> ClientStore for &mut S {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: StorageKey, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: FxHashMap<StorageKey, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a value is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: StorageKey) -> bool {
        self.values.contains_key(&key)
    }
}

impl ClientStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(&key).cloned())
    }

    fn set(&mut self, key: StorageKey, value: String) -> Result<(), StorageError> {
        self.values.insert(key, value);

        Ok(())
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError> {
        self.values.remove(&key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn keys_match_persisted_names() {
        assert_eq!(StorageKey::User.as_str(), "user");
        assert_eq!(StorageKey::AuthToken.as_str(), "authToken");
        assert_eq!(StorageKey::Cart.to_string(), "cart");
    }

    #[test]
    fn memory_store_set_get_remove() -> TestResult {
        let mut store = MemoryStore::new();

        assert_eq!(store.get(StorageKey::Cart)?, None);

        store.set(StorageKey::Cart, "{}".to_string())?;
        assert_eq!(store.get(StorageKey::Cart)?.as_deref(), Some("{}"));
        assert!(store.contains(StorageKey::Cart));

        store.remove(StorageKey::Cart)?;
        assert!(!store.contains(StorageKey::Cart));

        Ok(())
    }

    #[test]
    fn removing_missing_key_is_ok() -> TestResult {
        let mut store = MemoryStore::new();

        store.remove(StorageKey::AuthToken)?;

        Ok(())
    }

    #[test]
    fn last_writer_wins() -> TestResult {
        let mut store = MemoryStore::new();

        store.set(StorageKey::User, "first".to_string())?;
        store.set(StorageKey::User, "second".to_string())?;

        assert_eq!(store.get(StorageKey::User)?.as_deref(), Some("second"));

        Ok(())
    }
}
