//! In-process storage backends.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::KeyValueStorage;
use crate::error::{Result, StorageError};

/// HashMap-backed storage for tests, previews and degraded sessions.
///
/// Clones share the same map. An optional quota caps the total size of all
/// keys and values in bytes, like the browser storage limit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage limited to `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Arc::default(),
            quota: Some(bytes),
        }
    }

    /// Total bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .map(|entries| entries.iter().map(|(k, v)| k.len() + v.len()).sum())
            .unwrap_or(0)
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable {
        reason: "memory storage lock poisoned".into(),
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;

        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let required = others + key.len() + value.len();
            if required > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    limit,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

/// A backend that is never available, e.g. when no data directory can be
/// created. Every operation fails with [`StorageError::Unavailable`].
#[derive(Debug, Clone)]
pub struct UnavailableStorage {
    reason: String,
}

impl UnavailableStorage {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> StorageError {
        StorageError::Unavailable {
            reason: self.reason.clone(),
        }
    }
}

impl KeyValueStorage for UnavailableStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(self.error())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(self.error())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(self.error())
    }

    fn is_degraded(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let storage = MemoryStorage::new();
        storage.set("articles", "[]").unwrap();
        assert_eq!(storage.get("articles").unwrap().as_deref(), Some("[]"));

        storage.remove("articles").unwrap();
        assert!(storage.get("articles").unwrap().is_none());
        // Removing again is fine.
        storage.remove("articles").unwrap();
    }

    #[test]
    fn quota_counts_replaced_value_once() {
        let storage = MemoryStorage::with_quota(16);
        storage.set("k", "0123456789").unwrap(); // 11 bytes
        storage.set("k", "0123456789abcd").unwrap(); // 15 bytes, replaces

        let err = storage.set("k2", "xx").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("0123456789abcd"));
        assert_eq!(storage.used_bytes(), 15);
    }

    #[test]
    fn clones_share_entries() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();
        storage.set("users", "[]").unwrap();
        assert!(clone.get("users").unwrap().is_some());
    }

    #[test]
    fn unavailable_refuses_everything() {
        let storage = UnavailableStorage::new("private mode");
        assert!(storage.get("a").is_err());
        assert!(storage.set("a", "1").is_err());
        assert!(storage.remove("a").is_err());
    }
}
