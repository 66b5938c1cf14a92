//! Degrade-to-memory wrapper.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::warn;

use super::KeyValueStorage;
use crate::error::Result;

/// Wraps a backend so that its failures never reach the caller.
///
/// A failed write is kept in an in-memory overlay (a failed remove leaves a
/// tombstone), and reads consult the overlay first, so the session keeps
/// seeing its own changes even though they are not durable. A failed read of
/// a key with no overlay entry reads as absent. Successful primary writes
/// drop the overlay entry again.
pub struct FallbackStorage<S> {
    primary: S,
    overlay: RwLock<HashMap<String, Option<String>>>,
    degraded: AtomicBool,
}

impl<S: KeyValueStorage> FallbackStorage<S> {
    pub fn new(primary: S) -> Self {
        Self {
            primary,
            overlay: RwLock::new(HashMap::new()),
            degraded: AtomicBool::new(false),
        }
    }

    pub fn primary(&self) -> &S {
        &self.primary
    }

    fn overlay_get(&self, key: &str) -> Option<Option<String>> {
        self.overlay
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn overlay_put(&self, key: &str, value: Option<String>) {
        self.overlay
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn overlay_drop(&self, key: &str) {
        self.overlay
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn mark_degraded(&self) {
        self.degraded.store(true, Ordering::Relaxed);
    }
}

impl<S: KeyValueStorage> KeyValueStorage for FallbackStorage<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(entry) = self.overlay_get(key) {
            return Ok(entry);
        }
        match self.primary.get(key) {
            Ok(value) => Ok(value),
            Err(error) => {
                warn!(key, %error, "storage read failed, treating key as absent");
                self.mark_degraded();
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        match self.primary.set(key, value) {
            Ok(()) => self.overlay_drop(key),
            Err(error) => {
                warn!(key, %error, "storage write failed, keeping value in memory only");
                self.mark_degraded();
                self.overlay_put(key, Some(value.to_string()));
            }
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self.primary.remove(key) {
            Ok(()) => self.overlay_drop(key),
            Err(error) => {
                warn!(key, %error, "storage remove failed, hiding key for this session");
                self.mark_degraded();
                self.overlay_put(key, None);
            }
        }
        Ok(())
    }

    /// Whether any operation has fallen back to memory.
    fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }
}
