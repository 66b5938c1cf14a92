//! Key/value storage backends.
//!
//! The engine only needs three string operations per key, mirroring the
//! browser storage API it replaces:
//!
//! - [`MemoryStorage`] - process-local map, optional byte quota
//! - [`FileStorage`] - one JSON file per key with atomic writes
//! - [`UnavailableStorage`] - a backend that refuses everything
//! - [`FallbackStorage`] - wraps another backend and degrades to memory when
//!   it fails

mod fallback;
mod file;
mod memory;

pub use fallback::FallbackStorage;
pub use file::FileStorage;
pub use memory::{MemoryStorage, UnavailableStorage};

use crate::error::Result;

/// String key/value storage.
///
/// Implementations are shared between stores through `Arc<dyn
/// KeyValueStorage>`, so they use interior mutability.
pub trait KeyValueStorage: Send + Sync {
    /// Value under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<()>;

    /// Whether writes may currently be lost when the process exits.
    fn is_degraded(&self) -> bool {
        false
    }
}
