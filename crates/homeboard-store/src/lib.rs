//! Durable storage for the Homeboard admin engine.
//!
//! This crate persists record collections and form drafts in string
//! key/value storage, the same contract browser local storage offers.
//!
//! # Features
//!
//! - **Typed collections** through [`DurableStore`], one storage key per resource
//! - **Atomic file writes** in [`FileStorage`] to prevent torn values
//! - **Graceful degradation**: unavailable storage, quota errors and corrupt
//!   JSON fall back to empty reads and in-memory writes, never to errors
//! - **Draft autosave** with a trailing debounce in [`DraftManager`]
//!
//! # Storage layout
//!
//! ```text
//! articles      -> [ {"id": "...", "createdAt": "...", "updatedAt": "...", ...}, ... ]
//! articleDraft  -> { "title": "...", ... }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use homeboard_model::{Article, SystemClock};
//! use homeboard_store::{DurableStore, FileStorage, FallbackStorage};
//!
//! let storage = Arc::new(FallbackStorage::new(FileStorage::open("data")?));
//! let store: DurableStore<Article> = DurableStore::new(storage, Arc::new(SystemClock));
//! let articles = store.add("a-1", Article::default());
//! ```

mod draft;
mod error;
mod storage;
mod store;

pub use draft::{DebounceTimer, DraftConfig, DraftManager, DraftState};
pub use error::{Result, StorageError};
pub use storage::{
    FallbackStorage, FileStorage, KeyValueStorage, MemoryStorage, UnavailableStorage,
};
pub use store::DurableStore;
