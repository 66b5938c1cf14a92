//! Debounced autosave of one in-progress edit.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use homeboard_model::{Clock, Fields, Record, merge_field};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{DebounceTimer, DraftConfig};
use crate::error::StorageError;
use crate::storage::KeyValueStorage;
use crate::store::DurableStore;

/// Lifecycle of the draft held by a [`DraftManager`].
///
/// `Empty` doubles as the state after a cancel or publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    /// No draft in memory.
    Empty,
    /// In-memory draft has changes not yet written.
    Editing,
    /// In-memory draft matches what is stored.
    Persisted,
}

/// Autosave for a single form.
///
/// Every field change is applied to the in-memory draft at once and (re)starts
/// a quiet-period timer; the draft is written only when the owner calls
/// [`DraftManager::tick`] after input has paused. The draft lives under one
/// fixed storage key per form type, so drafts of different shapes never
/// share a key.
///
/// Navigating away does not clear anything: the stored draft stays until
/// [`DraftManager::clear_draft`] (cancel) or [`DraftManager::publish`].
/// [`DraftManager::dispose`] tears the editing context down without writing
/// whatever was still pending.
pub struct DraftManager<D> {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    key: String,
    resource: &'static str,
    timer: DebounceTimer,
    autosave: bool,
    current: Option<D>,
    restored: bool,
    state: DraftState,
    writes: u64,
}

impl<D> DraftManager<D>
where
    D: Serialize + DeserializeOwned + Clone + Default,
{
    /// Manager for the draft stored under `key`.
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
        config: &DraftConfig,
    ) -> Self {
        Self {
            storage,
            clock,
            key: key.into(),
            resource: "draft",
            timer: DebounceTimer::new(config.quiet_period()),
            autosave: config.enabled,
            current: None,
            restored: false,
            state: DraftState::Empty,
            writes: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn state(&self) -> DraftState {
        self.state
    }

    /// The in-memory draft.
    pub fn current(&self) -> Option<&D> {
        self.current.as_ref()
    }

    /// Whether an autosave is waiting for the quiet period to end.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// When the pending autosave becomes due.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.timer.deadline()
    }

    /// Number of successful draft writes made by this manager.
    #[inline]
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Read the stored draft, bypassing the in-memory copy.
    ///
    /// Missing, unreadable and malformed drafts all read as `None`.
    pub fn load_draft(&self) -> Option<D> {
        let text = match self.storage.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(error) => {
                warn!(key = %self.key, %error, "draft storage unavailable");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(draft) => Some(draft),
            Err(error) => {
                warn!(key = %self.key, %error, "stored draft is corrupt, ignoring it");
                None
            }
        }
    }

    /// Bring a stored draft back into the editor.
    ///
    /// Works once per manager: later calls return `None`, as does a call made
    /// after editing already started, so a restore never clobbers new input.
    pub fn restore(&mut self) -> Option<D> {
        if self.restored {
            return None;
        }
        self.restored = true;

        if self.current.is_some() {
            debug!(key = %self.key, "editing already started, skipping draft restore");
            return None;
        }

        let draft = self.load_draft()?;
        self.current = Some(draft.clone());
        self.state = DraftState::Persisted;
        info!(key = %self.key, "draft restored");
        Some(draft)
    }

    /// Set one field of the draft and restart the autosave timer.
    ///
    /// The in-memory draft changes immediately. A field name the draft does
    /// not have, or a value of the wrong type, is logged and ignored.
    pub fn on_field_change(&mut self, field: &str, value: Value) -> &D {
        let base = self.current.take().unwrap_or_default();
        match merge_field(self.resource, &base, field, value) {
            Ok(next) => {
                self.current = Some(next);
                self.mark_edited();
            }
            Err(error) => {
                warn!(key = %self.key, field, %error, "draft field change ignored");
                self.current = Some(base);
            }
        }
        self.current.get_or_insert_with(D::default)
    }

    /// Edit the draft in place and restart the autosave timer.
    pub fn edit(&mut self, change: impl FnOnce(&mut D)) -> &D {
        change(self.current.get_or_insert_with(D::default));
        self.mark_edited();
        self.current.get_or_insert_with(D::default)
    }

    fn mark_edited(&mut self) {
        self.state = DraftState::Editing;
        if self.autosave {
            self.timer.schedule(self.clock.now());
        }
    }

    /// Poll the autosave timer. Writes the draft once the quiet period has
    /// passed and returns whether a write happened.
    pub fn tick(&mut self) -> bool {
        if self.timer.fire(self.clock.now()) {
            self.persist()
        } else {
            false
        }
    }

    /// Write a pending autosave right away.
    pub fn flush(&mut self) -> bool {
        if self.timer.cancel() {
            self.persist()
        } else {
            false
        }
    }

    /// Replace the draft and write it immediately.
    pub fn save_draft(&mut self, draft: D) -> bool {
        self.timer.cancel();
        self.current = Some(draft);
        self.state = DraftState::Editing;
        self.persist()
    }

    /// Discard the draft in memory and in storage.
    pub fn clear_draft(&mut self) {
        if self.timer.cancel() {
            debug!(key = %self.key, "pending draft write cancelled");
        }
        self.current = None;
        self.state = DraftState::Empty;
        if let Err(error) = self.storage.remove(&self.key) {
            warn!(key = %self.key, %error, "failed to remove stored draft");
        }
    }

    /// Turn the draft into a record of `store`.
    ///
    /// `build` converts the draft into the resource's fields. The draft is
    /// cleared only when the new record can be read back from the store;
    /// otherwise it stays so the user can retry. An id already present in
    /// the store is refused.
    pub fn publish<F: Fields>(
        &mut self,
        store: &DurableStore<F>,
        id: impl Into<String>,
        build: impl FnOnce(D) -> F,
    ) -> Option<Record<F>> {
        let id = id.into();
        let Some(draft) = self.current.clone().or_else(|| self.load_draft()) else {
            debug!(key = %self.key, "nothing to publish");
            return None;
        };
        if store.get_by_id(&id).is_some() {
            warn!(key = %self.key, id = %id, "publish refused, id already exists");
            return None;
        }

        store.add(id.clone(), build(draft));

        match store.get_by_id(&id) {
            Some(record) => {
                self.clear_draft();
                info!(key = %self.key, id = %id, "draft published");
                Some(record)
            }
            None => {
                warn!(key = %self.key, id = %id, "published record not readable, keeping draft");
                None
            }
        }
    }

    /// Tear down the editing context.
    ///
    /// A pending autosave is dropped, not written. Returns the last
    /// in-memory draft.
    pub fn dispose(mut self) -> Option<D> {
        if self.timer.cancel() {
            debug!(key = %self.key, "discarding pending draft write on dispose");
        }
        self.current.take()
    }

    fn persist(&mut self) -> bool {
        let Some(draft) = &self.current else {
            return false;
        };
        let result = serde_json::to_string(draft)
            .map_err(|source| StorageError::Serialization {
                key: self.key.clone(),
                source,
            })
            .and_then(|text| self.storage.set(&self.key, &text));

        match result {
            Ok(()) => {
                self.writes += 1;
                self.state = DraftState::Persisted;
                debug!(key = %self.key, writes = self.writes, "draft saved");
                true
            }
            Err(error) => {
                warn!(key = %self.key, %error, "draft save failed, keeping it in memory");
                false
            }
        }
    }
}

impl<F: Fields + Default> DraftManager<F> {
    /// Manager for the create/edit form of resource `F`, using its draft key.
    pub fn for_resource(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        config: &DraftConfig,
    ) -> Self {
        let mut manager = Self::new(storage, clock, F::DRAFT_KEY, config);
        manager.resource = F::RESOURCE;
        manager
    }
}
