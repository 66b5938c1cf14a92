//! Typed CRUD over one stored collection.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use homeboard_model::{Clock, Collection, Fields, Record};
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::storage::KeyValueStorage;

/// Durable store for the records of resource `F`.
///
/// The whole collection lives under one storage key as a JSON array and is
/// rewritten in full on every mutation. That is fine for the tens to low
/// hundreds of records an admin screen manages and is the documented scaling
/// limit of this store.
///
/// No operation returns an error. Missing or unreadable data reads as an
/// empty collection, unknown ids are no-ops, and a failed write is logged
/// while the updated collection is still returned to the caller. Reads and
/// writes are separate storage calls, so two writers on the same key race
/// and the last write wins.
pub struct DurableStore<F> {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    key: String,
    _fields: PhantomData<fn() -> F>,
}

impl<F> Clone for DurableStore<F> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            clock: Arc::clone(&self.clock),
            key: self.key.clone(),
            _fields: PhantomData,
        }
    }
}

impl<F> fmt::Debug for DurableStore<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DurableStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<F: Fields> DurableStore<F> {
    /// Store under the resource's collection key.
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self::with_key(storage, clock, F::COLLECTION_KEY)
    }

    /// Store under a custom key.
    pub fn with_key(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            clock,
            key: key.into(),
            _fields: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the whole collection.
    pub fn get_all(&self) -> Collection<F> {
        let text = match self.storage.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return Collection::new(),
            Err(error) => {
                warn!(resource = F::RESOURCE, key = %self.key, %error, "storage unavailable, using empty collection");
                return Collection::new();
            }
        };

        let collection = match serde_json::from_str::<Collection<F>>(&text) {
            Ok(collection) => collection,
            Err(error) => {
                warn!(resource = F::RESOURCE, key = %self.key, %error, "stored collection is corrupt, using empty collection");
                return Collection::new();
            }
        };

        if let Err(error) = collection.validate() {
            warn!(resource = F::RESOURCE, key = %self.key, %error, "stored collection violates id invariants, using empty collection");
            return Collection::new();
        }

        collection
    }

    /// Find one record by id.
    pub fn get_by_id(&self, id: &str) -> Option<Record<F>> {
        self.get_all().into_iter().find(|record| record.id() == id)
    }

    /// Prepend a new record, stamping both timestamps.
    ///
    /// Empty and duplicate ids are rejected with a warning and the collection
    /// is returned unchanged.
    pub fn add(&self, id: impl Into<String>, fields: F) -> Collection<F> {
        let mut collection = self.get_all();
        let record = Record::new(id, fields, self.clock.now());
        let id = record.id().to_string();

        if let Err(error) = collection.prepend(record) {
            warn!(resource = F::RESOURCE, id = %id, %error, "record rejected");
            return collection;
        }

        if self.write(&collection) {
            info!(resource = F::RESOURCE, id = %id, "record added");
        }
        collection
    }

    /// Add a record under a freshly generated id, returning the id as well.
    pub fn add_new(&self, fields: F) -> (String, Collection<F>) {
        let id = uuid::Uuid::new_v4().to_string();
        let collection = self.add(id.clone(), fields);
        (id, collection)
    }

    /// Shallow-merge `patch` into the record with `id`.
    pub fn update(&self, id: &str, patch: &F::Patch) -> Collection<F> {
        self.update_where(|record_id| record_id == id, patch)
    }

    /// Apply the same patch to every listed id. Unknown ids are skipped.
    pub fn update_many<I, S>(&self, ids: I, patch: &F::Patch) -> Collection<F>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: HashSet<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        self.update_where(|record_id| ids.contains(record_id), patch)
    }

    /// Delete the record with `id`.
    pub fn remove(&self, id: &str) -> Collection<F> {
        self.remove_where(|record_id| record_id == id)
    }

    /// Delete every listed id in one write. Unknown ids are skipped.
    pub fn remove_many<I, S>(&self, ids: I) -> Collection<F>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: HashSet<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        self.remove_where(|record_id| ids.contains(record_id))
    }

    fn update_where(&self, matches: impl Fn(&str) -> bool, patch: &F::Patch) -> Collection<F> {
        let mut collection = self.get_all();
        let now = self.clock.now();
        let updated = collection.replace_where(
            |record| matches(record.id()),
            |record| record.patched(patch, now),
        );

        if updated == 0 {
            debug!(resource = F::RESOURCE, "update matched no records");
            return collection;
        }

        if self.write(&collection) {
            info!(resource = F::RESOURCE, count = updated, "records updated");
        }
        collection
    }

    fn remove_where(&self, matches: impl Fn(&str) -> bool) -> Collection<F> {
        let mut collection = self.get_all();
        let before = collection.len();
        collection.retain(|record| !matches(record.id()));
        let removed = before - collection.len();

        if removed == 0 {
            debug!(resource = F::RESOURCE, "remove matched no records");
            return collection;
        }

        if self.write(&collection) {
            info!(resource = F::RESOURCE, count = removed, "records removed");
        }
        collection
    }

    /// Rewrite the whole collection. Returns whether the write succeeded.
    fn write(&self, collection: &Collection<F>) -> bool {
        let result = serde_json::to_string(collection)
            .map_err(|source| StorageError::Serialization {
                key: self.key.clone(),
                source,
            })
            .and_then(|text| self.storage.set(&self.key, &text));

        match result {
            Ok(()) => true,
            Err(error) => {
                warn!(resource = F::RESOURCE, key = %self.key, %error, "collection write failed, change is not durable");
                false
            }
        }
    }
}
