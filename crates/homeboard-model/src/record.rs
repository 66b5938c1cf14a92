//! Records and collections.

use std::borrow::Cow;
use std::collections::HashSet;
use std::ops::Deref;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::access::{FieldAccess, Fields, Queryable, SortValue};
use crate::error::{ModelError, Result};

/// One persisted entity.
///
/// Serialized as a single flat JSON object: `id`, `createdAt`, `updatedAt`
/// and the caller's fields side by side. Timestamps are only ever assigned
/// by the store; a record handed to a consumer is never mutated in place,
/// [`Record::patched`] produces the next value instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<F> {
    id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    fields: F,
}

impl<F> Record<F> {
    /// Create a fresh record with both timestamps set to `now`.
    pub fn new(id: impl Into<String>, fields: F, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at: now,
            updated_at: now,
            fields,
        }
    }

    /// Rebuild a record from stored parts.
    pub fn from_parts(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        fields: F,
    ) -> Self {
        Self {
            id: id.into(),
            created_at,
            updated_at,
            fields,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[inline]
    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn into_fields(self) -> F {
        self.fields
    }
}

impl<F: Fields> Record<F> {
    /// The record after shallow-merging `patch`, stamped with `now`.
    ///
    /// `id` and `createdAt` are carried over unchanged.
    #[must_use]
    pub fn patched(&self, patch: &F::Patch, now: DateTime<Utc>) -> Self {
        let mut fields = self.fields.clone();
        fields.apply_patch(patch);
        Self {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: now,
            fields,
        }
    }
}

fn timestamp_text(ts: DateTime<Utc>) -> Cow<'static, str> {
    Cow::Owned(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl<F: FieldAccess> Queryable for Record<F> {
    const SEARCH_FIELDS: &'static [&'static str] = F::SEARCH_FIELDS;
    const CATEGORY_FIELDS: &'static [&'static str] = F::CATEGORY_FIELDS;

    fn category_values(field: &str) -> Option<&'static [&'static str]> {
        F::category_values(field)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "id" => Some(Cow::Borrowed(self.id.as_str())),
            "createdAt" => Some(timestamp_text(self.created_at)),
            "updatedAt" => Some(timestamp_text(self.updated_at)),
            other => self.fields.text(other),
        }
    }

    /// The resource's own date, falling back to the creation day.
    fn date(&self) -> Option<NaiveDate> {
        self.fields
            .date()
            .or_else(|| Some(self.created_at.date_naive()))
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "id" => Some(SortValue::text(&self.id)),
            "createdAt" => Some(SortValue::Timestamp(self.created_at)),
            "updatedAt" => Some(SortValue::Timestamp(self.updated_at)),
            other => self.fields.sort_value(other),
        }
    }
}

/// The full stored set of records for one resource, newest first.
///
/// Ids are unique; the constructors and [`Collection::prepend`] enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<F> {
    records: Vec<Record<F>>,
}

impl<F> Default for Collection<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Collection<F> {
    /// An empty collection.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Build a collection, rejecting empty or duplicate ids.
    pub fn from_records(records: Vec<Record<F>>) -> Result<Self> {
        let collection = Self { records };
        collection.validate()?;
        Ok(collection)
    }

    /// Check the id invariants.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if record.id.is_empty() {
                return Err(ModelError::EmptyId);
            }
            if !seen.insert(record.id.as_str()) {
                return Err(ModelError::DuplicateId {
                    id: record.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Find a record by id.
    pub fn get(&self, id: &str) -> Option<&Record<F>> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Ids in collection order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.id.as_str())
    }

    /// Insert a record at the front (newest first).
    pub fn prepend(&mut self, record: Record<F>) -> Result<()> {
        if record.id.is_empty() {
            return Err(ModelError::EmptyId);
        }
        if self.contains(&record.id) {
            return Err(ModelError::DuplicateId { id: record.id });
        }
        self.records.insert(0, record);
        Ok(())
    }

    /// Keep only the records for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Record<F>) -> bool) {
        self.records.retain(keep);
    }

    /// Replace every record for which `select` returns true with `map(record)`.
    ///
    /// Returns the number of replaced records. `map` must keep the id.
    pub fn replace_where(
        &mut self,
        mut select: impl FnMut(&Record<F>) -> bool,
        mut map: impl FnMut(&Record<F>) -> Record<F>,
    ) -> usize {
        let mut replaced = 0;
        for record in &mut self.records {
            if select(record) {
                let next = map(record);
                debug_assert_eq!(next.id, record.id);
                *record = next;
                replaced += 1;
            }
        }
        replaced
    }

    pub fn records(&self) -> &[Record<F>] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record<F>> {
        self.records
    }
}

impl<F> Deref for Collection<F> {
    type Target = [Record<F>];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl<F> IntoIterator for Collection<F> {
    type Item = Record<F>;
    type IntoIter = std::vec::IntoIter<Record<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, F> IntoIterator for &'a Collection<F> {
    type Item = &'a Record<F>;
    type IntoIter = std::slice::Iter<'a, Record<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
