//! Traits describing resource shapes.
//!
//! [`Fields`] ties a field set to its storage keys and patch type.
//! [`FieldAccess`] exposes fields by name so search, filtering and sorting can
//! stay generic. [`Queryable`] is what the query engine consumes; it is
//! implemented for every [`Record`](crate::Record) whose fields implement
//! [`FieldAccess`].

use std::borrow::Cow;
use std::fmt::Debug;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A caller-defined field set that can be stored as a record.
pub trait Fields: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Human-readable resource name used in logs and errors.
    const RESOURCE: &'static str;

    /// Storage key holding the JSON array of records.
    const COLLECTION_KEY: &'static str;

    /// Storage key holding the single in-progress draft for this resource.
    const DRAFT_KEY: &'static str;

    /// Partial update applied by `update`. Unset members leave the field alone.
    type Patch: Serialize + DeserializeOwned + Clone + Debug + Default;

    /// Shallow-merge `patch` into `self`.
    fn apply_patch(&mut self, patch: &Self::Patch);
}

/// A value used for ordering records.
///
/// Values of different variants order by variant; resources only ever return
/// one variant per field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Number(i64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    /// Lowercased text, so ordering is case-insensitive.
    Text(String),
}

impl SortValue {
    /// Case-insensitive text key.
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_lowercase())
    }
}

/// Named access to the fields of a resource.
pub trait FieldAccess {
    /// Fields consulted by free-text search.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Fields that accept categorical equality filters.
    const CATEGORY_FIELDS: &'static [&'static str];

    /// Every value a closed category field can take, `None` for free text.
    ///
    /// Filters on closed fields match case-insensitively, and a value outside
    /// the list is ignored rather than matching nothing.
    fn category_values(_field: &str) -> Option<&'static [&'static str]> {
        None
    }

    /// Text value of a field, `None` when the field is unknown or empty.
    fn text(&self, field: &str) -> Option<Cow<'_, str>>;

    /// The date compared against a filter's lower bound.
    fn date(&self) -> Option<NaiveDate> {
        None
    }

    /// Sort key for a field. Defaults to the case-insensitive text value.
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        self.text(field).map(|value| SortValue::text(&value))
    }
}

/// Anything the query engine can search, filter, sort and select.
pub trait Queryable {
    /// Fields consulted by free-text search.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Fields that accept categorical equality filters.
    const CATEGORY_FIELDS: &'static [&'static str];

    /// Allowed values of a closed category field, `None` for free text.
    fn category_values(_field: &str) -> Option<&'static [&'static str]> {
        None
    }

    /// Unique id within the collection.
    fn id(&self) -> &str;

    /// Text value of a named field.
    fn text(&self, field: &str) -> Option<Cow<'_, str>>;

    /// The date compared against a filter's lower bound.
    fn date(&self) -> Option<NaiveDate>;

    /// Sort key for a named field.
    fn sort_value(&self, field: &str) -> Option<SortValue>;
}
