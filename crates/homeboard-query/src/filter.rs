//! Filter parameters.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Sentinel value meaning "do not filter on this field".
pub const ALL: &str = "All";

/// Search and filter parameters for one list view.
///
/// A plain value: serializable, comparable and hashable. Categorical filters
/// live in a sorted map so two states built in a different order are equal
/// and produce the same page.
///
/// Every field has an unset value (empty term, `"All"` / empty category,
/// no `since`) that disables its predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    /// Free-text search term, matched case-insensitively.
    pub term: String,
    /// Field name -> required value.
    pub categories: BTreeMap<String, String>,
    /// Lower bound on the record date, `YYYY-MM-DD` or RFC 3339.
    pub since: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.categories.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_since(mut self, date: NaiveDate) -> Self {
        self.since = Some(date.to_string());
        self
    }

    /// Whether no predicate is active.
    pub fn is_unset(&self) -> bool {
        self.search_term().is_none()
            && self.active_categories().next().is_none()
            && self.since_date().is_none()
    }

    /// The lowercased, trimmed term, `None` when blank.
    pub fn search_term(&self) -> Option<String> {
        let term = self.term.trim();
        if term.is_empty() {
            None
        } else {
            Some(term.to_lowercase())
        }
    }

    /// Categorical filters that are not set to the sentinel.
    pub fn active_categories(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories
            .iter()
            .filter(|(_, value)| !is_sentinel(value))
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }

    /// The parsed lower bound. Unparsable values disable the predicate.
    pub fn since_date(&self) -> Option<NaiveDate> {
        let raw = self.since.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }
}

fn is_sentinel(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unset() {
        assert!(FilterState::default().is_unset());
        assert!(
            FilterState::new()
                .with_term("   ")
                .with_category("status", "All")
                .with_category("category", "")
                .is_unset()
        );
    }

    #[test]
    fn sentinel_is_case_insensitive() {
        let filter = FilterState::new().with_category("status", "all");
        assert_eq!(filter.active_categories().count(), 0);
    }

    #[test]
    fn since_accepts_date_and_timestamp() {
        let mut filter = FilterState::new();
        filter.since = Some("2024-03-01".to_string());
        assert_eq!(filter.since_date(), NaiveDate::from_ymd_opt(2024, 3, 1));

        filter.since = Some("2024-03-01T22:10:00Z".to_string());
        assert_eq!(filter.since_date(), NaiveDate::from_ymd_opt(2024, 3, 1));

        filter.since = Some("last week".to_string());
        assert_eq!(filter.since_date(), None);
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = FilterState::new()
            .with_category("status", "Published")
            .with_category("category", "Real Estate");
        let b = FilterState::new()
            .with_category("category", "Real Estate")
            .with_category("status", "Published");
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
