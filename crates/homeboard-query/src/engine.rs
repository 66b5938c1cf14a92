//! Filter, sort and paginate a collection.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use homeboard_model::{Queryable, SortValue};
use tracing::debug;

use crate::filter::FilterState;
use crate::page::Page;
use crate::sort::SortSpec;

/// A [`FilterState`] resolved against one resource type.
///
/// Unknown category fields, values outside a closed field's domain and
/// unparsable dates are dropped here, once, rather than on every record.
struct Predicate<'f> {
    term: Option<String>,
    categories: Vec<(&'f str, &'f str)>,
    since: Option<NaiveDate>,
}

impl<'f> Predicate<'f> {
    fn compile<T: Queryable>(filter: &'f FilterState) -> Self {
        let categories = filter
            .active_categories()
            .filter_map(|(field, value)| resolve_category::<T>(field, value))
            .collect();

        let since = filter.since_date();
        if since.is_none() && filter.since.as_deref().is_some_and(|s| !s.trim().is_empty()) {
            debug!(since = ?filter.since, "Ignoring unparsable date filter");
        }

        Self {
            term: filter.search_term(),
            categories,
            since,
        }
    }

    fn matches<T: Queryable>(&self, item: &T) -> bool {
        if let Some(term) = &self.term {
            let hit = T::SEARCH_FIELDS.iter().any(|field| {
                item.text(field)
                    .is_some_and(|value| value.to_lowercase().contains(term.as_str()))
            });
            if !hit {
                return false;
            }
        }

        let categories_hold = self
            .categories
            .iter()
            .all(|(field, wanted)| item.text(field).is_some_and(|value| value == *wanted));
        if !categories_hold {
            return false;
        }

        match self.since {
            Some(since) => item.date().is_some_and(|date| date >= since),
            None => true,
        }
    }
}

/// The value to compare `field` against, or `None` when the filter is ignored.
///
/// Closed fields resolve to their canonical label regardless of case.
fn resolve_category<'f, T: Queryable>(field: &'f str, value: &'f str) -> Option<(&'f str, &'f str)> {
    if !T::CATEGORY_FIELDS.contains(&field) {
        debug!(field, "Ignoring filter on unknown category field");
        return None;
    }
    let Some(labels) = T::category_values(field) else {
        return Some((field, value));
    };
    let wanted = value.trim();
    match labels.iter().find(|label| label.eq_ignore_ascii_case(wanted)) {
        Some(label) => Some((field, *label)),
        None => {
            debug!(field, value, allowed = ?labels, "Ignoring filter value outside the field's domain");
            None
        }
    }
}

/// Ids of every record that passes `filter`.
pub fn filtered_ids<T: Queryable>(collection: &[T], filter: &FilterState) -> BTreeSet<String> {
    let predicate = Predicate::compile::<T>(filter);
    collection
        .iter()
        .filter(|item| predicate.matches(*item))
        .map(|item| item.id().to_string())
        .collect()
}

/// Compute one page of `collection`.
///
/// Filters, then stable-sorts by `sort`, then slices. `page_number` is
/// 1-based and clamped into `1..=total_pages`; a `page_size` of zero is
/// treated as one.
pub fn query_page<'a, T: Queryable>(
    collection: &'a [T],
    filter: &FilterState,
    page_number: usize,
    page_size: usize,
    sort: &SortSpec,
) -> Page<'a, T> {
    let predicate = Predicate::compile::<T>(filter);
    let page_size = page_size.max(1);

    let mut matching: Vec<&'a T> = collection
        .iter()
        .filter(|item| predicate.matches(*item))
        .collect();

    if let Some(field) = sort.field.as_deref() {
        let mut keyed: Vec<(Option<SortValue>, &'a T)> = matching
            .into_iter()
            .map(|item| (item.sort_value(field), item))
            .collect();
        // `sort_by` is stable, so ties keep collection order.
        keyed.sort_by(|(a, _), (b, _)| sort.compare(a.as_ref(), b.as_ref()));
        matching = keyed.into_iter().map(|(_, item)| item).collect();
    }

    let total_count = matching.len();
    let total_pages = total_count.div_ceil(page_size);
    let current = page_number.clamp(1, total_pages.max(1));
    let start = (current - 1) * page_size;
    let end = (start + page_size).min(total_count);

    let matching_ids = matching.iter().map(|item| item.id().to_string()).collect();
    let items = matching.get(start..end).map(<[_]>::to_vec).unwrap_or_default();

    Page {
        items,
        page_number: current,
        page_size,
        total_count,
        total_pages,
        requested_page: page_number,
        matching_ids,
    }
}
