//! Derived page of results.

use std::collections::BTreeSet;

/// One page of a filtered, sorted collection.
///
/// Always recomputed, never stored. `page_number` is the page actually
/// returned, after clamping; `requested_page` is what the caller asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: Vec<&'a T>,
    /// 1-based.
    pub page_number: usize,
    pub page_size: usize,
    /// Size of the full filtered set, before slicing.
    pub total_count: usize,
    /// Zero when nothing matches.
    pub total_pages: usize,
    pub requested_page: usize,
    /// Ids of every matching record, not just this page.
    pub matching_ids: BTreeSet<String>,
}

impl<T> Page<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// Whether the requested page was out of range and got clamped.
    pub fn was_clamped(&self) -> bool {
        self.page_number != self.requested_page
    }

    /// 1-based positions of the first and last item shown, `None` when empty.
    pub fn item_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.page_number - 1) * self.page_size + 1;
        Some((first, first + self.items.len() - 1))
    }
}

impl<T: homeboard_model::Queryable> Page<'_, T> {
    /// Ids of the items on this page, in display order.
    pub fn page_ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id()).collect()
    }
}
