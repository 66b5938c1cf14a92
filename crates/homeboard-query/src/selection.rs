//! Multi-select state for bulk actions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Set of selected record ids.
///
/// Invariant (after [`Selection::reconcile`]): every selected id is in the
/// current filtered set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Flip one id. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Whether every id on the page is selected. False for an empty page.
    pub fn all_selected<'a>(&self, page_ids: impl IntoIterator<Item = &'a str>) -> bool {
        let mut any = false;
        for id in page_ids {
            any = true;
            if !self.ids.contains(id) {
                return false;
            }
        }
        any
    }

    /// Select every id on the page, or deselect them all if they already are.
    ///
    /// Ids selected on other pages are left alone. Returns whether the page
    /// is fully selected afterwards.
    pub fn toggle_all_on_page<'a>(&mut self, page_ids: impl IntoIterator<Item = &'a str>) -> bool {
        let page_ids: Vec<&str> = page_ids.into_iter().collect();
        if page_ids.is_empty() {
            return false;
        }
        if self.all_selected(page_ids.iter().copied()) {
            for id in page_ids {
                self.ids.remove(id);
            }
            false
        } else {
            self.ids.extend(page_ids.into_iter().map(str::to_string));
            true
        }
    }

    /// Drop every id not in `filtered`. Returns the pruned ids.
    pub fn reconcile(&mut self, filtered: &BTreeSet<String>) -> Vec<String> {
        let pruned: Vec<String> = self.ids.difference(filtered).cloned().collect();
        if !pruned.is_empty() {
            debug!(count = pruned.len(), "Pruned selection to filtered set");
            self.ids.retain(|id| filtered.contains(id));
        }
        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn toggle_flips() {
        let mut selection = Selection::new();
        assert!(selection.toggle("a"));
        assert!(selection.contains("a"));
        assert!(!selection.toggle("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn reconcile_prunes_ids_outside_filter() {
        let mut selection = Selection::new();
        for id in ["a", "b", "c"] {
            selection.toggle(id);
        }
        let pruned = selection.reconcile(&set(&["b", "d"]));
        assert_eq!(pruned, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(selection.ids(), &set(&["b"]));
    }

    #[test]
    fn toggle_all_keeps_other_pages() {
        let mut selection = Selection::new();
        selection.toggle("x");
        selection.toggle("a");

        assert!(selection.toggle_all_on_page(["a", "b"]));
        assert_eq!(selection.ids(), &set(&["a", "b", "x"]));

        assert!(!selection.toggle_all_on_page(["a", "b"]));
        assert_eq!(selection.ids(), &set(&["x"]));
    }

    #[test]
    fn empty_page_is_never_all_selected() {
        let mut selection = Selection::new();
        assert!(!selection.all_selected([]));
        assert!(!selection.toggle_all_on_page([]));
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_twice_from_a_partial_page_clears_the_page() {
        let page = ["a", "b", "c"];
        let mut selection = Selection::new();
        selection.toggle("b");
        selection.toggle("z");

        assert!(selection.toggle_all_on_page(page));
        assert!(!selection.toggle_all_on_page(page));

        // All-or-nothing: "b" does not come back, only "z" off the page does.
        assert_eq!(selection.ids(), &set(&["z"]));
    }
}
