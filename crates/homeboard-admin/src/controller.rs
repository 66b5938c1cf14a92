//! List screen controller.

use std::collections::BTreeSet;

use homeboard_model::{Collection, FieldAccess, Fields, Record};
use homeboard_query::{FilterState, Page, Selection, SortSpec, filtered_ids, query_page};
use homeboard_store::DurableStore;
use tracing::{debug, info};

use crate::message::ListMessage;

/// Rows per page when the caller does not say otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// State of one admin list screen.
///
/// Holds a cached copy of the collection; every mutation goes through the
/// store and replaces the cache with what the store returns.
#[derive(Debug)]
pub struct ListController<F: Fields> {
    store: DurableStore<F>,
    records: Collection<F>,
    filter: FilterState,
    sort: SortSpec,
    /// 1-based, always within range of the current filtered set.
    page_number: usize,
    page_size: usize,
    selection: Selection,
}

impl<F: Fields + FieldAccess> ListController<F> {
    pub fn new(store: DurableStore<F>) -> Self {
        Self::with_page_size(store, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(store: DurableStore<F>, page_size: usize) -> Self {
        let records = store.get_all();
        Self {
            store,
            records,
            filter: FilterState::default(),
            sort: SortSpec::none(),
            page_number: 1,
            page_size: page_size.max(1),
            selection: Selection::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn store(&self) -> &DurableStore<F> {
        &self.store
    }

    pub fn records(&self) -> &Collection<F> {
        &self.records
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The page currently on screen.
    pub fn view(&self) -> Page<'_, Record<F>> {
        query_page(
            &self.records,
            &self.filter,
            self.page_number,
            self.page_size,
            &self.sort,
        )
    }

    /// Ids of every record that passes the current filter.
    pub fn filtered_ids(&self) -> BTreeSet<String> {
        filtered_ids(&self.records, &self.filter)
    }

    /// Whether the header checkbox should render as checked.
    pub fn page_fully_selected(&self) -> bool {
        self.selection.all_selected(self.view().page_ids())
    }

    // =========================================================================
    // Message dispatch
    // =========================================================================

    pub fn handle(&mut self, message: ListMessage<F::Patch>) {
        match message {
            ListMessage::SearchChanged(term) => self.set_term(term),
            ListMessage::SearchCleared => self.set_term(String::new()),
            ListMessage::CategoryChanged { field, value } => self.set_category(field, value),
            ListMessage::SinceChanged(since) => self.set_since(since),
            ListMessage::FilterReplaced(filter) => self.set_filter(filter),
            ListMessage::FiltersReset => self.set_filter(FilterState::default()),
            ListMessage::SortChanged(sort) => self.set_sort(sort),
            ListMessage::PageRequested(page) => self.go_to_page(page),
            ListMessage::NextPage => self.next_page(),
            ListMessage::PreviousPage => self.prev_page(),
            ListMessage::PageSizeChanged(size) => self.set_page_size(size),
            ListMessage::RowToggled(id) => {
                self.toggle(&id);
            }
            ListMessage::PageToggled => {
                self.toggle_all_on_page();
            }
            ListMessage::SelectionCleared => self.selection.clear(),
            ListMessage::Update { id, patch } => self.update(&id, &patch),
            ListMessage::Remove(id) => self.remove(&id),
            ListMessage::BulkRemove => {
                self.bulk_remove();
            }
            ListMessage::BulkUpdate(patch) => {
                self.bulk_update(&patch);
            }
            ListMessage::Refresh => self.refresh(),
        }
    }

    // =========================================================================
    // Filtering, sorting, paging
    // =========================================================================

    /// Replace the filter. Returns to the first page.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.page_number = 1;
        self.reconcile();
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        let mut filter = self.filter.clone();
        filter.term = term.into();
        self.set_filter(filter);
    }

    pub fn set_category(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let filter = self.filter.clone().with_category(field, value);
        self.set_filter(filter);
    }

    pub fn set_since(&mut self, since: Option<String>) {
        let mut filter = self.filter.clone();
        filter.since = since;
        self.set_filter(filter);
    }

    /// Change the order. Returns to the first page.
    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.page_number = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page_number = 1;
    }

    /// Jump to a page, clamped into range.
    pub fn go_to_page(&mut self, page: usize) {
        self.page_number = page;
        self.clamp_page(self.filtered_ids().len());
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page_number.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.page_number.saturating_sub(1));
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggle one row. Ids hidden by the filter cannot be selected.
    ///
    /// Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.selection.contains(id) && !self.filtered_ids().contains(id) {
            debug!(resource = F::RESOURCE, id, "ignoring toggle of a row outside the filter");
            return false;
        }
        self.selection.toggle(id)
    }

    /// Header checkbox: select the whole page, or clear it if already selected.
    pub fn toggle_all_on_page(&mut self) -> bool {
        let page = query_page(
            &self.records,
            &self.filter,
            self.page_number,
            self.page_size,
            &self.sort,
        );
        self.selection.toggle_all_on_page(page.page_ids())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Reload from the store, e.g. after another writer touched the key.
    pub fn refresh(&mut self) {
        self.records = self.store.get_all();
        self.reconcile();
    }

    /// Add a record. Returns whether it is now in the collection.
    pub fn add(&mut self, id: impl Into<String>, fields: F) -> bool {
        let id = id.into();
        let existed = self.records.contains(&id);
        self.records = self.store.add(id.clone(), fields);
        self.reconcile();
        !existed && self.records.contains(&id)
    }

    /// Add a record under a generated id.
    pub fn add_new(&mut self, fields: F) -> String {
        let (id, records) = self.store.add_new(fields);
        self.records = records;
        self.reconcile();
        id
    }

    pub fn update(&mut self, id: &str, patch: &F::Patch) {
        self.records = self.store.update(id, patch);
        self.reconcile();
    }

    pub fn remove(&mut self, id: &str) {
        self.records = self.store.remove(id);
        self.reconcile();
    }

    /// Delete every selected record in one write. Returns how many went.
    pub fn bulk_remove(&mut self) -> usize {
        let ids = self.visible_selection();
        if ids.is_empty() {
            return 0;
        }
        let before = self.records.len();
        self.records = self.store.remove_many(&ids);
        self.reconcile();
        let removed = before.saturating_sub(self.records.len());
        info!(resource = F::RESOURCE, removed, "bulk remove");
        removed
    }

    /// Patch every selected record in one write. Returns how many matched.
    pub fn bulk_update(&mut self, patch: &F::Patch) -> usize {
        let ids = self.visible_selection();
        if ids.is_empty() {
            return 0;
        }
        self.records = self.store.update_many(&ids, patch);
        self.reconcile();
        let updated = ids.iter().filter(|id| self.records.contains(id)).count();
        info!(resource = F::RESOURCE, updated, "bulk update");
        updated
    }

    /// Selected ids that are still visible. The selection itself is kept;
    /// the reconcile after the action prunes whatever left the filter.
    fn visible_selection(&mut self) -> Vec<String> {
        self.reconcile();
        self.selection.iter().map(str::to_string).collect()
    }

    /// Restore the invariants after any change to records or filter.
    fn reconcile(&mut self) {
        let visible = self.filtered_ids();
        let pruned = self.selection.reconcile(&visible);
        if !pruned.is_empty() {
            debug!(resource = F::RESOURCE, pruned = ?pruned, "selection pruned");
        }
        self.clamp_page(visible.len());
    }

    fn clamp_page(&mut self, matching: usize) {
        let last = matching.div_ceil(self.page_size).max(1);
        self.page_number = self.page_number.clamp(1, last);
    }
}
