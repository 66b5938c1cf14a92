//! Messages a list screen reacts to.

use homeboard_query::{FilterState, SortSpec};

/// User intent on a list screen, generic over the resource's patch type.
#[derive(Debug, Clone, PartialEq)]
pub enum ListMessage<P> {
    // =========================================================================
    // SEARCH & FILTERING
    // =========================================================================
    /// Search text changed
    SearchChanged(String),

    /// Clear search
    SearchCleared,

    /// Categorical filter changed; `"All"` unsets it
    CategoryChanged { field: String, value: String },

    /// Date lower bound changed
    SinceChanged(Option<String>),

    /// Replace every filter at once
    FilterReplaced(FilterState),

    /// Drop all filters
    FiltersReset,

    // =========================================================================
    // ORDER & PAGING
    // =========================================================================
    SortChanged(SortSpec),
    PageRequested(usize),
    NextPage,
    PreviousPage,
    PageSizeChanged(usize),

    // =========================================================================
    // SELECTION
    // =========================================================================
    /// Row checkbox clicked
    RowToggled(String),

    /// Header checkbox clicked
    PageToggled,

    SelectionCleared,

    // =========================================================================
    // MUTATIONS
    // =========================================================================
    Update { id: String, patch: P },
    Remove(String),

    /// Delete every selected record
    BulkRemove,

    /// Apply one patch to every selected record
    BulkUpdate(P),

    /// Pick up writes made elsewhere
    Refresh,
}
