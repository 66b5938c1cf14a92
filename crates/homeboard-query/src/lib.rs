//! Derived views over record collections.
//!
//! Everything here is a pure function of its inputs: a collection, a
//! [`FilterState`], a page request and a [`SortSpec`] always produce the same
//! [`Page`]. The caller owns all state and threads it through.
//!
//! # Pipeline
//!
//! ```text
//! collection ──filter──> matching ──sort (stable)──> ordered ──slice──> Page
//!                           │
//!                           └──> matching ids ──> Selection::reconcile
//! ```
//!
//! [`Selection`] must be reconciled against the matching ids after every
//! collection or filter change, so a bulk action never reaches rows the user
//! can no longer see.

mod engine;
mod filter;
mod page;
mod selection;
mod sort;

pub use engine::{filtered_ids, query_page};
pub use filter::{ALL, FilterState};
pub use page::Page;
pub use selection::Selection;
pub use sort::{SortDirection, SortSpec};
