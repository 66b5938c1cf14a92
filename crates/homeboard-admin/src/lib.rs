//! One admin list screen per resource.
//!
//! [`ListController`] owns the filter, sort, page and selection state of a
//! list and keeps them consistent with the stored collection. Every mutation
//! path reloads the collection, reconciles the selection against the
//! filtered ids and clamps the page, so a bulk action only ever touches rows
//! that are currently visible through the filter.
//!
//! UIs drive it either through the methods directly or by sending
//! [`ListMessage`]s to [`ListController::handle`].

mod controller;
mod message;

pub use controller::{DEFAULT_PAGE_SIZE, ListController};
pub use message::ListMessage;
