//! Resources managed by the marketplace admin screens.
//!
//! Each resource is a plain field set plus a patch type whose members are all
//! optional. Storage keys follow the front end's conventions: one key per
//! collection, one per form draft.

mod article;
mod listing;
mod user;

use std::borrow::Cow;

pub use article::{Article, ArticlePatch, ArticleStatus};
pub use listing::{Listing, ListingPatch, ListingStatus};
pub use user::{User, UserPatch, UserRole, UserStatus};

/// Borrow `value` unless it is blank.
fn non_empty(value: &str) -> Option<Cow<'_, str>> {
    if value.trim().is_empty() {
        None
    } else {
        Some(Cow::Borrowed(value))
    }
}

/// Comma-joined list, `None` when empty.
fn joined(values: &[String]) -> Option<Cow<'_, str>> {
    if values.is_empty() {
        None
    } else {
        Some(Cow::Owned(values.join(", ")))
    }
}

/// Overwrite `slot` when the patch carries a value.
fn merge<T: Clone>(slot: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}
