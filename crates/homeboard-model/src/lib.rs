//! Data model for the Homeboard persisted-collection engine.
//!
//! A [`Record`] is a caller-defined field set (`F`) wrapped with the three
//! fields every stored entity carries: a unique `id` and the store-assigned
//! `createdAt` / `updatedAt` timestamps. Records of one resource type form a
//! [`Collection`], kept newest-first.
//!
//! The crate also defines the traits the rest of the workspace is generic
//! over:
//!
//! - [`Fields`] - storage keys and typed patches for a resource
//! - [`FieldAccess`] / [`Queryable`] - named field lookup used by search,
//!   filtering and sorting
//! - [`Clock`] - injectable time source for timestamps and debounce timers
//!
//! and the three resources the marketplace admin manages: [`Article`],
//! [`Listing`] and [`User`].

pub mod access;
pub mod clock;
pub mod error;
pub mod json;
pub mod record;
pub mod resources;

pub use access::{FieldAccess, Fields, Queryable, SortValue};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ModelError, Result};
pub use json::{coerce_field_value, fields_from_pairs, merge_field};
pub use record::{Collection, Record};
pub use resources::{
    Article, ArticlePatch, ArticleStatus, Listing, ListingPatch, ListingStatus, User, UserPatch,
    UserRole, UserStatus,
};
