//! Draft autosave.
//!
//! Provides:
//! - `DraftManager` - debounced autosave and one-shot restore of a form draft
//! - `DebounceTimer` - the cancellable quiet-period timer it owns
//! - `DraftConfig` - user settings for autosave behavior

mod config;
mod manager;
mod timer;

pub use config::DraftConfig;
pub use manager::{DraftManager, DraftState};
pub use timer::DebounceTimer;
