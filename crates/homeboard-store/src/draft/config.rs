//! Draft autosave configuration.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Configuration for draft autosave behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Whether field changes schedule an autosave at all.
    ///
    /// When disabled, drafts are only written by an explicit save.
    pub enabled: bool,

    /// Quiet period in milliseconds.
    ///
    /// After a change, the manager waits this long before saving.
    /// Additional changes reset the timer. There is no maximum delay: input
    /// that never pauses is never autosaved.
    pub debounce_ms: u64,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 400,
        }
    }
}

impl DraftConfig {
    /// Create a disabled autosave config.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// The quiet period as a duration.
    pub fn quiet_period(&self) -> TimeDelta {
        i64::try_from(self.debounce_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX)
    }
}
