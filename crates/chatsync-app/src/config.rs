//! Sync loop timing and behavior.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing and consistency settings for the sync loop.
///
/// Every field has a default, so a partial `[sync]` table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Presence poll period in milliseconds.
    pub presence_interval_ms: u64,
    /// Conversation and typing poll period in milliseconds.
    pub conversation_interval_ms: u64,
    /// Quiet period after the last keystroke before a typing `stop` is sent.
    pub typing_idle_ms: u64,
    /// Drop conversation responses that are older than the newest applied
    /// load or belong to a peer that is no longer selected.
    ///
    /// `false` restores plain last-response-wins behavior.
    pub discard_stale_responses: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            presence_interval_ms: 3000,
            conversation_interval_ms: 2000,
            typing_idle_ms: 1000,
            discard_stale_responses: true,
        }
    }
}

impl SyncConfig {
    /// Presence poll period (at least 1 ms).
    pub fn presence_interval(&self) -> Duration {
        Duration::from_millis(self.presence_interval_ms.max(1))
    }

    /// Conversation poll period (at least 1 ms).
    pub fn conversation_interval(&self) -> Duration {
        Duration::from_millis(self.conversation_interval_ms.max(1))
    }

    /// Typing debounce window (at least 1 ms).
    pub fn typing_idle(&self) -> Duration {
        Duration::from_millis(self.typing_idle_ms.max(1))
    }
}
