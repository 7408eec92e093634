use crate::application::SelectionPolicy;
use serde::{Deserialize, Serialize};

/// Tuning for a peer session. Every field has a default, so a partial JSON
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Resolved messages remembered for status queries and duplicate detection
    pub history_limit: usize,

    /// Maximum transport events buffered in a `SessionLoop` before `submit` fails
    pub queue_capacity: usize,

    /// Queued events processed per `poll`
    pub batch_size: usize,

    /// Polling interval for `SessionRuntime` in milliseconds
    pub poll_interval_ms: u64,

    /// Which discovered peer gets bound
    pub selection: SelectionPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: 32,
            queue_capacity: 100,
            batch_size: 10,
            poll_interval_ms: 100,
            selection: SelectionPolicy::First,
        }
    }
}

impl SessionConfig {
    /// Largest history a loaded configuration may ask for
    pub const MAX_HISTORY_LIMIT: usize = 10_000;

    /// Largest queue a loaded configuration may ask for
    pub const MAX_QUEUE_CAPACITY: usize = 100_000;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }
}
