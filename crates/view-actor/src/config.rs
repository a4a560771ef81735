use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a view. Duplicates inherit the configuration of their
/// source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// How long a snapshot or duplication waits for the source view to
    /// answer. `None` waits until the source answers or terminates.
    pub duplicate_timeout: Option<Duration>,

    /// Queue length above which taking a snapshot logs a warning.
    pub snapshot_warn_threshold: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            duplicate_timeout: None,
            snapshot_warn_threshold: 10_000,
        }
    }
}

impl ViewConfig {
    /// Bounds the wait for a source view's state.
    #[must_use]
    pub const fn with_duplicate_timeout(mut self, timeout: Duration) -> Self {
        self.duplicate_timeout = Some(timeout);
        self
    }

    /// Sets the queue length above which snapshots log a warning.
    #[must_use]
    pub const fn with_snapshot_warn_threshold(mut self, threshold: usize) -> Self {
        self.snapshot_warn_threshold = threshold;
        self
    }
}
