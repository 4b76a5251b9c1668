//! Export progress counter
//!
//! One shared counter across all provider tasks. Each exported transaction
//! bumps it atomically; whichever task's increment lands on a multiple of
//! the reporting interval logs that milestone, so every boundary is logged
//! exactly once no matter how providers interleave.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Default number of transactions between progress log lines
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1000;

/// Shared running total of exported transactions
#[derive(Debug)]
pub struct ProgressCounter {
    count: AtomicU64,
    interval: u64,
}

impl ProgressCounter {
    /// Create a counter with the default reporting interval
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_PROGRESS_INTERVAL)
    }

    /// Create a counter logging every `interval` transactions (0 disables)
    pub fn with_interval(interval: u64) -> Self {
        Self {
            count: AtomicU64::new(0),
            interval,
        }
    }

    /// Count one exported transaction and return the post-increment total.
    ///
    /// The milestone check uses the returned value, so concurrent callers
    /// each see a distinct total and a boundary is never logged twice.
    pub fn record(&self) -> u64 {
        let total = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        if self.interval > 0 && total % self.interval == 0 {
            info!(total, "transactions exported so far");
        }
        total
    }

    /// Current total
    pub fn total(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Default for ProgressCounter {
    fn default() -> Self {
        Self::new()
    }
}
