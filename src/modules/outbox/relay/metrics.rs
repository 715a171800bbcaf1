// Counters owned by the relay instance, refreshed once per tick.
//
// State lives here, not in a process-wide registry; readers go through
// `snapshot()`.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RelayMetrics {
    pending: AtomicU64,
    failed: AtomicU64,
    oldest_age_seconds: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayMetricsSnapshot {
    /// New + Retry rows.
    pub pending: u64,
    pub failed: u64,
    pub oldest_age_seconds: u64,
}

impl RelayMetrics {
    pub fn record(&self, pending: u64, failed: u64, oldest_age_seconds: u64) {
        self.pending.store(pending, Ordering::Relaxed);
        self.failed.store(failed, Ordering::Relaxed);
        self.oldest_age_seconds
            .store(oldest_age_seconds, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RelayMetricsSnapshot {
        RelayMetricsSnapshot {
            pending: self.pending.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            oldest_age_seconds: self.oldest_age_seconds.load(Ordering::Relaxed),
        }
    }
}
