//! Scope-level resolution counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters owned by a scope. Updated with relaxed ordering; the
/// numbers are diagnostics, not synchronization.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    pub hits: AtomicU64,
    pub pending_reads: AtomicU64,
    pub loads_started: AtomicU64,
    pub loads_succeeded: AtomicU64,
    pub loads_failed: AtomicU64,
}

impl StatsCounters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pending_read(&self) {
        self.pending_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_started(&self) {
        self.loads_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_succeeded(&self) {
        self.loads_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failed(&self) {
        self.loads_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ScopeStats {
        ScopeStats {
            hits: self.hits.load(Ordering::Relaxed),
            pending_reads: self.pending_reads.load(Ordering::Relaxed),
            loads_started: self.loads_started.load(Ordering::Relaxed),
            loads_succeeded: self.loads_succeeded.load(Ordering::Relaxed),
            loads_failed: self.loads_failed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time statistics about a scope's cache behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeStats {
    /// Resolution calls answered from the cache.
    pub hits: u64,
    /// Resolution calls that returned the pending indicator.
    pub pending_reads: u64,
    /// Loader invocations started.
    pub loads_started: u64,
    /// Loads that settled successfully.
    pub loads_succeeded: u64,
    /// Loads that settled with a failure.
    pub loads_failed: u64,
}

impl ScopeStats {
    /// Loads that have settled, successfully or not.
    pub fn loads_settled(&self) -> u64 {
        self.loads_succeeded + self.loads_failed
    }

    /// Calculate the cache hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.pending_reads;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let counters = StatsCounters::default();
        counters.record_hit();
        counters.record_hit();
        counters.record_pending_read();
        counters.record_load_started();
        counters.record_load_failed();

        let stats = counters.snapshot();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.pending_reads, 1);
        assert_eq!(stats.loads_started, 1);
        assert_eq!(stats.loads_settled(), 1);
    }

    #[test]
    fn test_hit_rate() {
        let stats = ScopeStats {
            hits: 3,
            pending_reads: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < 0.001);
        assert!((ScopeStats::default().hit_rate() - 0.0).abs() < 0.001);
    }
}
