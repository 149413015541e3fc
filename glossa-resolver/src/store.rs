//! Versioned-snapshot cache store and its subscription channel.

use std::fmt;

use glossa_core::{CacheState, Entry};
use tokio::sync::watch;

/// Keyed table of settled load results, observed as versioned snapshots.
///
/// The state lives inside a `watch` channel: [`merge`](CacheStore::merge)
/// updates it in place and the channel hands every subscriber the new
/// snapshot. Merging onto an already-settled key changes nothing and
/// notifies nobody, which keeps the write-once invariant observable
/// from the outside.
///
/// Cloning a store shares the underlying channel; all clones see the
/// same state.
pub struct CacheStore<T> {
    state: watch::Sender<CacheState<T>>,
}

impl<T> CacheStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        let (state, _) = watch::channel(CacheState::new());
        Self { state }
    }

    /// Current snapshot.
    pub fn read(&self) -> CacheState<T> {
        self.state.borrow().clone()
    }

    /// Write-once structural merge of one key.
    ///
    /// Subscribers are notified only when the state actually changed.
    /// Never panics and never fails.
    pub fn merge(&self, language: &str, namespace: &str, entry: Entry<T>) -> bool {
        self.state
            .send_if_modified(|state| state.merge(language, namespace, entry))
    }

    /// Subscribe to snapshot changes.
    ///
    /// Each notification carries the full latest snapshot. Delivery
    /// order across independently completing loads is unspecified, and
    /// intermediate snapshots may be coalesced; consumers re-resolve
    /// against the latest state, so neither matters.
    pub fn subscribe(&self) -> watch::Receiver<CacheState<T>> {
        self.state.subscribe()
    }

    /// Number of settled entries.
    pub fn entry_count(&self) -> usize {
        self.state.borrow().len()
    }
}

impl<T> Default for CacheStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CacheStore<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

// Manual impl: stored data need not be `Debug`.
impl<T> fmt::Debug for CacheStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entry_count())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_updates_snapshot() {
        let store: CacheStore<u32> = CacheStore::new();
        assert!(store.merge("de", "base", Entry::loaded(1)));

        let snapshot = store.read();
        assert_eq!(snapshot.entry("de", "base").unwrap().data().map(|d| **d), Some(1));
        assert_eq!(store.entry_count(), 1);
    }

    #[test]
    fn test_merge_notifies_subscribers_once_per_change() {
        let store: CacheStore<u32> = CacheStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        assert!(store.merge("de", "base", Entry::loaded(1)));
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();

        // Write-once: the second merge is a no-op and must not notify.
        assert!(!store.merge("de", "base", Entry::loaded(2)));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_snapshot_is_detached_from_later_merges() {
        let store: CacheStore<u32> = CacheStore::new();
        store.merge("de", "base", Entry::loaded(1));
        let snapshot = store.read();

        store.merge("en", "base", Entry::loaded(2));
        assert!(snapshot.entry("en", "base").is_none());
        assert!(store.read().entry("en", "base").is_some());
    }

    #[test]
    fn test_debug_needs_no_data_debug_bound() {
        struct Opaque;
        let store: CacheStore<Opaque> = CacheStore::new();
        store.merge("de", "base", Entry::loaded(Opaque));
        assert_eq!(format!("{store:?}"), "CacheStore { entries: 1 }");
    }

    #[test]
    fn test_clones_share_state() {
        let store: CacheStore<u32> = CacheStore::new();
        let clone = store.clone();
        store.merge("de", "base", Entry::Failed);
        assert!(clone.read().entry("de", "base").unwrap().is_failed());
    }
}
