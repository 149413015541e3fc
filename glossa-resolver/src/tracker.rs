//! In-flight load tracking.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use glossa_core::RequestKey;

/// Set of `(language, namespace)` keys currently awaiting a loader.
///
/// One tracker exists per scope, created and dropped with it. Keys are
/// never removed once added: after a key's first resolution the cache
/// intercepts every lookup for it before the tracker is consulted
/// again, so stale members are inert and the set is bounded by the
/// keys the scope ever requested.
#[derive(Debug, Default)]
pub struct InFlightTracker {
    keys: Mutex<HashSet<RequestKey>>,
}

impl InFlightTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim a key.
    ///
    /// Returns `true` when the key was not yet tracked and the caller
    /// now owns the single load for it; `false` when a load is already
    /// outstanding (or has already settled) and no new load may start.
    pub fn try_begin(&self, key: RequestKey) -> bool {
        self.lock().insert(key)
    }

    /// Whether a key has ever been claimed.
    pub fn is_tracked(&self, key: &RequestKey) -> bool {
        self.lock().contains(key)
    }

    /// Number of claimed keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no key was ever claimed.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<RequestKey>> {
        // No user code runs while this lock is held, so a poisoned
        // mutex still holds a consistent set; recover it.
        match self.keys.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
