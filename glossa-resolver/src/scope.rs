//! Translation scope: one cache, one tracker, one fallback policy.
//!
//! A `TranslationScope` is the provider-equivalent unit: it owns a
//! cache store and an in-flight tracker for its whole lifetime and
//! exposes the synchronous resolution engine that view code calls on
//! every observation. Scopes never share cache or dedup state; two
//! scopes requesting the same key each run their own load.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use glossa_core::{
    CacheState, ConfigError, Entry, GlossaResult, RequestKey, ResolveError, ScopeConfig,
};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::loader::LoaderRegistry;
use crate::stats::{ScopeStats, StatsCounters};
use crate::store::CacheStore;
use crate::tracker::InFlightTracker;

/// Outcome of one synchronous resolution pass.
#[derive(Debug)]
pub enum Resolution<T> {
    /// Cached data for the requested language or its fallback.
    Ready(Arc<T>),
    /// No data yet. A load is either already outstanding or was just
    /// started; re-resolve after the next store notification.
    Pending,
}

impl<T> Resolution<T> {
    /// Check if data is available.
    pub fn is_ready(&self) -> bool {
        matches!(self, Resolution::Ready(_))
    }

    /// Check if resolution is still pending.
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending)
    }

    /// The resolved data, `None` when pending.
    pub fn ready(self) -> Option<Arc<T>> {
        match self {
            Resolution::Ready(data) => Some(data),
            Resolution::Pending => None,
        }
    }
}

impl<T> Clone for Resolution<T> {
    fn clone(&self) -> Self {
        match self {
            Resolution::Ready(data) => Resolution::Ready(Arc::clone(data)),
            Resolution::Pending => Resolution::Pending,
        }
    }
}

struct ScopeInner<T> {
    registry: LoaderRegistry<T>,
    fallback_language: Option<String>,
    store: CacheStore<T>,
    tracker: InFlightTracker,
    stats: StatsCounters,
    runtime: Handle,
}

/// One translation scope: loader registry, fallback policy, cache
/// store, and in-flight tracker with a shared lifetime.
///
/// Cloning a scope is cheap and shares all state; drop every clone and
/// the cache and tracker go with them. Loads already running keep the
/// state alive until they settle, then it is released.
pub struct TranslationScope<T> {
    inner: Arc<ScopeInner<T>>,
}

impl<T> Clone for TranslationScope<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

// Manual impl: translation data need not be `Debug`.
impl<T> fmt::Debug for TranslationScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationScope")
            .field("registry", &self.inner.registry)
            .field("fallback_language", &self.inner.fallback_language)
            .field("store", &self.inner.store)
            .finish()
    }
}

impl<T: Send + Sync + 'static> TranslationScope<T> {
    /// Create a scope over a loader registry.
    ///
    /// Loads are spawned onto the tokio runtime captured here, so the
    /// scope must be created inside one.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NoNamespaces` when the registry is empty
    /// - `ConfigError::NoRuntime` outside a tokio runtime
    pub fn new(registry: LoaderRegistry<T>, config: ScopeConfig) -> GlossaResult<Self> {
        if registry.is_empty() {
            return Err(ConfigError::NoNamespaces.into());
        }
        let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;
        Ok(Self {
            inner: Arc::new(ScopeInner {
                registry,
                fallback_language: config.fallback_language,
                store: CacheStore::new(),
                tracker: InFlightTracker::new(),
                stats: StatsCounters::default(),
                runtime,
            }),
        })
    }

    /// Resolve `(language, namespace)` against the current snapshot.
    ///
    /// Never blocks, and is idempotent in side effects: repeated calls
    /// while a key is pending start no second load. The call sequence
    /// for one key is:
    ///
    /// 1. `Loaded` entry: return `Ready(data)`.
    /// 2. `Failed` entry: retry with the configured fallback language,
    ///    unless none is configured or the failed language *is* the
    ///    fallback, in which case the failure is fatal and returned as
    ///    `ResolveError::FallbackExhausted` on this and every later
    ///    read.
    /// 3. No entry: start a load unless one is outstanding, then
    ///    return `Pending` immediately.
    ///
    /// # Errors
    ///
    /// - `ResolveError::UnknownNamespace` for unregistered namespaces
    /// - `ResolveError::FallbackExhausted` for fatal resolution
    ///   failures (raised at read time, so every reader observes it)
    pub fn resolve(&self, language: &str, namespace: &str) -> GlossaResult<Resolution<T>> {
        if !self.inner.registry.contains(namespace) {
            return Err(ResolveError::UnknownNamespace {
                namespace: namespace.to_string(),
            }
            .into());
        }
        let snapshot = self.inner.store.read();
        self.resolve_in(&snapshot, language, namespace)
    }

    /// One resolution step over a single consistent snapshot.
    ///
    /// Recursion depth is structurally bounded to two: the fallback
    /// language is compared against itself before a second recursion
    /// could happen.
    fn resolve_in(
        &self,
        snapshot: &CacheState<T>,
        language: &str,
        namespace: &str,
    ) -> GlossaResult<Resolution<T>> {
        match snapshot.entry(language, namespace) {
            Some(Entry::Loaded(data)) => {
                self.inner.stats.record_hit();
                Ok(Resolution::Ready(Arc::clone(data)))
            }
            Some(Entry::Failed) => match self.inner.fallback_language.as_deref() {
                Some(fallback) if fallback != language => {
                    tracing::debug!(
                        namespace,
                        failed = language,
                        fallback,
                        "retrying failed language against fallback"
                    );
                    self.resolve_in(snapshot, fallback, namespace)
                }
                _ => Err(ResolveError::FallbackExhausted {
                    namespace: namespace.to_string(),
                    language: language.to_string(),
                }
                .into()),
            },
            None => {
                self.begin_load(language, namespace);
                self.inner.stats.record_pending_read();
                Ok(Resolution::Pending)
            }
        }
    }

    /// Start a load for a key unless one is already outstanding.
    ///
    /// The spawned task is fire-and-forget: it settles with exactly
    /// one merge, converting any loader failure into a failed entry so
    /// nothing can crash the scope.
    fn begin_load(&self, language: &str, namespace: &str) {
        if !self
            .inner
            .tracker
            .try_begin(RequestKey::new(language, namespace))
        {
            return;
        }
        // Registry membership was checked before resolution started.
        let Some(loader) = self.inner.registry.get(namespace) else {
            return;
        };

        self.inner.stats.record_load_started();
        tracing::debug!(namespace, language, "starting namespace load");

        let inner = Arc::clone(&self.inner);
        let language = language.to_string();
        let namespace = namespace.to_string();
        self.inner.runtime.spawn(async move {
            let entry = match loader.load(&language).await {
                Ok(data) => {
                    inner.stats.record_load_succeeded();
                    tracing::info!(
                        namespace = %namespace,
                        language = %language,
                        "namespace load succeeded"
                    );
                    Entry::loaded(data)
                }
                Err(error) => {
                    inner.stats.record_load_failed();
                    tracing::warn!(
                        namespace = %namespace,
                        language = %language,
                        error = %error,
                        "namespace load failed"
                    );
                    Entry::Failed
                }
            };
            inner.store.merge(&language, &namespace, entry);
        });
    }

    /// Resolve, re-resolving on every cache change until data arrives
    /// or the resolution fails fatally.
    ///
    /// This is the subscription-driven retry loop a reactive host
    /// performs through its own re-render cycle. A loader that never
    /// settles keeps this future pending forever; there is no timeout.
    pub async fn resolve_ready(&self, language: &str, namespace: &str) -> GlossaResult<Arc<T>> {
        let mut changes = self.subscribe();
        loop {
            match self.resolve(language, namespace)? {
                Resolution::Ready(data) => return Ok(data),
                Resolution::Pending => {
                    if changes.changed().await.is_err() {
                        return Err(ResolveError::SubscriptionClosed {
                            namespace: namespace.to_string(),
                        }
                        .into());
                    }
                }
            }
        }
    }

    /// Subscribe to cache changes: the sole re-evaluation trigger.
    pub fn subscribe(&self) -> watch::Receiver<CacheState<T>> {
        self.inner.store.subscribe()
    }

    /// A reader handle bound to one registered namespace.
    ///
    /// The namespace is validated here, once, so the handle's reads
    /// can only ever observe data, pending, or a fatal failure.
    pub fn handle(&self, namespace: &str) -> GlossaResult<NamespaceHandle<T>> {
        if !self.inner.registry.contains(namespace) {
            return Err(ResolveError::UnknownNamespace {
                namespace: namespace.to_string(),
            }
            .into());
        }
        Ok(NamespaceHandle {
            namespace: namespace.to_string(),
            scope: self.clone(),
        })
    }

    /// Reader handles for every registered namespace, keyed by name.
    pub fn handles(&self) -> HashMap<String, NamespaceHandle<T>> {
        self.inner
            .registry
            .namespaces()
            .map(|namespace| {
                (
                    namespace.to_string(),
                    NamespaceHandle {
                        namespace: namespace.to_string(),
                        scope: self.clone(),
                    },
                )
            })
            .collect()
    }

    /// Current snapshot of the cache.
    pub fn cache_state(&self) -> CacheState<T> {
        self.inner.store.read()
    }

    /// The configured fallback language, if any.
    pub fn fallback_language(&self) -> Option<&str> {
        self.inner.fallback_language.as_deref()
    }

    /// Registered namespace names.
    pub fn namespaces(&self) -> Vec<String> {
        self.inner
            .registry
            .namespaces()
            .map(str::to_string)
            .collect()
    }

    /// Point-in-time resolution counters.
    pub fn stats(&self) -> ScopeStats {
        self.inner.stats.snapshot()
    }
}

/// Per-namespace reader bound to one scope.
///
/// The runtime rendition of the original per-namespace accessor
/// bundle: handles are derived from the registry's key set at
/// construction instead of being built reflectively per observation.
/// Reading is safe to repeat any number of times per observation
/// without duplicating side effects.
pub struct NamespaceHandle<T> {
    namespace: String,
    scope: TranslationScope<T>,
}

impl<T> Clone for NamespaceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            scope: self.scope.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> NamespaceHandle<T> {
    /// The namespace this handle reads.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Resolve this namespace for the observation's current language.
    pub fn read(&self, language: &str) -> GlossaResult<Resolution<T>> {
        self.scope.resolve(language, &self.namespace)
    }

    /// Await this namespace's data for a language.
    pub async fn read_ready(&self, language: &str) -> GlossaResult<Arc<T>> {
        self.scope.resolve_ready(language, &self.namespace).await
    }
}

// ============================================================================
// TESTS
// ============================================================================
