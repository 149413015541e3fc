//! GLOSSA Test Utilities
//!
//! Centralized test infrastructure for the Glossa workspace:
//! - Scripted mock loaders with per-language outcomes
//! - Gating for deterministic settlement ordering
//! - Call recording for loader-invocation assertions
//! - Fixture helpers for translation payloads

// Re-export core and resolver types for convenience
pub use glossa_core::{
    CacheState, ConfigError, Entry, GlossaError, GlossaResult, LoadError, RequestKey,
    ResolveError, ScopeConfig,
};
pub use glossa_resolver::{
    loader_fn, LoaderRegistry, NamespaceHandle, NamespaceLoader, Resolution, ScopeStats,
    TranslationScope,
};

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::watch;

/// Standard fixture payload: `{ "bar": "bar-<language>" }`.
pub fn translation_fixture(language: &str) -> Value {
    json!({ "bar": format!("bar-{language}") })
}

// ============================================================================
// LOADER GATE
// ============================================================================

/// Gate holding back scripted loads until a test opens it.
///
/// Every load observing the gate waits until [`open`](LoaderGate::open)
/// is called, which releases all current and future waiters at once.
pub struct LoaderGate {
    open: watch::Sender<bool>,
}

impl LoaderGate {
    /// Create a closed gate.
    pub fn new() -> Self {
        let (open, _) = watch::channel(false);
        Self { open }
    }

    /// Release every waiting and future load.
    pub fn open(&self) {
        let _ = self.open.send(true);
    }

    fn receiver(&self) -> watch::Receiver<bool> {
        self.open.subscribe()
    }
}

impl Default for LoaderGate {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SCRIPTED LOADER
// ============================================================================

/// Mock loader with scripted per-language outcomes.
///
/// Records every invocation in order. Languages without a scripted
/// outcome fail with `LoadError::Unavailable`. When gated, each load
/// records its call immediately but holds its result back until the
/// gate opens.
///
/// # Example
/// ```ignore
/// let gate = LoaderGate::new();
/// let loader = Arc::new(
///     ScriptedLoader::new()
///         .ok("en", translation_fixture("en"))
///         .err("de", "catalog missing")
///         .gated(&gate),
/// );
/// ```
pub struct ScriptedLoader {
    outcomes: HashMap<String, Result<Value, LoadError>>,
    calls: Mutex<Vec<String>>,
    gate: Option<watch::Receiver<bool>>,
}

impl ScriptedLoader {
    /// Create a loader with no scripted outcomes.
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Script a successful outcome for a language.
    pub fn ok(mut self, language: impl Into<String>, data: Value) -> Self {
        self.outcomes.insert(language.into(), Ok(data));
        self
    }

    /// Script a failed outcome for a language.
    pub fn err(mut self, language: impl Into<String>, reason: impl Into<String>) -> Self {
        let language = language.into();
        self.outcomes.insert(
            language.clone(),
            Err(LoadError::Failed {
                language,
                reason: reason.into(),
            }),
        );
        self
    }

    /// Hold results back until the gate opens.
    pub fn gated(mut self, gate: &LoaderGate) -> Self {
        self.gate = Some(gate.receiver());
        self
    }

    /// Languages this loader was invoked with, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Total number of invocations.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for ScriptedLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NamespaceLoader<Value> for ScriptedLoader {
    async fn load(&self, language: &str) -> Result<Value, LoadError> {
        self.calls.lock().unwrap().push(language.to_string());

        if let Some(gate) = &self.gate {
            let mut gate = gate.clone();
            // Released either by LoaderGate::open or by the gate being
            // dropped, which also counts as "no longer held back".
            let _ = gate.wait_for(|open| *open).await;
        }

        match self.outcomes.get(language) {
            Some(outcome) => outcome.clone(),
            None => Err(LoadError::Unavailable {
                language: language.to_string(),
            }),
        }
    }
}

// ============================================================================
// NEVER LOADER
// ============================================================================

/// Loader that never settles, leaving its keys pending forever.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverLoader;

#[async_trait]
impl NamespaceLoader<Value> for NeverLoader {
    async fn load(&self, _language: &str) -> Result<Value, LoadError> {
        std::future::pending().await
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_scripted_loader_outcomes() {
        let loader = ScriptedLoader::new()
            .ok("de", translation_fixture("de"))
            .err("en", "catalog missing");

        assert_eq!(loader.load("de").await.unwrap()["bar"], "bar-de");
        assert_eq!(
            loader.load("en").await.unwrap_err(),
            LoadError::Failed {
                language: "en".to_string(),
                reason: "catalog missing".to_string(),
            }
        );
        assert_eq!(
            loader.load("fr").await.unwrap_err(),
            LoadError::Unavailable {
                language: "fr".to_string(),
            }
        );
        assert_eq!(loader.calls(), vec!["de", "en", "fr"]);
    }

    #[tokio::test]
    async fn test_gated_loader_holds_result_until_open() {
        let gate = LoaderGate::new();
        let loader = Arc::new(
            ScriptedLoader::new()
                .ok("de", translation_fixture("de"))
                .gated(&gate),
        );

        let task = tokio::spawn({
            let loader = Arc::clone(&loader);
            async move { loader.load("de").await }
        });

        // The call is recorded immediately, the result held back.
        tokio::time::timeout(Duration::from_secs(1), async {
            while loader.call_count() == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert!(!task.is_finished());

        gate.open();
        let data = task.await.unwrap().unwrap();
        assert_eq!(data["bar"], "bar-de");
    }
}
