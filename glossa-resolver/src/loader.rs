//! Namespace loader trait and registry.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use glossa_core::LoadError;

/// Asynchronous source of translation data for one namespace.
///
/// One loader is registered per namespace. The resolver invokes it at
/// most once per `(language, namespace)` per scope lifetime; whatever
/// it returns is terminal for that key. A failure is converted into a
/// failed cache entry at the completion boundary, so implementations
/// never crash the owning scope.
///
/// # Example
/// ```ignore
/// struct FileLoader { dir: PathBuf }
///
/// #[async_trait]
/// impl NamespaceLoader<serde_json::Value> for FileLoader {
///     async fn load(&self, language: &str) -> Result<serde_json::Value, LoadError> {
///         // Read `{dir}/{language}.json`
///     }
/// }
/// ```
#[async_trait]
pub trait NamespaceLoader<T>: Send + Sync {
    /// Load the namespace's data for one language.
    async fn load(&self, language: &str) -> Result<T, LoadError>;
}

/// Adapter turning an async closure into a [`NamespaceLoader`].
///
/// The closure receives the language as an owned `String` so the
/// returned future can outlive the call.
pub fn loader_fn<T, F, Fut>(f: F) -> Arc<dyn NamespaceLoader<T>>
where
    T: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, LoadError>> + Send + 'static,
{
    Arc::new(FnLoader { f })
}

struct FnLoader<F> {
    f: F,
}

#[async_trait]
impl<T, F, Fut> NamespaceLoader<T> for FnLoader<F>
where
    T: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, LoadError>> + Send + 'static,
{
    async fn load(&self, language: &str) -> Result<T, LoadError> {
        (self.f)(language.to_string()).await
    }
}

/// Registry mapping namespace names to their loaders.
///
/// Loaders must be explicitly registered; the key set is fixed when
/// the registry is handed to a scope. Registering a namespace twice
/// replaces the earlier loader.
pub struct LoaderRegistry<T> {
    loaders: HashMap<String, Arc<dyn NamespaceLoader<T>>>,
}

impl<T> LoaderRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// Register a loader for a namespace.
    pub fn register(
        mut self,
        namespace: impl Into<String>,
        loader: Arc<dyn NamespaceLoader<T>>,
    ) -> Self {
        self.loaders.insert(namespace.into(), loader);
        self
    }

    /// Get the loader for a namespace.
    pub fn get(&self, namespace: &str) -> Option<Arc<dyn NamespaceLoader<T>>> {
        self.loaders.get(namespace).cloned()
    }

    /// Whether a namespace is registered.
    pub fn contains(&self, namespace: &str) -> bool {
        self.loaders.contains_key(namespace)
    }

    /// Registered namespace names.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.loaders.keys().map(String::as_str)
    }

    /// Number of registered namespaces.
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// Whether no namespace is registered.
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl<T> Default for LoaderRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for LoaderRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut namespaces: Vec<&str> = self.namespaces().collect();
        namespaces.sort_unstable();
        f.debug_struct("LoaderRegistry")
            .field("namespaces", &namespaces)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn static_loader(value: u32) -> Arc<dyn NamespaceLoader<u32>> {
        loader_fn(move |_language| async move { Ok(value) })
    }

    #[tokio::test]
    async fn test_loader_fn_passes_language_through() {
        let loader = loader_fn(|language: String| async move {
            Ok::<_, LoadError>(format!("data-{language}"))
        });
        let data = loader.load("de").await.unwrap();
        assert_eq!(data, "data-de");
    }

    #[tokio::test]
    async fn test_loader_fn_propagates_errors() {
        let loader = loader_fn(|language: String| async move {
            Err::<u32, _>(LoadError::Unavailable { language })
        });
        let err = loader.load("fr").await.unwrap_err();
        assert_eq!(
            err,
            LoadError::Unavailable {
                language: "fr".to_string()
            }
        );
    }

    #[test]
    fn test_registry_lookup() {
        let registry = LoaderRegistry::new()
            .register("base", static_loader(1))
            .register("extra", static_loader(2));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("base"));
        assert!(!registry.contains("missing"));
        assert!(registry.get("extra").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_registry_register_replaces() {
        let registry = LoaderRegistry::new()
            .register("base", static_loader(1))
            .register("base", static_loader(2));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_debug_lists_namespaces() {
        let registry = LoaderRegistry::new().register("base", static_loader(1));
        let repr = format!("{:?}", registry);
        assert!(repr.contains("base"));
    }
}
