//! Error types for Glossa operations.
//!
//! The taxonomy mirrors how failures actually flow through the system:
//! loader failures are caught at the load-completion boundary and
//! never reach readers directly; resolution failures are raised at
//! read time, so it is the reader that observes and handles them.

use thiserror::Error;

/// Errors a namespace loader may return.
///
/// These are always intercepted when a load settles and converted into
/// a failed cache entry; they never propagate out of a resolution call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("Load failed for language {language}: {reason}")]
    Failed { language: String, reason: String },

    #[error("Translation data unavailable for language {language}")]
    Unavailable { language: String },
}

/// Read-time resolution errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The namespace has no registered loader.
    #[error("Namespace not registered: {namespace}")]
    UnknownNamespace { namespace: String },

    /// Fatal resolution failure: the fallback language itself failed,
    /// or no fallback is configured and the requested language failed.
    /// Raised on every read of the key, never reverting to pending.
    #[error("Could not load namespace {namespace} for language {language}")]
    FallbackExhausted { namespace: String, language: String },

    /// The cache's subscription channel closed while awaiting data.
    #[error("Subscription channel closed before namespace {namespace} resolved")]
    SubscriptionClosed { namespace: String },
}

/// Scope construction errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No namespaces registered")]
    NoNamespaces,

    #[error("Translation scopes must be created inside a tokio runtime")]
    NoRuntime,
}

/// Master error type for all Glossa errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GlossaError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Glossa operations.
pub type GlossaResult<T> = Result<T, GlossaError>;

// ============================================================================
// TESTS
// ============================================================================
