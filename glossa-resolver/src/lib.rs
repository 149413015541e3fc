//! GLOSSA Resolver - Translation Resolution Engine
//!
//! Runtime half of the Glossa translation resolution cache: loader
//! registration, the versioned-snapshot cache store, in-flight load
//! deduplication, and the synchronous resolution engine with its
//! one-level fallback policy.
//!
//! # Control Flow
//!
//! ```text
//! resolve(L, N) ──► CacheStore ──► Loaded ──► data
//!       │               └── Failed ──► fallback(L', N) or fatal error
//!       └── absent ──► InFlightTracker ──► loader task ──► merge ──► notify
//! ```
//!
//! A resolution call never blocks: when no entry exists it starts a
//! load (unless one is already outstanding) and returns pending
//! immediately. Store mutations notify subscribers with a full
//! snapshot; re-resolving on notification is how pending readers
//! discover data.

mod loader;
mod scope;
mod stats;
mod store;
mod tracker;

pub use loader::{loader_fn, LoaderRegistry, NamespaceLoader};
pub use scope::{NamespaceHandle, Resolution, TranslationScope};
pub use stats::ScopeStats;
pub use store::CacheStore;
pub use tracker::InFlightTracker;

// Re-export core types for convenience
pub use glossa_core::{
    CacheState, ConfigError, Entry, GlossaError, GlossaResult, LoadError, RequestKey,
    ResolveError, ScopeConfig,
};
