//! GLOSSA Core - Translation Cache Data Model
//!
//! Pure data model and error taxonomy for the Glossa translation
//! resolution cache. This crate defines what a cache looks like and
//! what can go wrong; the async machinery that fills it lives in
//! `glossa-resolver`.
//!
//! # Key Types
//!
//! - `Entry<T>`: terminal result of one load attempt (loaded or failed)
//! - `CacheState<T>`: two-level `language → namespace → Entry` map with
//!   write-once, structure-preserving merges
//! - `RequestKey`: a `(language, namespace)` pair, the unit of loading
//!   and deduplication
//! - `ScopeConfig`: the fallback-language policy for one scope
//! - `GlossaError` / `GlossaResult`: master error type and result alias

mod config;
mod entry;
mod error;

pub use config::ScopeConfig;
pub use entry::{CacheState, Entry, RequestKey};
pub use error::{ConfigError, GlossaError, GlossaResult, LoadError, ResolveError};
