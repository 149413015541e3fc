//! Scope configuration.

use serde::{Deserialize, Serialize};

/// Configuration for one translation scope, immutable for its lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// The single substitute language consulted when the requested
    /// language's load has failed. With `None`, any failed load is
    /// immediately fatal for its key.
    pub fallback_language: Option<String>,
}

impl ScopeConfig {
    /// Create a config with no fallback language.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback language.
    pub fn with_fallback_language(mut self, language: impl Into<String>) -> Self {
        self.fallback_language = Some(language.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScopeConfig::new().with_fallback_language("en");
        assert_eq!(config.fallback_language.as_deref(), Some("en"));

        let bare = ScopeConfig::new();
        assert_eq!(bare.fallback_language, None);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ScopeConfig::new().with_fallback_language("en");
        let json = serde_json::to_string(&config).unwrap();
        let back: ScopeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        // Missing field deserializes to the default.
        let empty: ScopeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ScopeConfig::new());
    }
}
