// Builder Components
// Fluent builders with validation for configuration objects.

use anyhow::{ensure, Result};
use std::time::Duration;

/// Runtime configuration for the suggestion pipeline.
/// All values are externally supplied, never derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeaheadConfig {
    /// K: maximum suggestions cached per prefix node
    pub max_suggestions: usize,
    /// Maximum indexed query length; the trie path is capped here
    pub max_query_length: usize,
    /// Interval between background reload cycles
    pub reload_interval: Duration,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 10,
            max_query_length: 64,
            reload_interval: Duration::from_secs(30),
        }
    }
}

/// Typeahead configuration builder
pub struct TypeaheadConfigBuilder {
    max_suggestions: usize,
    max_query_length: usize,
    reload_interval: Duration,
}

impl TypeaheadConfigBuilder {
    pub fn new() -> Self {
        let defaults = TypeaheadConfig::default();
        Self {
            max_suggestions: defaults.max_suggestions,
            max_query_length: defaults.max_query_length,
            reload_interval: defaults.reload_interval,
        }
    }

    /// Set K, the per-prefix suggestion cap
    pub fn max_suggestions(mut self, k: usize) -> Self {
        self.max_suggestions = k;
        self
    }

    /// Set the maximum indexed query length
    pub fn max_query_length(mut self, len: usize) -> Self {
        self.max_query_length = len;
        self
    }

    /// Set the background reload interval
    pub fn reload_interval(mut self, interval: Duration) -> Self {
        self.reload_interval = interval;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<TypeaheadConfig> {
        ensure!(self.max_suggestions >= 1, "max_suggestions must be >= 1");
        ensure!(self.max_query_length >= 1, "max_query_length must be >= 1");
        ensure!(
            !self.reload_interval.is_zero(),
            "reload_interval must be non-zero"
        );

        Ok(TypeaheadConfig {
            max_suggestions: self.max_suggestions,
            max_query_length: self.max_query_length,
            reload_interval: self.reload_interval,
        })
    }
}

impl Default for TypeaheadConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
