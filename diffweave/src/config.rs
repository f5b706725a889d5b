//! Service configuration.

use serde::Deserialize;

use diffweave_core::EngineConfig;

use crate::pool::default_worker_count;

/// Pool and cache sizing plus the engine thresholds.
///
/// Deserializes from a partial TOML table on top of the defaults:
///
/// ```toml
/// workers = 8
/// cache_capacity = 200
///
/// [engine]
/// max_diff_distance = 20
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub engine: EngineConfig,
    /// Compute worker threads. Defaults to every core, minimum 4.
    pub workers: usize,
    /// Maximum cached parse results before batch eviction.
    pub cache_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            workers: default_worker_count(),
            cache_capacity: 500,
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
