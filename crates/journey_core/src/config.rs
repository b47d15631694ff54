//! Configuration for a journey store.

use crate::error::{JourneyError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Milliseconds in one day.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Default retention horizon: 90 days, in milliseconds.
pub const DEFAULT_RETENTION_MS: i64 = 90 * DAY_MS;

/// Default read-cache TTL in milliseconds.
pub const DEFAULT_CACHE_TTL_MS: u64 = 5_000;

/// Default number of visits returned per domain.
pub const DEFAULT_DOMAIN_VISIT_LIMIT: usize = 50;

const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Retention policy.
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Query-layer read cache.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Query defaults.
    #[serde(default)]
    pub query: QueryConfig,

    /// On-disk storage.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Loads `config.toml` from `journey_dir`, falling back to defaults
    /// when the file is absent.
    pub fn load(journey_dir: &Path) -> Result<Self> {
        let path = journey_dir.join(CONFIG_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| JourneyError::ConfigError(format!("failed to read config: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| JourneyError::ConfigError(format!("failed to parse config: {}", e)))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes `config.toml` into `journey_dir`.
    pub fn save(&self, journey_dir: &Path) -> Result<()> {
        let path = journey_dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| JourneyError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| JourneyError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }
}

/// Retention policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetentionConfig {
    /// Visits older than this many days are pruned (default: 90).
    pub horizon_days: u32,

    /// Run a retention compaction whenever the store is opened (default: false).
    pub compact_on_open: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            horizon_days: 90,
            compact_on_open: false,
        }
    }
}

impl RetentionConfig {
    /// Horizon in milliseconds.
    pub fn horizon_ms(&self) -> i64 {
        i64::from(self.horizon_days) * DAY_MS
    }
}

/// Read cache for the query layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a loaded snapshot may be served, in ms (default: 5000).
    /// Zero disables caching.
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_CACHE_TTL_MS,
        }
    }
}

impl CacheConfig {
    /// TTL as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

/// Query defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QueryConfig {
    /// Visits returned by a per-domain listing when no limit is given (default: 50).
    pub domain_visit_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            domain_visit_limit: DEFAULT_DOMAIN_VISIT_LIMIT,
        }
    }
}

/// On-disk storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Compression level for zstd (1-22, default: 3).
    pub compression_level: i32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            compression_level: 3,
        }
    }
}
