//! Cache factory for runtime selection

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::options::CacheOptions;
use super::redis::{RedisCache, RedisCacheConfig};

/// Supported cache types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheType {
    /// In-memory cache using moka
    #[default]
    #[serde(alias = "memory", alias = "inmemory")]
    InMemory,
    /// Redis cache
    Redis,
}

impl std::fmt::Display for CacheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheType::InMemory => write!(f, "in_memory"),
            CacheType::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for CacheType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(CacheType::InMemory),
            "redis" => Ok(CacheType::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache type: {}. Valid types: in_memory, redis",
                s
            ))),
        }
    }
}

/// `cache` section of the application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheType,
    /// Redis URL (required for Redis type)
    pub redis_url: Option<String>,
    /// Logical database; must be non-negative
    pub database: i64,
    pub key_prefix: Option<String>,
    /// Entry lifetime; `0` disables expiry
    pub default_ttl_secs: u64,
    /// Per-command deadline (Redis only)
    pub command_timeout_ms: Option<u64>,
    /// Maximum entry count (in-memory only)
    pub max_capacity: u64,
    /// Time to idle (in-memory only)
    pub time_to_idle_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheType::InMemory,
            redis_url: None,
            database: 0,
            key_prefix: None,
            default_ttl_secs: 3600,
            command_timeout_ms: None,
            max_capacity: 10_000,
            time_to_idle_secs: None,
        }
    }
}

impl CacheConfig {
    /// Creates a new configuration for in-memory cache
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Creates a new configuration for Redis cache
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            backend: CacheType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_default_ttl_secs(mut self, secs: u64) -> Self {
        self.default_ttl_secs = secs;
        self
    }

    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        (self.default_ttl_secs > 0).then(|| Duration::from_secs(self.default_ttl_secs))
    }

    fn in_memory_config(&self) -> InMemoryCacheConfig {
        let mut config = InMemoryCacheConfig::default()
            .with_max_capacity(self.max_capacity)
            .with_default_ttl(self.default_ttl());

        if let Some(tti) = self.time_to_idle_secs {
            config = config.with_time_to_idle(Duration::from_secs(tti));
        }

        config
    }

    fn redis_config(&self) -> Result<RedisCacheConfig, DomainError> {
        let url = self.redis_url.clone().ok_or_else(|| {
            DomainError::configuration("Redis URL is required for Redis cache type")
        })?;

        let mut config = RedisCacheConfig::new(url)
            .with_database(self.database)
            .with_default_ttl(self.default_ttl());

        if let Some(prefix) = &self.key_prefix {
            config = config.with_key_prefix(prefix.clone());
        }

        if let Some(ms) = self.command_timeout_ms {
            config = config.with_command_timeout(Duration::from_millis(ms));
        }

        Ok(config)
    }
}

/// Factory for creating cache instances
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates a cache instance based on configuration
    pub async fn create(&self, config: &CacheConfig) -> Result<Arc<dyn Cache>, DomainError> {
        self.create_with_options(config, CacheOptions::new()).await
    }

    /// Creates a cache instance with caller-supplied hooks
    pub async fn create_with_options(
        &self,
        config: &CacheConfig,
        options: CacheOptions,
    ) -> Result<Arc<dyn Cache>, DomainError> {
        let options = options.database(config.database);

        match config.backend {
            CacheType::InMemory => {
                let cache = InMemoryCache::with_options(config.in_memory_config(), options)?;
                Ok(Arc::new(cache))
            }
            CacheType::Redis => {
                let cache = RedisCache::connect(config.redis_config()?, options).await?;
                Ok(Arc::new(cache))
            }
        }
    }
}
