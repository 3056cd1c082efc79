//! In-memory cache implementation using moka

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use regex::Regex;
use tracing::debug;

use super::options::CacheOptions;
use crate::domain::cache::{Cache, CacheKey, CacheOp, CachePattern, StoreClient};
use crate::domain::DomainError;
use crate::infrastructure::observability::CacheHooks;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
    /// TTL applied to every entry; entries never expire when unset
    pub default_ttl: Option<Duration>,
    /// Time to idle - entries not accessed for this duration are evicted
    pub time_to_idle: Option<Duration>,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            default_ttl: Some(Duration::from_secs(3600)), // 1 hour
            time_to_idle: None,
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_time_to_idle(mut self, tti: Duration) -> Self {
        self.time_to_idle = Some(tti);
        self
    }

    fn build_store(&self) -> MokaCache<String, String> {
        let mut builder = MokaCache::builder().max_capacity(self.max_capacity);

        if let Some(ttl) = self.default_ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = self.time_to_idle {
            builder = builder.time_to_idle(tti);
        }

        builder.build()
    }
}

/// Key enumeration over a moka store
#[derive(Debug, Clone)]
pub struct InMemoryStoreClient {
    store: MokaCache<String, String>,
}

impl InMemoryStoreClient {
    pub fn new(store: MokaCache<String, String>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StoreClient for InMemoryStoreClient {
    async fn keys(&self, glob: &str) -> Result<Vec<String>, DomainError> {
        let matcher = glob_regex(glob)
            .map_err(|e| DomainError::cache_delete(glob, format!("Invalid store glob: {}", e)))?;

        self.store.run_pending_tasks().await;

        let store = self.store.clone();

        tokio::task::spawn_blocking(move || {
            store
                .iter()
                .filter(|(key, _)| matcher.is_match(key.as_str()))
                .map(|(key, _)| key.as_str().to_string())
                .collect()
        })
        .await
        .map_err(|e| {
            DomainError::cache_delete(glob, format!("Failed to iterate cache: {}", e))
        })
    }
}

/// Compiles a store glob where `*` spans any run of characters, separators
/// included; everything else matches literally
fn glob_regex(glob: &str) -> Result<Regex, regex::Error> {
    let body = glob
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    Regex::new(&format!("(?s)^{}$", body))
}

/// Thread-safe in-memory cache implementation using moka
///
/// Expiry and capacity eviction are handled by moka. Pattern deletion
/// enumerates through the configured [`StoreClient`] and filters with
/// segment semantics, so `Issue:*` never touches `IssueRelation:*` keys.
#[derive(Debug, Clone)]
pub struct InMemoryCache {
    store: MokaCache<String, String>,
    client: Arc<dyn StoreClient>,
    hooks: CacheHooks,
}

impl InMemoryCache {
    /// Creates a new in-memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a new in-memory cache enumerating its own entries
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let store = config.build_store();
        let client: Arc<dyn StoreClient> = Arc::new(InMemoryStoreClient::new(store.clone()));

        Self {
            store,
            client,
            hooks: CacheHooks::default(),
        }
    }

    /// Creates a cache with caller-supplied hooks; a missing `client`
    /// defaults to [`InMemoryStoreClient`]
    pub fn with_options(
        config: InMemoryCacheConfig,
        mut options: CacheOptions,
    ) -> Result<Self, DomainError> {
        let store = config.build_store();

        if options.client.is_none() {
            options.client = Some(Arc::new(InMemoryStoreClient::new(store.clone())));
        }

        let resolved = options.build()?;

        Ok(Self {
            store,
            client: resolved.client,
            hooks: resolved.hooks,
        })
    }

    /// Number of live entries
    pub async fn len(&self) -> u64 {
        self.store.run_pending_tasks().await;
        self.store.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &CacheKey) -> Result<Option<String>, DomainError> {
        self.hooks
            .observe(CacheOp::Get, key.as_str(), async {
                Ok::<_, DomainError>(self.store.get(key.as_str()).await)
            })
            .await
    }

    async fn set_raw(&self, key: &CacheKey, value: &str) -> Result<(), DomainError> {
        self.hooks
            .observe(CacheOp::Set, key.as_str(), async {
                self.store
                    .insert(key.as_str().to_string(), value.to_string())
                    .await;
                Ok::<_, DomainError>(())
            })
            .await
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool, DomainError> {
        self.hooks
            .observe(CacheOp::Delete, key.as_str(), async {
                Ok::<_, DomainError>(self.store.remove(key.as_str()).await.is_some())
            })
            .await
    }

    async fn delete_pattern(&self, pattern: &CachePattern) -> Result<usize, DomainError> {
        self.hooks
            .observe(CacheOp::DeletePattern, pattern.as_str(), async {
                let glob = pattern.store_glob();
                let candidates = self
                    .hooks
                    .observe(CacheOp::Keys, &glob, self.client.keys(&glob))
                    .await?;

                let mut deleted = 0usize;
                for key in candidates.iter().filter(|key| pattern.matches(key)) {
                    if self.store.remove(key.as_str()).await.is_some() {
                        deleted += 1;
                    }
                }

                debug!(pattern = %pattern, deleted, "Deleted keys matching pattern");
                Ok::<_, DomainError>(deleted)
            })
            .await
    }
}
