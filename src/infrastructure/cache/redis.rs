//! Redis cache implementation

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, IntoConnectionInfo, RedisResult};
use tracing::debug;

use super::error::run_command;
use super::options::CacheOptions;
use crate::domain::cache::{Cache, CacheKey, CacheOp, CachePattern, StoreClient};
use crate::domain::DomainError;
use crate::infrastructure::observability::CacheHooks;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Logical database selected on connect
    pub database: i64,
    /// TTL applied to every entry; entries never expire when unset
    pub default_ttl: Option<Duration>,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Connection timeout
    pub connection_timeout: Duration,
    /// Deadline for each command
    pub command_timeout: Option<Duration>,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            database: 0,
            default_ttl: Some(Duration::from_secs(3600)),
            key_prefix: None,
            connection_timeout: Duration::from_secs(5),
            command_timeout: None,
        }
    }
}

impl RedisCacheConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_database(mut self, database: i64) -> Self {
        self.database = database;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    /// Prefix prepended to every stored key, separator included
    fn store_prefix(&self) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:", prefix),
            None => String::new(),
        }
    }

    /// `SCAN MATCH` glob for a pattern; the prefix matches literally
    fn scan_glob(&self, pattern: &CachePattern) -> String {
        format!("{}{}", escape_glob(&self.store_prefix()), pattern.store_glob())
    }
}

/// Backslash-escapes Redis glob metacharacters
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());

    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Key enumeration over `SCAN MATCH`
#[derive(Clone)]
pub struct RedisStoreClient {
    connection: ConnectionManager,
    scan_count: usize,
    command_timeout: Option<Duration>,
}

impl fmt::Debug for RedisStoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStoreClient")
            .field("scan_count", &self.scan_count)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisStoreClient {
    pub fn new(connection: ConnectionManager) -> Self {
        Self {
            connection,
            scan_count: 100,
            command_timeout: None,
        }
    }

    pub fn with_command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command_timeout = timeout;
        self
    }
}

#[async_trait]
impl StoreClient for RedisStoreClient {
    async fn keys(&self, glob: &str) -> Result<Vec<String>, DomainError> {
        let mut conn = self.connection.clone();
        let mut cursor = 0u64;
        let mut keys = Vec::new();

        // SCAN rather than KEYS so large keyspaces do not block the server
        loop {
            let (next, batch): (u64, Vec<String>) = run_command(
                CacheOp::Keys,
                glob,
                self.command_timeout,
                redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(glob)
                    .arg("COUNT")
                    .arg(self.scan_count)
                    .query_async(&mut conn),
            )
            .await?;

            keys.extend(batch);
            cursor = next;

            if cursor == 0 {
                break;
            }
        }

        Ok(keys)
    }
}

/// Redis cache implementation
///
/// Pattern deletion enumerates keys through the configured [`StoreClient`],
/// keeps only the keys the pattern matches, and deletes them one by one.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
    prefix: String,
    client: Arc<dyn StoreClient>,
    hooks: CacheHooks,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("client", &self.client)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Connects to Redis and enumerates keys over the same connection
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        Self::connect(config, CacheOptions::new()).await
    }

    /// Connects with caller-supplied hooks; a missing `client` defaults to
    /// [`RedisStoreClient`] and a missing `database` to the configured one
    pub async fn connect(
        config: RedisCacheConfig,
        mut options: CacheOptions,
    ) -> Result<Self, DomainError> {
        let database = options.database.unwrap_or(config.database);
        if database < 0 {
            return Err(DomainError::configuration(format!(
                "Cache database must be non-negative, got {}",
                database
            )));
        }

        let mut info = config.url.as_str().into_connection_info().map_err(|e| {
            DomainError::configuration(format!("Invalid Redis URL '{}': {}", config.url, e))
        })?;
        info.redis.db = database;

        let client = Client::open(info)
            .map_err(|e| DomainError::configuration(format!("Failed to create Redis client: {}", e)))?;

        let connection = tokio::time::timeout(config.connection_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| DomainError::timeout("redis connect"))?
            .map_err(|e| DomainError::storage(format!("Failed to connect to Redis: {}", e)))?;

        if options.client.is_none() {
            let store = RedisStoreClient::new(connection.clone())
                .with_command_timeout(config.command_timeout);
            options.client = Some(Arc::new(store));
        }
        options.database = Some(database);

        debug!(url = %config.url, database, "Connected to Redis");

        Self::with_connection(connection, config, options)
    }

    /// Wraps an existing connection
    pub fn with_connection(
        connection: ConnectionManager,
        config: RedisCacheConfig,
        options: CacheOptions,
    ) -> Result<Self, DomainError> {
        let resolved = options.build()?;

        Ok(Self {
            connection,
            prefix: config.store_prefix(),
            config,
            client: resolved.client,
            hooks: resolved.hooks,
        })
    }

    fn prefix_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Runs one command inside its span and under the command deadline
    async fn execute<T, F>(&self, op: CacheOp, target: &str, command: F) -> Result<T, DomainError>
    where
        F: Future<Output = RedisResult<T>> + Send,
        T: Send,
    {
        self.hooks
            .observe(
                op,
                target,
                run_command(op, target, self.config.command_timeout, command),
            )
            .await
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_raw(&self, key: &CacheKey) -> Result<Option<String>, DomainError> {
        let mut conn = self.connection.clone();
        let prefixed = self.prefix_key(key.as_str());

        self.execute(CacheOp::Get, key.as_str(), async move {
            let value: RedisResult<Option<String>> = conn.get(prefixed).await;
            value
        })
        .await
    }

    async fn set_raw(&self, key: &CacheKey, value: &str) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();
        let prefixed = self.prefix_key(key.as_str());
        let ttl = self.config.default_ttl;

        self.execute(CacheOp::Set, key.as_str(), async move {
            let stored: RedisResult<()> = match ttl {
                Some(ttl) => conn.set_ex(prefixed, value, ttl.as_secs().max(1)).await,
                None => conn.set(prefixed, value).await,
            };
            stored
        })
        .await
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();
        let prefixed = self.prefix_key(key.as_str());

        let deleted: i64 = self
            .execute(CacheOp::Delete, key.as_str(), async move {
                let removed: RedisResult<i64> = conn.del(prefixed).await;
                removed
            })
            .await?;

        Ok(deleted > 0)
    }

    async fn delete_pattern(&self, pattern: &CachePattern) -> Result<usize, DomainError> {
        let target = pattern.as_str();

        self.hooks
            .observe(CacheOp::DeletePattern, target, async {
                let glob = self.config.scan_glob(pattern);
                let candidates = self
                    .hooks
                    .observe(CacheOp::Keys, &glob, self.client.keys(&glob))
                    .await?;

                let mut deleted = 0usize;
                for raw in candidates {
                    let matched = raw
                        .strip_prefix(self.prefix.as_str())
                        .is_some_and(|key| pattern.matches(key));
                    if !matched {
                        continue;
                    }

                    let mut conn = self.connection.clone();
                    let removed: i64 = run_command(
                        CacheOp::DeletePattern,
                        target,
                        self.config.command_timeout,
                        async move {
                            let removed: RedisResult<i64> = conn.del(raw).await;
                            removed
                        },
                    )
                    .await?;
                    deleted += removed as usize;
                }

                debug!(pattern = %pattern, deleted, "Deleted keys matching pattern");
                Ok::<_, DomainError>(deleted)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;
    use crate::domain::EntityKind;
    use crate::{cache_key, cache_pattern};

    // These tests require a running Redis instance:
    // cargo test -- --ignored

    fn get_test_config() -> RedisCacheConfig {
        RedisCacheConfig::new("redis://127.0.0.1:6379")
            .with_key_prefix("entity-cache-test")
            .with_default_ttl(Some(Duration::from_secs(60)))
            .with_command_timeout(Duration::from_secs(2))
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_set_get_delete() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();
        let key = cache_key!(EntityKind::Label, "redis-l1");

        cache.set(&key, &"value1").await.unwrap();

        let result: Option<String> = cache.get(&key).await.unwrap();
        assert_eq!(result, Some("value1".to_string()));

        assert!(cache.delete(&key).await.unwrap());
        assert!(!cache.delete(&key).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_delete_pattern_respects_segments() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();
        let issue_listing = cache_key!(EntityKind::Issue, "GetRelations", "redis-i1");
        let relation = cache_key!(EntityKind::IssueRelation, "redis-r1");

        cache.set(&issue_listing, &1).await.unwrap();
        cache.set(&relation, &2).await.unwrap();

        let deleted = cache
            .delete_pattern(&cache_pattern!(EntityKind::Issue))
            .await
            .unwrap();
        assert!(deleted >= 1);

        let kept: Option<i32> = cache.get(&relation).await.unwrap();
        assert_eq!(kept, Some(2));

        cache.delete(&relation).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_empty_pattern_is_noop() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();

        let deleted = cache
            .delete_pattern(&cache_pattern!(EntityKind::Todo, "GetByOwner", "nobody"))
            .await
            .unwrap();
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn test_invalid_url_is_configuration_error() {
        let result = RedisCache::new(RedisCacheConfig::new("not a url")).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_negative_database_is_rejected_before_connecting() {
        let config = RedisCacheConfig::new("redis://127.0.0.1:1").with_database(-3);
        let result = RedisCache::new(config).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_scan_glob_escapes_prefix_metacharacters() {
        let config = RedisCacheConfig::new("redis://localhost").with_key_prefix("app[1]*?");
        let pattern = cache_pattern!(EntityKind::Issue, "GetRelations");

        assert_eq!(
            config.scan_glob(&pattern),
            r"app\[1\]\*\?:Issue:GetRelations*"
        );
        assert_eq!(
            RedisCacheConfig::default().scan_glob(&pattern),
            "Issue:GetRelations*"
        );
    }

    #[test]
    fn test_store_prefix() {
        let config = RedisCacheConfig::new("redis://localhost").with_key_prefix("myapp");
        assert_eq!(config.store_prefix(), "myapp:");
        assert_eq!(RedisCacheConfig::default().store_prefix(), "");
    }
}
