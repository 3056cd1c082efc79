//! Cache trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use super::key::{CacheKey, CachePattern};
use crate::domain::DomainError;

/// Backend operations, used to name spans and classify failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOp {
    Get,
    Set,
    Delete,
    DeletePattern,
    Keys,
}

impl CacheOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Delete => "delete",
            Self::DeletePattern => "delete_pattern",
            Self::Keys => "keys",
        }
    }

    /// Maps a backend failure message onto the error kind owned by this
    /// operation. Key enumeration only happens on behalf of pattern deletion.
    pub fn error(&self, target: impl Into<String>, message: impl Into<String>) -> DomainError {
        match self {
            Self::Get => DomainError::cache_read(target, message),
            Self::Set => DomainError::cache_write(target, message),
            Self::Delete | Self::DeletePattern | Self::Keys => {
                DomainError::cache_delete(target, message)
            }
        }
    }
}

impl std::fmt::Display for CacheOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-through cache backend
///
/// Values cross this trait as JSON strings so it stays dyn-compatible; use
/// [`CacheExt`] for typed access. A missing key is `Ok(None)`, never an error.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Gets a raw JSON value from the cache
    async fn get_raw(&self, key: &CacheKey) -> Result<Option<String>, DomainError>;

    /// Stores a raw JSON value under the backend's default TTL
    async fn set_raw(&self, key: &CacheKey, value: &str) -> Result<(), DomainError>;

    /// Deletes one key, returning whether it existed
    async fn delete(&self, key: &CacheKey) -> Result<bool, DomainError>;

    /// Deletes every key matching the pattern, returning how many were removed.
    /// An empty match set is a successful no-op.
    async fn delete_pattern(&self, pattern: &CachePattern) -> Result<usize, DomainError>;
}

/// Extension trait providing typed get/set operations
pub trait CacheExt: Cache {
    /// Gets a typed value; an undecodable entry is a read failure
    fn get<'a, V>(
        &'a self,
        key: &'a CacheKey,
    ) -> impl std::future::Future<Output = Result<Option<V>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            match self.get_raw(key).await? {
                Some(data) => {
                    let value: V = serde_json::from_str(&data).map_err(|e| {
                        DomainError::cache_read(
                            key.as_str(),
                            format!("Failed to deserialize cache value: {}", e),
                        )
                    })?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        }
    }

    /// Sets a typed value
    fn set<'a, V>(
        &'a self,
        key: &'a CacheKey,
        value: &'a V,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            let data = serde_json::to_string(value).map_err(|e| {
                DomainError::cache_write(
                    key.as_str(),
                    format!("Failed to serialize cache value: {}", e),
                )
            })?;
            self.set_raw(key, &data).await
        }
    }
}

// Blanket implementation for all types implementing Cache
impl<T: Cache + ?Sized> CacheExt for T {}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::{Arc, Mutex};

    /// Ordered record of calls shared between mocks
    #[derive(Debug, Clone, Default)]
    pub struct Journal(Arc<Mutex<Vec<String>>>);

    impl Journal {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn record(&self, entry: impl Into<String>) {
            self.0.lock().unwrap().push(entry.into());
        }

        pub fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }

        pub fn clear(&self) {
            self.0.lock().unwrap().clear();
        }
    }

    /// Mock cache for testing
    ///
    /// Every call is appended to the journal as `cache.<op> <target>`, before
    /// any injected failure is applied.
    #[derive(Debug, Default)]
    pub struct MockCache {
        entries: Mutex<BTreeMap<String, String>>,
        journal: Journal,
        calls: Mutex<HashMap<CacheOp, usize>>,
        failures: Mutex<HashMap<CacheOp, Failure>>,
    }

    #[derive(Debug, Clone, Copy)]
    enum Failure {
        Always,
        Nth(usize),
    }

    impl MockCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_journal(journal: Journal) -> Self {
            Self {
                journal,
                ..Self::default()
            }
        }

        pub fn with_entry<V: Serialize>(self, key: &str, value: &V) -> Self {
            let json = serde_json::to_string(value).unwrap();
            self.entries.lock().unwrap().insert(key.to_string(), json);
            self
        }

        /// Every call of `op` fails
        pub fn fail(self, op: CacheOp) -> Self {
            self.failures.lock().unwrap().insert(op, Failure::Always);
            self
        }

        /// Only the `n`-th call (1-based) of `op` fails
        pub fn fail_nth(self, op: CacheOp, n: usize) -> Self {
            self.failures.lock().unwrap().insert(op, Failure::Nth(n));
            self
        }

        pub fn journal(&self) -> Journal {
            self.journal.clone()
        }

        pub fn calls(&self, op: CacheOp) -> usize {
            self.calls.lock().unwrap().get(&op).copied().unwrap_or(0)
        }

        pub fn keys(&self) -> Vec<String> {
            self.entries.lock().unwrap().keys().cloned().collect()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.lock().unwrap().is_empty()
        }

        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        fn enter(&self, op: CacheOp, target: &str) -> Result<(), DomainError> {
            self.journal.record(format!("cache.{} {}", op, target));

            let count = {
                let mut calls = self.calls.lock().unwrap();
                let count = calls.entry(op).or_insert(0);
                *count += 1;
                *count
            };

            match self.failures.lock().unwrap().get(&op) {
                Some(Failure::Always) => Err(op.error(target, "injected failure")),
                Some(Failure::Nth(n)) if *n == count => Err(op.error(target, "injected failure")),
                _ => Ok(()),
            }
        }
    }

    #[async_trait]
    impl Cache for MockCache {
        async fn get_raw(&self, key: &CacheKey) -> Result<Option<String>, DomainError> {
            self.enter(CacheOp::Get, key.as_str())?;
            Ok(self.entries.lock().unwrap().get(key.as_str()).cloned())
        }

        async fn set_raw(&self, key: &CacheKey, value: &str) -> Result<(), DomainError> {
            self.enter(CacheOp::Set, key.as_str())?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.as_str().to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &CacheKey) -> Result<bool, DomainError> {
            self.enter(CacheOp::Delete, key.as_str())?;
            Ok(self.entries.lock().unwrap().remove(key.as_str()).is_some())
        }

        async fn delete_pattern(&self, pattern: &CachePattern) -> Result<usize, DomainError> {
            self.enter(CacheOp::DeletePattern, pattern.as_str())?;

            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|key, _| !pattern.matches(key));

            Ok(before - entries.len())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::entity::EntityKind;
        use crate::{cache_key, cache_pattern};

        #[tokio::test]
        async fn test_mock_cache_set_get() {
            let cache = MockCache::new();
            let key = cache_key!(EntityKind::Label, "l1");

            cache.set(&key, &"value1").await.unwrap();

            let result: Option<String> = cache.get(&key).await.unwrap();
            assert_eq!(result, Some("value1".to_string()));
        }

        #[tokio::test]
        async fn test_mock_cache_get_missing() {
            let cache = MockCache::new();

            let result: Option<String> = cache
                .get(&cache_key!(EntityKind::Label, "missing"))
                .await
                .unwrap();
            assert!(result.is_none());
        }

        #[tokio::test]
        async fn test_mock_cache_undecodable_value_is_read_error() {
            let cache = MockCache::new().with_entry("Label:l1", &"not a number");

            let result: Result<Option<u32>, _> = cache.get(&cache_key!(EntityKind::Label, "l1")).await;
            assert!(matches!(result, Err(DomainError::CacheRead { .. })));
        }

        #[tokio::test]
        async fn test_mock_cache_failure_kinds() {
            let cache = MockCache::new()
                .fail(CacheOp::Get)
                .fail(CacheOp::Set)
                .fail(CacheOp::DeletePattern);
            let key = cache_key!(EntityKind::Label, "l1");

            let read: Result<Option<String>, _> = cache.get(&key).await;
            assert!(matches!(read, Err(DomainError::CacheRead { .. })));

            let write = cache.set(&key, &1).await;
            assert!(matches!(write, Err(DomainError::CacheWrite { .. })));

            let delete = cache.delete_pattern(&cache_pattern!(EntityKind::Label)).await;
            assert!(matches!(delete, Err(DomainError::CacheDelete { .. })));
        }

        #[tokio::test]
        async fn test_mock_cache_fail_nth() {
            let cache = MockCache::new().fail_nth(CacheOp::Delete, 2);
            let key = cache_key!(EntityKind::Label, "l1");

            assert!(cache.delete(&key).await.is_ok());
            assert!(cache.delete(&key).await.is_err());
            assert!(cache.delete(&key).await.is_ok());
            assert_eq!(cache.calls(CacheOp::Delete), 3);
        }

        #[tokio::test]
        async fn test_mock_cache_delete_pattern() {
            let cache = MockCache::new()
                .with_entry("Comment:GetAllBelongsTo:d1:0:10", &1)
                .with_entry("Comment:GetAllBelongsTo:d2:0:10", &2)
                .with_entry("Comment:c1", &3);

            let deleted = cache
                .delete_pattern(&cache_pattern!(EntityKind::Comment, "GetAllBelongsTo", "d1"))
                .await
                .unwrap();

            assert_eq!(deleted, 1);
            assert_eq!(
                cache.keys(),
                vec!["Comment:GetAllBelongsTo:d2:0:10", "Comment:c1"]
            );
        }

        #[tokio::test]
        async fn test_mock_cache_journal() {
            let journal = Journal::new();
            let cache = MockCache::with_journal(journal.clone());

            cache.delete(&cache_key!(EntityKind::Label, "l1")).await.unwrap();
            cache
                .delete_pattern(&cache_pattern!(EntityKind::Issue))
                .await
                .unwrap();

            assert_eq!(
                journal.entries(),
                vec!["cache.delete Label:l1", "cache.delete_pattern Issue:*"]
            );
        }
    }
}
