//! Read-through and write-invalidate sequencing shared by the cached repositories

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::cache::{Cache, CacheExt, CacheKey};
use crate::domain::entity::{EntityId, EntityKind};
use crate::domain::invalidation::{
    self, Eviction, EvictionArgs, EvictionPlan, InvalidationGraph, Operation, WriteStrategy,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_evictions, record_read, ReadOutcome};

/// Per-id key of `id`, rejecting ids of another kind
pub fn entity_key(kind: EntityKind, id: &EntityId) -> Result<CacheKey, DomainError> {
    if !id.is(kind) {
        return Err(DomainError::invalid_id(format!(
            "Expected a {} id, got {}",
            kind, id
        )));
    }

    Ok(CacheKey::for_entity(id))
}

/// Cache handle plus the invalidation graph every wrapper consults
#[derive(Debug, Clone)]
pub struct CacheCoordinator {
    cache: Arc<dyn Cache>,
    graph: Arc<InvalidationGraph>,
}

impl CacheCoordinator {
    /// Coordinator over the standard invalidation graph
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self::with_graph(cache, invalidation::standard())
    }

    pub fn with_graph(cache: Arc<dyn Cache>, graph: Arc<InvalidationGraph>) -> Self {
        Self { cache, graph }
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    pub fn graph(&self) -> &InvalidationGraph {
        &self.graph
    }

    /// Returns the cached value under `key`, or runs `load` and caches its
    /// result.
    ///
    /// A failing cache read is reported without calling `load`. A failing
    /// write after a successful load is reported and the loaded value is
    /// dropped.
    pub async fn read_through<V, F>(&self, key: CacheKey, load: F) -> Result<V, DomainError>
    where
        V: Serialize + DeserializeOwned + Send + Sync,
        F: Future<Output = Result<V, DomainError>> + Send,
    {
        let cached = match self.cache.as_ref().get::<V>(&key).await {
            Ok(cached) => cached,
            Err(e) => {
                record_read(key.kind(), ReadOutcome::Error);
                return Err(e);
            }
        };

        if let Some(value) = cached {
            debug!(key = %key, "Cache hit");
            record_read(key.kind(), ReadOutcome::Hit);
            return Ok(value);
        }

        debug!(key = %key, "Cache miss, loading");
        record_read(key.kind(), ReadOutcome::Miss);

        let value = load.await?;
        self.cache.as_ref().set(&key, &value).await?;

        Ok(value)
    }

    /// Evicts the targets of `(kind, operation)` in order, then runs
    /// `delegate`. Nothing is delegated when an eviction fails.
    pub async fn mutate<T, F>(
        &self,
        kind: EntityKind,
        operation: Operation,
        args: EvictionArgs<'_>,
        delegate: F,
    ) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>> + Send,
    {
        let plan = self.graph.plan(kind, operation, &args)?;

        if plan.strategy != WriteStrategy::EvictThenDelegate {
            return Err(DomainError::internal(format!(
                "{} {} must refresh after delegating",
                kind, operation
            )));
        }

        self.evict(&plan).await?;
        delegate.await
    }

    /// Update of an entity whose refresh targets only need its id
    pub async fn update<E, F>(
        &self,
        kind: EntityKind,
        id: &EntityId,
        delegate: F,
    ) -> Result<E, DomainError>
    where
        E: Serialize + Send + Sync,
        F: Future<Output = Result<E, DomainError>> + Send,
    {
        self.update_with(kind, id, delegate, |_| None).await
    }

    /// Runs `delegate`, stores the fresh value under the entity's key and
    /// evicts the update targets. `parent_of` supplies the parent slot from
    /// the fresh value.
    ///
    /// The durable write is not undone when a later cache step fails.
    pub async fn update_with<E, F, P>(
        &self,
        kind: EntityKind,
        id: &EntityId,
        delegate: F,
        parent_of: P,
    ) -> Result<E, DomainError>
    where
        E: Serialize + Send + Sync,
        F: Future<Output = Result<E, DomainError>> + Send,
        P: for<'e> FnOnce(&'e E) -> Option<&'e EntityId> + Send,
    {
        let key = entity_key(kind, id)?;

        let strategy = self
            .graph
            .rule(kind, Operation::Update)
            .map(|rule| rule.strategy)
            .ok_or_else(|| {
                DomainError::internal(format!("No invalidation rule for {} update", kind))
            })?;

        if strategy != WriteStrategy::DelegateThenRefresh {
            return Err(DomainError::internal(format!(
                "{} update must refresh after delegating",
                kind
            )));
        }

        let fresh = delegate.await?;

        self.cache.as_ref().set(&key, &fresh).await?;

        let plan = {
            let args = EvictionArgs::new()
                .subject(id)
                .maybe_parent(parent_of(&fresh));
            self.graph.plan(kind, Operation::Update, &args)?
        };

        self.evict(&plan).await?;

        Ok(fresh)
    }

    /// Runs the plan's deletions sequentially; the first failure stops it
    async fn evict(&self, plan: &EvictionPlan) -> Result<usize, DomainError> {
        let mut removed = 0usize;

        for eviction in plan.iter() {
            let result = match eviction {
                Eviction::Key(key) => self.cache.delete(key).await.map(usize::from),
                Eviction::Pattern(pattern) => self.cache.delete_pattern(pattern).await,
            };

            match result {
                Ok(count) => removed += count,
                Err(e) => {
                    warn!(
                        kind = %plan.kind,
                        operation = %plan.operation,
                        target = %eviction,
                        error = %e,
                        "Eviction failed"
                    );
                    return Err(e);
                }
            }
        }

        record_evictions(plan.kind, plan.operation, removed);
        debug!(
            kind = %plan.kind,
            operation = %plan.operation,
            targets = plan.len(),
            removed,
            "Evicted cache entries"
        );

        Ok(removed)
    }
}
