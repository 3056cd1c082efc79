//! Low-level key enumeration

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Key enumeration primitive of the auxiliary store
///
/// Only pattern deletion uses this. `glob` is a store glob as produced by
/// `CachePattern::store_glob`, so the result may contain keys the pattern
/// itself does not match; callers filter.
#[async_trait]
pub trait StoreClient: Send + Sync + Debug {
    async fn keys(&self, glob: &str) -> Result<Vec<String>, DomainError>;
}
