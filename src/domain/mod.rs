//! Domain layer - entities, repository contracts, cache keys and the invalidation graph

pub mod assignment;
pub mod attachment;
pub mod cache;
pub mod comment;
pub mod document;
pub mod entity;
pub mod error;
pub mod invalidation;
pub mod issue;
pub mod label;
pub mod namespace;
pub mod organization;
pub mod permission;
pub mod project;
pub mod role;
pub mod todo;
pub mod user;

pub use cache::{Cache, CacheExt, CacheKey, CacheOp, CachePattern, KeyCodec, KeyPart, StoreClient};
pub use entity::{EntityId, EntityIdError, EntityKind, Patch};
pub use error::DomainError;
pub use invalidation::{
    Eviction, EvictionArgs, EvictionPlan, InvalidationGraph, Operation, ReadOp, WriteStrategy,
};
