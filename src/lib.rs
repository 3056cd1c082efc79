//! entity-cache
//!
//! Read-through caching and write invalidation for a set of domain
//! repositories:
//! - Deterministic cache keys and wildcard patterns per entity kind
//! - A static invalidation graph mapping each mutation to the cached reads it
//!   makes stale
//! - Caching decorators for every repository, coordinated through one backend
//! - Redis and in-memory backends with tracing spans and metrics

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
