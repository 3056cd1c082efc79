//! Infrastructure layer - cache backends, caching repositories and observability

pub mod cache;
pub mod cached;
pub mod observability;
