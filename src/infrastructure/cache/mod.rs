//! Cache infrastructure - Cache implementations

mod error;
mod factory;
mod in_memory;
mod options;
mod redis;

pub use error::{map_redis_error, run_command};
pub use factory::{CacheConfig, CacheFactory, CacheType};
pub use in_memory::{InMemoryCache, InMemoryCacheConfig, InMemoryStoreClient};
pub use options::{CacheOptions, ResolvedOptions};
pub use redis::{RedisCache, RedisCacheConfig, RedisStoreClient};
