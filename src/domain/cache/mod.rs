//! Cache domain - keys, backend contract and key enumeration

mod key;
mod repository;
mod store;

pub use key::{CacheKey, CachePattern, KeyCodec, KeyPart, SEPARATOR, WILDCARD};
pub use repository::{Cache, CacheExt, CacheOp};
pub use store::StoreClient;

#[cfg(test)]
pub use repository::mock::{Journal, MockCache};
#[cfg(test)]
pub use store::mock::MockStoreClient;
