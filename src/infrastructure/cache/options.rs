//! Construction options shared by the cache backends

use std::sync::Arc;

use tracing::Dispatch;

use crate::domain::{DomainError, StoreClient};
use crate::infrastructure::observability::{CacheHooks, SpanFactory, TracingSpanFactory};

/// Options bag accepted by every backend constructor
///
/// `client` is required. `tracer` defaults to [`TracingSpanFactory`] and
/// `logger` to the global subscriber.
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
    pub client: Option<Arc<dyn StoreClient>>,
    pub database: Option<i64>,
    pub tracer: Option<Arc<dyn SpanFactory>>,
    pub logger: Option<Dispatch>,
}

/// Validated options
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub client: Arc<dyn StoreClient>,
    pub hooks: CacheHooks,
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client: Arc<dyn StoreClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn database(mut self, database: i64) -> Self {
        self.database = Some(database);
        self
    }

    pub fn tracer(mut self, tracer: Arc<dyn SpanFactory>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn logger(mut self, logger: Dispatch) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn build(self) -> Result<ResolvedOptions, DomainError> {
        let client = self.client.ok_or_else(|| {
            DomainError::configuration("Cache options require a store client")
        })?;

        let database = self.database.unwrap_or(0);
        if database < 0 {
            return Err(DomainError::configuration(format!(
                "Cache database must be non-negative, got {}",
                database
            )));
        }

        let tracer = self
            .tracer
            .unwrap_or_else(|| Arc::new(TracingSpanFactory));

        Ok(ResolvedOptions {
            client,
            hooks: CacheHooks::new(tracer, self.logger, database),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockStoreClient;

    #[test]
    fn test_missing_client_is_configuration_error() {
        let result = CacheOptions::new().database(1).build();
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_negative_database_is_rejected() {
        let result = CacheOptions::new()
            .client(Arc::new(MockStoreClient::new(&[])))
            .database(-1)
            .build();
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_defaults() {
        let resolved = CacheOptions::new()
            .client(Arc::new(MockStoreClient::new(&[])))
            .build()
            .unwrap();
        assert_eq!(resolved.hooks.database(), 0);
    }
}
