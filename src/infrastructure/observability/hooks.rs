//! Spans and logging around every backend operation

use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

use tracing::instrument::WithSubscriber;
use tracing::{dispatcher, field, Dispatch, Instrument, Span};

use super::metrics::record_backend_error;
use crate::domain::{CacheOp, DomainError};

/// Opens the span that wraps one backend operation
///
/// Spans should declare an empty `outcome` field; it is recorded when the
/// operation returns.
pub trait SpanFactory: Send + Sync + Debug {
    fn span(&self, op: CacheOp, target: &str, database: i64) -> Span;
}

/// Span factory backed by the `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSpanFactory;

impl SpanFactory for TracingSpanFactory {
    fn span(&self, op: CacheOp, target: &str, database: i64) -> Span {
        match op {
            CacheOp::Get => tracing::debug_span!(
                "cache.get",
                cache.target = %target,
                db = database,
                outcome = field::Empty
            ),
            CacheOp::Set => tracing::debug_span!(
                "cache.set",
                cache.target = %target,
                db = database,
                outcome = field::Empty
            ),
            CacheOp::Delete => tracing::debug_span!(
                "cache.delete",
                cache.target = %target,
                db = database,
                outcome = field::Empty
            ),
            CacheOp::DeletePattern => tracing::debug_span!(
                "cache.delete_pattern",
                cache.target = %target,
                db = database,
                outcome = field::Empty
            ),
            CacheOp::Keys => tracing::debug_span!(
                "cache.keys",
                cache.target = %target,
                db = database,
                outcome = field::Empty
            ),
        }
    }
}

/// Observation wrapper shared by the backends
#[derive(Debug, Clone)]
pub struct CacheHooks {
    tracer: Arc<dyn SpanFactory>,
    logger: Option<Dispatch>,
    database: i64,
}

impl Default for CacheHooks {
    fn default() -> Self {
        Self::new(Arc::new(TracingSpanFactory), None, 0)
    }
}

impl CacheHooks {
    pub fn new(tracer: Arc<dyn SpanFactory>, logger: Option<Dispatch>, database: i64) -> Self {
        Self {
            tracer,
            logger,
            database,
        }
    }

    pub fn database(&self) -> i64 {
        self.database
    }

    /// Runs `operation` inside its span and returns its result untouched
    pub async fn observe<T, F>(
        &self,
        op: CacheOp,
        target: &str,
        operation: F,
    ) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>> + Send,
    {
        let dispatch = self
            .logger
            .clone()
            .unwrap_or_else(|| dispatcher::get_default(Dispatch::clone));

        let span = dispatcher::with_default(&dispatch, || {
            self.tracer.span(op, target, self.database)
        });

        let result = operation
            .instrument(span.clone())
            .with_subscriber(dispatch.clone())
            .await;

        dispatcher::with_default(&dispatch, || {
            let _entered = span.enter();
            match &result {
                Ok(_) => {
                    span.record("outcome", "ok");
                }
                Err(e) => {
                    span.record("outcome", "error");
                    tracing::warn!(
                        operation = %op,
                        target = %target,
                        error = %e,
                        "Cache backend operation failed"
                    );
                }
            }
        });

        if result.is_err() {
            record_backend_error(op);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingSpanFactory {
        opened: Mutex<Vec<String>>,
    }

    impl SpanFactory for RecordingSpanFactory {
        fn span(&self, op: CacheOp, target: &str, _database: i64) -> Span {
            self.opened
                .lock()
                .unwrap()
                .push(format!("{} {}", op, target));
            Span::none()
        }
    }

    #[tokio::test]
    async fn test_observe_passes_value_through() {
        let hooks = CacheHooks::default();

        let result = hooks
            .observe(CacheOp::Get, "Issue:i1", async { Ok(Some(7)) })
            .await;

        assert_eq!(result.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_observe_passes_error_through() {
        let hooks = CacheHooks::default();

        let result: Result<(), _> = hooks
            .observe(CacheOp::Delete, "Issue:i1", async {
                Err(DomainError::cache_delete("Issue:i1", "connection reset"))
            })
            .await;

        match result {
            Err(DomainError::CacheDelete { target, message }) => {
                assert_eq!(target, "Issue:i1");
                assert_eq!(message, "connection reset");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_custom_factory_opens_one_span_per_operation() {
        let factory = Arc::new(RecordingSpanFactory::default());
        let hooks = CacheHooks::new(factory.clone(), None, 2);

        hooks
            .observe(CacheOp::Set, "Label:l1", async { Ok(()) })
            .await
            .unwrap();
        hooks
            .observe(CacheOp::DeletePattern, "Label:*", async { Ok(3usize) })
            .await
            .unwrap();

        assert_eq!(
            *factory.opened.lock().unwrap(),
            vec!["set Label:l1", "delete_pattern Label:*"]
        );
        assert_eq!(hooks.database(), 2);
    }

    #[tokio::test]
    async fn test_scoped_logger_receives_operation() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let hooks = CacheHooks::new(
            Arc::new(TracingSpanFactory),
            Some(Dispatch::new(subscriber)),
            0,
        );

        let result = hooks
            .observe(CacheOp::Keys, "Issue*", async {
                Ok(vec!["Issue:i1".to_string()])
            })
            .await;

        assert_eq!(result.unwrap(), vec!["Issue:i1"]);
    }
}
