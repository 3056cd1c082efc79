//! Observability infrastructure - tracing, metrics and backend hooks

mod config;
mod hooks;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use hooks::{CacheHooks, SpanFactory, TracingSpanFactory};
pub use metrics::{
    init_metrics, record_backend_error, record_evictions, record_read, PrometheusMetrics,
    ReadOutcome,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
