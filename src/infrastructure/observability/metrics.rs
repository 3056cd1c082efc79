//! Cache counters and the optional Prometheus recorder

use std::sync::Arc;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::{CacheOp, EntityKind, Operation};

/// Prometheus metrics handle for rendering the scrape text
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Installs a Prometheus recorder; counters are no-ops without one
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::debug!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("entity_cache_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Outcome of a read-through lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Hit,
    Miss,
    Error,
}

impl ReadOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Error => "error",
        }
    }
}

pub fn record_read(kind: EntityKind, outcome: ReadOutcome) {
    counter!(
        "entity_cache_reads_total",
        "kind" => kind.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_evictions(kind: EntityKind, operation: Operation, count: usize) {
    counter!(
        "entity_cache_evictions_total",
        "kind" => kind.as_str(),
        "operation" => operation.as_str()
    )
    .increment(count as u64);
}

pub fn record_backend_error(op: CacheOp) {
    counter!("entity_cache_backend_errors_total", "operation" => op.as_str()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_metrics_install_nothing() {
        assert!(init_metrics(&MetricsConfig { enabled: false }).is_none());
    }

    #[test]
    fn test_counters_without_recorder_are_noops() {
        record_read(EntityKind::Issue, ReadOutcome::Hit);
        record_evictions(EntityKind::Label, Operation::Delete, 4);
        record_backend_error(CacheOp::DeletePattern);
    }

    #[test]
    fn test_read_outcome_labels() {
        assert_eq!(ReadOutcome::Hit.as_str(), "hit");
        assert_eq!(ReadOutcome::Miss.as_str(), "miss");
        assert_eq!(ReadOutcome::Error.as_str(), "error");
    }
}
