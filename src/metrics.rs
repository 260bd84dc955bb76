use axum::{routing::get, Router};
use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::drift::SeverityCounts;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder.
    pub fn init() -> Self {
        // Use default buckets to avoid API differences across crate versions.
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Record the score from the latest assessment (absolute, no smoothing).
pub fn record_quality_score(score: f64) {
    gauge!("sentinel_quality_score").set(score);
}

/// Bump per-severity counters for a summarized drift batch.
pub fn record_drift_batch(counts: &SeverityCounts) {
    counter!("sentinel_drift_events_total", "severity" => "high").increment(counts.high as u64);
    counter!("sentinel_drift_events_total", "severity" => "medium").increment(counts.medium as u64);
    counter!("sentinel_drift_events_total", "severity" => "low").increment(counts.low as u64);
}
