//! Prometheus metrics
//!
//! The recorder is installed once per process; recording before (or
//! without) installation is a no-op.

use std::time::Duration;

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use rectifai_core::{CorrectionSource, ProviderKind};

pub const CORRECTIONS_TOTAL: &str = "rectifai_corrections_total";
pub const PROVIDER_FAILURES_TOTAL: &str = "rectifai_provider_failures_total";
pub const PERSISTENCE_FAILURES_TOTAL: &str = "rectifai_persistence_failures_total";
pub const CORRECTION_LATENCY: &str = "rectifai_correction_latency_seconds";

const LATENCY_BUCKETS: &[f64] = &[0.005, 0.05, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0];

static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder (idempotent)
pub fn init_metrics() -> Option<PrometheusHandle> {
    PROMETHEUS
        .get_or_try_init(|| {
            PrometheusBuilder::new()
                .set_buckets_for_metric(
                    Matcher::Full(CORRECTION_LATENCY.to_string()),
                    LATENCY_BUCKETS,
                )?
                .install_recorder()
        })
        .map_err(|e| tracing::warn!(error = %e, "Failed to install Prometheus recorder"))
        .ok()
        .cloned()
}

/// `GET /metrics`
pub async fn metrics_handler() -> impl IntoResponse {
    match PROMETHEUS.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "metrics disabled\n".to_string(),
        ),
    }
}

pub fn record_correction(source: CorrectionSource, elapsed: Duration) {
    metrics::counter!(CORRECTIONS_TOTAL, "source" => source.as_str()).increment(1);
    metrics::histogram!(CORRECTION_LATENCY, "source" => source.as_str())
        .record(elapsed.as_secs_f64());
}

pub fn record_provider_failure(provider: ProviderKind) {
    metrics::counter!(PROVIDER_FAILURES_TOTAL, "provider" => provider.as_str()).increment(1);
}

pub fn record_persistence_failure(step: &'static str) {
    metrics::counter!(PERSISTENCE_FAILURES_TOTAL, "step" => step).increment(1);
}
