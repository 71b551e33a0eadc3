//! Metrics collection for ebook-service.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Call once from `main`.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("metrics recorder already initialized"))
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count one `/send-ebook` request by eBook type and outcome.
///
/// `ebook_type` must already be a catalog key or `unknown`; raw request input
/// is never used as a label value.
pub fn record_ebook_request(ebook_type: &str, outcome: &'static str) {
    metrics::counter!(
        "ebook_requests_total",
        "ebook_type" => ebook_type.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
