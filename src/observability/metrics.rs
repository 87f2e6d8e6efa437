//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gomod_proxy_requests_total` (counter): dispatches by kind, outcome
//! - `gomod_proxy_request_duration_seconds` (histogram): dispatch latency by kind
//! - `gomod_proxy_upstream_responses_total` (counter): upstream responses by status
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished dispatch.
pub fn record_dispatch(kind: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "gomod_proxy_requests_total",
        "kind" => kind,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("gomod_proxy_request_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}

/// Record the status of an upstream response.
pub fn record_upstream_status(status: u16) {
    metrics::counter!("gomod_proxy_upstream_responses_total", "status" => status.to_string())
        .increment(1);
}
