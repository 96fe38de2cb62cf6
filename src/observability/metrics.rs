//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by route, status
//! - `router_request_duration_seconds` (histogram): latency by route
//! - `router_upstream_errors_total` (counter): failed upstream fetches by kind
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "router_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("router_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream failure.
pub fn record_upstream_error(kind: &'static str) {
    metrics::counter!("router_upstream_errors_total", "kind" => kind).increment(1);
}
