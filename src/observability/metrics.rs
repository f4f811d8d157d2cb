//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mock_requests_total` (counter): requests by method, status, route kind
//! - `mock_request_duration_seconds` (histogram): handling time by route kind
//! - `mock_rate_limited_total` (counter): 429s by path
//! - `mock_auth_rejected_total` (counter): 401s by path
//! - `mock_routes_loaded` (gauge): registered routes

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, kind: &'static str, start_time: Instant) {
    ::metrics::counter!(
        "mock_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "kind" => kind
    )
    .increment(1);
    ::metrics::histogram!("mock_request_duration_seconds", "kind" => kind)
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_rate_limited(path: &str) {
    ::metrics::counter!("mock_rate_limited_total", "path" => path.to_string()).increment(1);
}

pub fn record_auth_rejected(path: &str) {
    ::metrics::counter!("mock_auth_rejected_total", "path" => path.to_string()).increment(1);
}

pub fn set_routes_loaded(count: usize) {
    ::metrics::gauge!("mock_routes_loaded").set(count as f64);
}
