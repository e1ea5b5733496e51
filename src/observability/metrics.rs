//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gopkg_requests_total` (counter): requests by package and outcome
//! - `gopkg_request_duration_seconds` (histogram): handler latency
//! - `gopkg_packages` (gauge): packages in the active routing table
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels limited to package path and outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::http::response::Outcome;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(package: &str, outcome: Outcome, start: Instant) {
    metrics::counter!(
        "gopkg_requests_total",
        "package" => package.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
    metrics::histogram!("gopkg_request_duration_seconds", "outcome" => outcome.as_str())
        .record(start.elapsed().as_secs_f64());
}

/// Record the size of the active routing table.
pub fn record_packages(count: usize) {
    metrics::gauge!("gopkg_packages").set(count as f64);
}
