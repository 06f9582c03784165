//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_admin_requests_total` (counter): requests by method, route, status
//! - `proxy_admin_request_duration_seconds` (histogram): latency by method, route
//! - `proxy_admin_site_operations_total` (counter): list/read/write by outcome
//! - `proxy_admin_reloads_total` (counter): reload attempts by outcome
//! - `proxy_admin_reload_duration_seconds` (histogram): reload command runtime
//!
//! Without an installed recorder every call is a no-op.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    metrics::counter!(
        "proxy_admin_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "proxy_admin_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(elapsed);
}

pub fn record_site_operation(operation: &'static str, success: bool) {
    metrics::counter!(
        "proxy_admin_site_operations_total",
        "operation" => operation,
        "outcome" => outcome(success)
    )
    .increment(1);
}

pub fn record_reload(success: bool, elapsed: Duration) {
    metrics::counter!("proxy_admin_reloads_total", "outcome" => outcome(success)).increment(1);
    metrics::histogram!("proxy_admin_reload_duration_seconds").record(elapsed.as_secs_f64());
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// Middleware recording per-route request counts and latency.
///
/// Labels use the matched route template so file names never become labels.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &path, response.status().as_u16(), start);
    response
}
