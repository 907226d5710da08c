//! Metrics collection and exposition.
//!
//! # Metrics
//! - `notify_requests_total` (counter): `/notify` requests by outcome
//! - `notify_dispatch_duration_seconds` (histogram): time spent in channels
//! - `notify_channel_failures_total` (counter): failures by channel
//! - `notify_rate_limited_total` (counter): requests rejected by the limiter
//! - `notify_rate_limiter_clients` (gauge): client keys currently tracked
//!
//! Recording goes through the `metrics` facade and is a no-op unless an
//! exporter was installed with [`init_metrics`].

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a finished `/notify` request. `outcome` is a short label such as
/// `delivered`, `invalid`, `unauthorized`, `rate_limited` or `failed`.
pub fn record_request(outcome: &'static str) {
    metrics::counter!("notify_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_dispatch(start: Instant) {
    metrics::histogram!("notify_dispatch_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_channel_failure(channel: &'static str) {
    metrics::counter!("notify_channel_failures_total", "channel" => channel).increment(1);
}

pub fn record_rate_limited() {
    metrics::counter!("notify_rate_limited_total").increment(1);
}

pub fn record_tracked_clients(count: usize) {
    metrics::gauge!("notify_rate_limiter_clients").set(count as f64);
}
