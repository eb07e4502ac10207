//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cep_requests_total` (counter): inbound requests by service, status
//! - `cep_request_duration_seconds` (histogram): inbound latency by service
//! - `cep_upstream_requests_total` (counter): outbound calls by provider, status
//! - `cep_upstream_duration_seconds` (histogram): outbound latency by provider
//!
//! Without an installed recorder the macros are no-ops.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::error::Provider;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished inbound request.
pub fn record_request(service: &'static str, status: u16, start: Instant) {
    metrics::counter!("cep_requests_total", "service" => service, "status" => status.to_string())
        .increment(1);
    metrics::histogram!("cep_request_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Record a finished outbound call. `status` is `None` when no response arrived.
pub fn record_upstream(provider: Provider, status: Option<u16>, start: Instant) {
    let status = status.map_or_else(|| "transport_error".to_string(), |s| s.to_string());
    metrics::counter!(
        "cep_upstream_requests_total",
        "provider" => provider.as_str(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("cep_upstream_duration_seconds", "provider" => provider.as_str())
        .record(start.elapsed().as_secs_f64());
}
