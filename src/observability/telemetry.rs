//! Distributed tracing support.
//!
//! # Responsibilities
//! - Extract trace context from incoming requests
//! - Propagate trace context to every outbound request
//! - Own the tracer provider that backs the `tracing-opentelemetry` layer
//!
//! # Design Decisions
//! - No process-wide propagator or provider: a [`Telemetry`] value is built at
//!   startup, handed to the router state, and shut down by `main`
//! - W3C Trace Context headers (`traceparent`, `tracestate`)
//! - When no OpenTelemetry layer is installed, the extracted parent context is
//!   forwarded as-is so the trace still spans every hop

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry::trace::{TraceContextExt, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{SdkTracerProvider, Tracer};
use opentelemetry_sdk::Resource;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::config::{ObservabilityConfig, TraceExporter};

/// Tracing context shared by the handlers of one service.
#[derive(Debug, Clone)]
pub struct Telemetry {
    service_name: String,
    propagator: TraceContextPropagator,
    provider: SdkTracerProvider,
}

impl Telemetry {
    /// Build the tracer provider described by `config`.
    ///
    /// `default_name` is used when `config.service_name` is empty.
    pub fn new(config: &ObservabilityConfig, default_name: &str) -> Self {
        let service_name = if config.service_name.trim().is_empty() {
            default_name.to_string()
        } else {
            config.service_name.clone()
        };

        let resource = Resource::builder()
            .with_service_name(service_name.clone())
            .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")))
            .build();

        let builder = SdkTracerProvider::builder().with_resource(resource);
        let provider = match config.trace_exporter {
            TraceExporter::None => builder.build(),
            TraceExporter::Stdout => builder
                .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
                .build(),
        };

        Self {
            service_name,
            propagator: TraceContextPropagator::new(),
            provider,
        }
    }

    /// Telemetry that creates and propagates spans without exporting them.
    pub fn local(service_name: &str) -> Self {
        Self::new(&ObservabilityConfig::default(), service_name)
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Tracer for the `tracing-opentelemetry` layer.
    pub fn tracer(&self) -> Tracer {
        self.provider.tracer(self.service_name.clone())
    }

    /// Read the caller's trace context from inbound headers.
    pub fn extract(&self, headers: &HeaderMap) -> Context {
        self.propagator.extract(&HeaderExtractor(headers))
    }

    /// Write `cx` into outbound headers.
    pub fn inject(&self, cx: &Context, headers: &mut HeaderMap) {
        self.propagator.inject_context(cx, &mut HeaderInjector(headers));
    }

    /// Headers carrying the context an outbound call should continue.
    ///
    /// Prefers the current `tracing` span (a child of `parent` when the
    /// OpenTelemetry layer is active) and falls back to `parent`.
    pub fn outbound_headers(&self, parent: &Context) -> HeaderMap {
        let current = tracing::Span::current().context();
        let cx = if current.span().span_context().is_valid() {
            current
        } else {
            parent.clone()
        };

        let mut headers = HeaderMap::new();
        self.inject(&cx, &mut headers);
        headers
    }

    /// Flush and stop the tracer provider.
    pub fn shutdown(&self) {
        if let Err(e) = self.provider.shutdown() {
            tracing::warn!(error = %e, "Tracer provider shutdown failed");
        }
    }
}

/// Attach `parent` as the OpenTelemetry parent of `span`.
///
/// Must run before `span` is first entered; later calls are rejected by the
/// OpenTelemetry layer and the span keeps its own root trace.
pub fn set_parent(span: &tracing::Span, parent: Context) {
    if let Err(e) = span.set_parent(parent) {
        tracing::debug!(error = ?e, "Failed to attach inbound trace context");
    }
}

/// Reads W3C headers from an HTTP header map.
struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Writes W3C headers into an HTTP header map.
struct HeaderInjector<'a>(&'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        let name = match HeaderName::from_bytes(key.as_bytes()) {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!("Failed to create header name for trace injection: {:?}", e);
                return;
            }
        };
        let val = match HeaderValue::from_str(&value) {
            Ok(val) => val,
            Err(e) => {
                tracing::debug!("Failed to create header value for trace injection: {:?}", e);
                return;
            }
        };
        self.0.insert(name, val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    #[test]
    fn test_extract_then_inject_preserves_trace() {
        let telemetry = Telemetry::local("test");
        let mut inbound = HeaderMap::new();
        inbound.insert("traceparent", HeaderValue::from_static(TRACEPARENT));

        let cx = telemetry.extract(&inbound);
        assert!(cx.span().span_context().is_valid());

        let outbound = telemetry.outbound_headers(&cx);
        assert_eq!(outbound.get("traceparent").unwrap(), TRACEPARENT);
    }

    #[test]
    fn test_missing_headers_yield_empty_context() {
        let telemetry = Telemetry::local("test");
        let cx = telemetry.extract(&HeaderMap::new());
        assert!(!cx.span().span_context().is_valid());

        let outbound = telemetry.outbound_headers(&cx);
        assert!(outbound.get("traceparent").is_none());
    }

    #[test]
    fn test_malformed_traceparent_is_ignored() {
        let telemetry = Telemetry::local("test");
        let mut inbound = HeaderMap::new();
        inbound.insert("traceparent", HeaderValue::from_static("garbage"));
        assert!(!telemetry.extract(&inbound).span().span_context().is_valid());
    }

    #[test]
    fn test_service_name_fallback() {
        let telemetry = Telemetry::local("weather");
        assert_eq!(telemetry.service_name(), "weather");

        let config = ObservabilityConfig {
            service_name: "servicob".into(),
            ..ObservabilityConfig::default()
        };
        assert_eq!(Telemetry::new(&config, "weather").service_name(), "servicob");
    }
}
