//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for both services.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration shared by the input and weather services.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind addresses for each service role.
    pub listener: ListenerConfig,

    /// Where the services find each other and the external providers.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address of the input (front) service.
    pub input_address: String,

    /// Bind address of the weather (back) service.
    pub weather_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            input_address: "0.0.0.0:8080".to_string(),
            weather_address: "0.0.0.0:8081".to_string(),
        }
    }
}

/// Upstream endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the weather service, as called by the input service.
    pub weather_service_url: String,

    /// Base URL of the geocoding provider (ViaCEP).
    pub geocoding_url: String,

    /// Base URL of the weather provider (WeatherAPI).
    pub weather_url: String,

    /// Environment variable holding the weather provider key.
    /// Read on every call so a rotated key is picked up without restart.
    pub api_key_env: String,

    /// Explicit key; takes precedence over `api_key_env` when set.
    pub api_key: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            weather_service_url: "http://127.0.0.1:8081".to_string(),
            geocoding_url: "http://viacep.com.br".to_string(),
            weather_url: "http://api.weatherapi.com".to_string(),
            api_key_env: "API_KEY".to_string(),
            api_key: None,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout for outbound calls, in seconds.
    pub connect_secs: u64,

    /// Whole-request timeout enforced on inbound requests, in seconds.
    pub request_secs: u64,

    /// Upper bound on CEP + weather resolution in the weather service, in milliseconds.
    pub resolution_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
            resolution_ms: 10_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Span exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TraceExporter {
    /// Spans are created and propagated but not exported.
    #[default]
    None,
    Stdout,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Service name reported in traces. Defaults to the role name when empty.
    pub service_name: String,

    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Where finished spans go.
    pub trace_exporter: TraceExporter,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            log_level: "cep_weather=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            trace_exporter: TraceExporter::None,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
