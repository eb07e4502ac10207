//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check upstream URLs are absolute http(s) URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a loaded configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("listener.input_address", &config.listener.input_address),
        ("listener.weather_address", &config.listener.weather_address),
    ] {
        if value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::new(field, format!("{value:?} is not a socket address")));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", config.observability.metrics_address),
        ));
    }

    for (field, value) in [
        ("upstream.weather_service_url", &config.upstream.weather_service_url),
        ("upstream.geocoding_url", &config.upstream.geocoding_url),
        ("upstream.weather_url", &config.upstream.weather_url),
    ] {
        if let Err(message) = check_base_url(value) {
            errors.push(ValidationError::new(field, message));
        }
    }

    if config.upstream.api_key.is_none() && config.upstream.api_key_env.trim().is_empty() {
        errors.push(ValidationError::new(
            "upstream.api_key_env",
            "must name an environment variable when api_key is not set",
        ));
    }

    for (field, value) in [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.resolution_ms", config.timeouts.resolution_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| format!("{value:?} is not a URL: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("{value:?} must use http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(format!("{value:?} cannot be used as a base URL"));
    }
    Ok(())
}
