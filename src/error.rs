//! Request-scoped error taxonomy.
//!
//! Every resolution stage returns an [`Outcome`]: the success payload, or a
//! [`Failure`] carrying the outward HTTP status, the message written to the
//! caller, and the typed cause that produced it.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use axum::http::StatusCode;

/// An upstream collaborator the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// CEP → address lookup (ViaCEP).
    Geocoding,
    /// City → current conditions (WeatherAPI).
    Weather,
    /// The back service, as seen from the front service.
    WeatherService,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Geocoding => "geocoding",
            Provider::Weather => "weather",
            Provider::WeatherService => "weather-service",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a request failed.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{provider} could not find the requested resource")]
    UpstreamNotFound { provider: Provider },

    #[error("{provider} timed out")]
    UpstreamTimeout { provider: Provider },

    #[error("{provider} is unavailable")]
    UpstreamUnavailable { provider: Provider },

    #[error("{provider} reported an internal error")]
    UpstreamInternalError { provider: Provider },

    #[error("{provider} rejected the request with status {status}")]
    UpstreamRejected { provider: Provider, status: u16 },

    #[error("unknown error: {provider} answered with status {status}")]
    UpstreamUnknownStatus { provider: Provider, status: u16 },

    #[error("resolution did not finish within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("failed to reach {provider}: {source}")]
    Transport {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode {provider} payload: {reason}")]
    Decode { provider: Provider, reason: String },
}

/// A terminal failure: outward status, outward message, and cause.
#[derive(Debug)]
pub struct Failure {
    pub status: StatusCode,
    pub message: Cow<'static, str>,
    pub cause: GatewayError,
}

impl Failure {
    pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>, cause: GatewayError) -> Self {
        Self {
            status,
            message: message.into(),
            cause,
        }
    }

    /// Failure whose message is the status' canonical reason phrase.
    pub fn canonical(status: StatusCode, cause: GatewayError) -> Self {
        let message = status.canonical_reason().unwrap_or("Unknown Status");
        Self::new(status, message, cause)
    }

    pub fn internal(cause: GatewayError) -> Self {
        Self::canonical(StatusCode::INTERNAL_SERVER_ERROR, cause)
    }

    pub fn transport(provider: Provider, source: reqwest::Error) -> Self {
        Self::internal(GatewayError::Transport { provider, source })
    }

    pub fn decode(provider: Provider, reason: impl Into<String>) -> Self {
        Self::internal(GatewayError::Decode {
            provider,
            reason: reason.into(),
        })
    }

    pub fn deadline(limit: Duration) -> Self {
        Self::canonical(StatusCode::REQUEST_TIMEOUT, GatewayError::DeadlineExceeded(limit))
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status.as_u16(), self.message, self.cause)
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Result of a resolution stage.
pub type Outcome<T> = Result<T, Failure>;
