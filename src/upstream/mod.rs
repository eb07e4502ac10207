//! Outbound calls: the service-to-service hop and the external providers.
//!
//! # Data Flow
//! ```text
//! Front service:
//!     weather_service.rs (relay to the back service)
//!
//! Back service:
//!     resolver.rs (validate, normalize, deadline)
//!     → geocoding.rs (CEP → address)
//!     → weather.rs (city → temperature)
//!     → status.rs (provider status → Failure, per provider table)
//! ```
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` per process, shared by every client
//! - Response interpretation is a pure function per provider, separate from I/O
//! - Every outbound call carries the caller's trace context

pub mod geocoding;
pub mod resolver;
pub mod status;
pub mod weather;
pub mod weather_service;

use std::time::Duration;

use url::Url;

use crate::config::TimeoutConfig;

pub use geocoding::GeocodingClient;
pub use resolver::WeatherResolver;
pub use weather::WeatherClient;
pub use weather_service::{Relayed, WeatherServiceClient};

/// Errors building upstream clients at startup.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid base url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Build the process-wide outbound client.
pub fn build_http_client(timeouts: &TimeoutConfig) -> Result<reqwest::Client, SetupError> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .user_agent(concat!("cep-weather/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

pub(crate) fn base_url(raw: &str) -> Result<Url, SetupError> {
    let url = Url::parse(raw).map_err(|e| SetupError::BaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(SetupError::BaseUrl {
            url: raw.to_string(),
            reason: "cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

/// Helpers for exercising the clients against misbehaving upstreams.
#[cfg(test)]
pub(crate) mod test_support {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one response whose body stops short of its `Content-Length`.
    pub async fn truncated_body_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let _ = stream
                    .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort")
                    .await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    /// Whether `rendered` has an upstream counter for `provider` and `status`.
    pub fn has_upstream_count(rendered: &str, provider: &str, status: &str) -> bool {
        let provider = format!("provider=\"{}\"", provider);
        let status = format!("status=\"{}\"", status);
        rendered.lines().any(|line| {
            line.starts_with("cep_upstream_requests_total{")
                && line.contains(&provider)
                && line.contains(&status)
        })
    }
}
