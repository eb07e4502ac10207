//! Front service → back service hop.

use std::time::Instant;

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use opentelemetry::Context;
use tracing::Instrument;
use url::Url;

use crate::error::{Failure, Outcome, Provider};
use crate::http::request::X_REQUEST_ID;
use crate::observability::{metrics, Telemetry};
use crate::upstream::{base_url, SetupError};

/// The back service's answer, kept byte-for-byte.
#[derive(Debug, Clone)]
pub struct Relayed {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Client for the weather service's `GET /?cep=`.
#[derive(Debug, Clone)]
pub struct WeatherServiceClient {
    http: reqwest::Client,
    base_url: Url,
    telemetry: Telemetry,
}

impl WeatherServiceClient {
    pub fn new(http: reqwest::Client, base: &str, telemetry: Telemetry) -> Result<Self, SetupError> {
        Ok(Self {
            http,
            base_url: base_url(base)?,
            telemetry,
        })
    }

    pub fn lookup_url(&self, cep: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("");
        }
        url.query_pairs_mut().append_pair("cep", cep);
        url
    }

    /// Ask the weather service about `cep` and hand back whatever it said.
    ///
    /// Only a failure to get an answer at all is a [`Failure`]; every status
    /// the weather service returns is relayed.
    pub async fn forward(&self, parent: &Context, request_id: &str, cep: &str) -> Outcome<Relayed> {
        let span = tracing::info_span!(
            "weather_service_request",
            otel.kind = "client",
            request_id = %request_id,
            cep = %cep,
            http.status_code = tracing::field::Empty,
        );
        self.fetch(parent, request_id, cep).instrument(span).await
    }

    async fn fetch(&self, parent: &Context, request_id: &str, cep: &str) -> Outcome<Relayed> {
        let url = self.lookup_url(cep);
        let mut headers = self.telemetry.outbound_headers(parent);
        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert(X_REQUEST_ID, value);
        }
        let start = Instant::now();

        let response = match self.http.get(url).headers(headers).send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream(Provider::WeatherService, None, start);
                tracing::error!(error = %e, "Weather service unreachable");
                return Err(Failure::transport(Provider::WeatherService, e));
            }
        };

        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await;
        metrics::record_upstream(Provider::WeatherService, Some(status.as_u16()), start);
        let body = body.map_err(|e| {
            tracing::error!(error = %e, "Weather service response body unreadable");
            Failure::transport(Provider::WeatherService, e)
        })?;

        Ok(Relayed {
            status,
            content_type,
            body,
        })
    }
}
