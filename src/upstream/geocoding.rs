//! CEP → address lookups against ViaCEP.

use std::time::Instant;

use axum::http::StatusCode;
use opentelemetry::Context;
use tracing::Instrument;
use url::Url;

use crate::domain::address::{is_not_found_marker, ResolvedAddress, ViaCepRecord};
use crate::error::{Failure, GatewayError, Outcome, Provider};
use crate::observability::{metrics, Telemetry};
use crate::upstream::status::failure_for;
use crate::upstream::{base_url, SetupError};

/// Client for `GET /ws/{cep}/json/`.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: reqwest::Client,
    base_url: Url,
    telemetry: Telemetry,
}

impl GeocodingClient {
    pub fn new(http: reqwest::Client, base: &str, telemetry: Telemetry) -> Result<Self, SetupError> {
        Ok(Self {
            http,
            base_url: base_url(base)?,
            telemetry,
        })
    }

    /// `cep` must already be 8 bare digits.
    pub fn lookup_url(&self, cep: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["ws", cep, "json", ""]);
        }
        url
    }

    /// Resolve `cep` to an address, continuing the trace in `parent`.
    pub async fn resolve(&self, parent: &Context, cep: &str) -> Outcome<ResolvedAddress> {
        let span = tracing::info_span!(
            "geocoding_request",
            otel.kind = "client",
            cep = %cep,
            http.status_code = tracing::field::Empty,
        );
        self.fetch(parent, cep).instrument(span).await
    }

    async fn fetch(&self, parent: &Context, cep: &str) -> Outcome<ResolvedAddress> {
        let url = self.lookup_url(cep);
        let headers = self.telemetry.outbound_headers(parent);
        let start = Instant::now();

        let response = match self.http.get(url).headers(headers).send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream(Provider::Geocoding, None, start);
                tracing::warn!(error = %e, "Geocoding provider unreachable");
                return Err(Failure::transport(Provider::Geocoding, e));
            }
        };

        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());
        let body = response.text().await;
        metrics::record_upstream(Provider::Geocoding, Some(status.as_u16()), start);
        let body = body.map_err(|e| {
            tracing::warn!(error = %e, "Geocoding response body unreadable");
            Failure::transport(Provider::Geocoding, e)
        })?;

        let outcome = interpret(status, &body);
        match &outcome {
            Ok(address) => tracing::info!(
                cep = %address.cep,
                street = %address.street,
                neighborhood = %address.neighborhood,
                city = %address.city,
                state = %address.state,
                "CEP resolved"
            ),
            Err(failure) => tracing::warn!(
                upstream_status = status.as_u16(),
                status = failure.status.as_u16(),
                cause = %failure.cause,
                "CEP lookup failed"
            ),
        }
        outcome
    }
}

/// Turn a geocoding response into an outcome.
///
/// The provider answers unknown CEPs with `200 OK` and an in-body marker, so
/// the body is checked for it before any attempt to parse a record.
pub fn interpret(status: StatusCode, body: &str) -> Outcome<ResolvedAddress> {
    if status != StatusCode::OK {
        return Err(failure_for(Provider::Geocoding, status));
    }
    if is_not_found_marker(body) {
        return Err(Failure::canonical(
            StatusCode::NOT_FOUND,
            GatewayError::UpstreamNotFound {
                provider: Provider::Geocoding,
            },
        ));
    }
    let record = ViaCepRecord::from_json(body)
        .map_err(|e| Failure::decode(Provider::Geocoding, e.to_string()))?;
    Ok(record.into())
}
