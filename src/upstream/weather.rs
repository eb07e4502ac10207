//! City → current temperature lookups against WeatherAPI.

use std::time::Instant;

use axum::http::StatusCode;
use opentelemetry::Context;
use serde::Deserialize;
use tracing::Instrument;
use url::Url;

use crate::config::UpstreamConfig;
use crate::domain::TemperatureReading;
use crate::error::{Failure, Outcome, Provider};
use crate::observability::{metrics, Telemetry};
use crate::upstream::status::failure_for;
use crate::upstream::{base_url, SetupError};

/// Where the API key comes from.
#[derive(Debug, Clone)]
enum ApiKey {
    Inline(String),
    Env(String),
}

impl ApiKey {
    fn value(&self) -> String {
        match self {
            ApiKey::Inline(key) => key.clone(),
            ApiKey::Env(var) => std::env::var(var).unwrap_or_else(|_| {
                tracing::warn!(env = %var, "Weather API key variable is not set");
                String::new()
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
}

/// Client for `GET /v1/current.json`.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: ApiKey,
    telemetry: Telemetry,
}

impl WeatherClient {
    pub fn new(http: reqwest::Client, config: &UpstreamConfig, telemetry: Telemetry) -> Result<Self, SetupError> {
        let api_key = match &config.api_key {
            Some(key) => ApiKey::Inline(key.clone()),
            None => ApiKey::Env(config.api_key_env.clone()),
        };
        Ok(Self {
            http,
            base_url: base_url(&config.weather_url)?,
            api_key,
            telemetry,
        })
    }

    /// Build the lookup URL; `city` is query-escaped.
    pub fn current_url(&self, key: &str, city: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["v1", "current.json"]);
        }
        url.query_pairs_mut()
            .append_pair("key", key)
            .append_pair("q", city)
            .append_pair("aqi", "no");
        url
    }

    /// Current temperature for `city`, continuing the trace in `parent`.
    pub async fn current(&self, parent: &Context, city: &str) -> Outcome<TemperatureReading> {
        let span = tracing::info_span!(
            "weather_request",
            otel.kind = "client",
            city = %city,
            http.status_code = tracing::field::Empty,
        );
        self.fetch(parent, city).instrument(span).await
    }

    async fn fetch(&self, parent: &Context, city: &str) -> Outcome<TemperatureReading> {
        let url = self.current_url(&self.api_key.value(), city);
        let headers = self.telemetry.outbound_headers(parent);
        let start = Instant::now();

        let response = match self.http.get(url).headers(headers).send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream(Provider::Weather, None, start);
                // reqwest errors carry the URL, which carries the key.
                let e = e.without_url();
                tracing::warn!(error = %e, "Weather provider unreachable");
                return Err(Failure::transport(Provider::Weather, e));
            }
        };

        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());
        let body = response.text().await;
        metrics::record_upstream(Provider::Weather, Some(status.as_u16()), start);
        let body = body.map_err(|e| {
            let e = e.without_url();
            tracing::warn!(error = %e, "Weather response body unreadable");
            Failure::transport(Provider::Weather, e)
        })?;

        let outcome = interpret(status, &body);
        match &outcome {
            Ok(reading) => tracing::info!(
                city = %reading.city,
                temp_c = reading.temp_c,
                "Temperature resolved"
            ),
            Err(failure) => tracing::warn!(
                upstream_status = status.as_u16(),
                status = failure.status.as_u16(),
                cause = %failure.cause,
                "Weather lookup failed"
            ),
        }
        outcome
    }
}

/// Turn a weather response into an outcome.
pub fn interpret(status: StatusCode, body: &str) -> Outcome<TemperatureReading> {
    if status != StatusCode::OK {
        return Err(failure_for(Provider::Weather, status));
    }
    let payload: WaResponse =
        serde_json::from_str(body).map_err(|e| Failure::decode(Provider::Weather, e.to_string()))?;
    Ok(TemperatureReading::from_celsius(
        payload.location.name,
        payload.current.temp_c,
    ))
}
