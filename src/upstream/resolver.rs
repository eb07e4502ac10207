//! The geocoding → weather chain behind `GET /?cep=`.

use std::time::Duration;

use axum::http::StatusCode;
use opentelemetry::Context;

use crate::config::GatewayConfig;
use crate::domain::cep::{self, CepFormat};
use crate::domain::TemperatureReading;
use crate::error::{Failure, Outcome};
use crate::observability::Telemetry;
use crate::resilience::with_deadline;
use crate::upstream::{GeocodingClient, SetupError, WeatherClient};

#[derive(Debug, Clone)]
pub struct WeatherResolver {
    geocoding: GeocodingClient,
    weather: WeatherClient,
    deadline: Duration,
}

impl WeatherResolver {
    pub fn new(geocoding: GeocodingClient, weather: WeatherClient, deadline: Duration) -> Self {
        Self {
            geocoding,
            weather,
            deadline,
        }
    }

    /// Build both provider clients over one shared connection pool.
    pub fn from_config(
        config: &GatewayConfig,
        http: reqwest::Client,
        telemetry: Telemetry,
    ) -> Result<Self, SetupError> {
        let geocoding = GeocodingClient::new(http.clone(), &config.upstream.geocoding_url, telemetry.clone())?;
        let weather = WeatherClient::new(http, &config.upstream, telemetry)?;
        Ok(Self::new(
            geocoding,
            weather,
            Duration::from_millis(config.timeouts.resolution_ms),
        ))
    }

    /// Resolve `cep` (with or without the dash) to the current temperature
    /// of its city.
    ///
    /// The whole chain runs under one deadline; on expiry every in-flight
    /// provider call is dropped and the outcome is `408 Request Timeout`.
    pub async fn resolve_weather(&self, parent: &Context, cep: &str) -> Outcome<TemperatureReading> {
        if let Err(cause) = cep::validate(cep, CepFormat::Flexible) {
            return Err(Failure::canonical(StatusCode::UNPROCESSABLE_ENTITY, cause));
        }
        let cep = cep::normalize(cep);
        with_deadline(self.deadline, self.chain(parent, &cep)).await
    }

    async fn chain(&self, parent: &Context, cep: &str) -> Outcome<TemperatureReading> {
        let address = self.geocoding.resolve(parent, cep).await?;
        self.weather.current(parent, &address.city).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> WeatherResolver {
        let mut config = GatewayConfig::default();
        // Nothing listens here; validation must fail before any call.
        config.upstream.geocoding_url = "http://127.0.0.1:9".into();
        config.upstream.weather_url = "http://127.0.0.1:9".into();
        config.upstream.api_key = Some("k".into());
        WeatherResolver::from_config(&config, reqwest::Client::new(), Telemetry::local("test")).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_cep_rejected_without_calls() {
        let resolver = resolver();
        for bad in ["", "3940807", "39408-07", "abcdefgh", "394080780"] {
            let failure = resolver
                .resolve_weather(&Context::new(), bad)
                .await
                .unwrap_err();
            assert_eq!(failure.status, StatusCode::UNPROCESSABLE_ENTITY, "{bad:?}");
            assert_eq!(failure.message, "Unprocessable Entity");
        }
    }

    #[test]
    fn test_deadline_from_config() {
        assert_eq!(resolver().deadline, Duration::from_millis(10_000));
    }
}
