//! Back service: `GET /?cep=`.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::{Failure, GatewayError};
use crate::http::request::RequestIdExt;
use crate::http::response::translate;
use crate::http::server::WeatherState;

#[derive(Debug, Deserialize)]
pub struct CepQuery {
    #[serde(default)]
    pub cep: String,
}

/// Resolve the CEP in the query string to its city's temperature.
pub async fn weather_by_cep(
    State(state): State<WeatherState>,
    headers: HeaderMap,
    query: Result<Query<CepQuery>, QueryRejection>,
) -> Response {
    let request_id = headers.request_id().to_string();
    let parent = state.telemetry.extract(&headers);

    let cep = match query {
        Ok(Query(query)) => query.cep,
        Err(rejection) => {
            let cause = GatewayError::InvalidInput(rejection.body_text());
            return Failure::canonical(StatusCode::UNPROCESSABLE_ENTITY, cause).into_response();
        }
    };

    let outcome = state.resolver.resolve_weather(&parent, &cep).await;
    match &outcome {
        Ok(reading) => tracing::info!(
            request_id = %request_id,
            cep = %cep,
            city = %reading.city,
            temp_c = reading.temp_c,
            "Weather resolved"
        ),
        Err(failure) => tracing::warn!(
            request_id = %request_id,
            cep = %cep,
            status = failure.status.as_u16(),
            cause = %failure.cause,
            "Weather resolution failed"
        ),
    }
    translate(outcome)
}
