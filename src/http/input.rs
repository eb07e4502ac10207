//! Front service: `POST /cep`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::domain::ZipcodeRequest;
use crate::error::Failure;
use crate::http::request::RequestIdExt;
use crate::http::server::InputState;

/// Body written for any request that is not a JSON object with an 8-digit `cep`.
pub const INVALID_ZIPCODE: &str = "invalid zipcode";

/// Validate the zipcode and relay the weather service's answer.
pub async fn submit_cep(State(state): State<InputState>, headers: HeaderMap, body: Bytes) -> Response {
    let request_id = headers.request_id().to_string();
    let parent = state.telemetry.extract(&headers);

    let request = match ZipcodeRequest::from_body(&body) {
        Ok(request) => request,
        Err(cause) => {
            tracing::info!(request_id = %request_id, cause = %cause, "Zipcode rejected");
            return Failure::new(StatusCode::UNPROCESSABLE_ENTITY, INVALID_ZIPCODE, cause).into_response();
        }
    };

    match state
        .weather_service
        .forward(&parent, &request_id, &request.cep)
        .await
    {
        Ok(relayed) => {
            tracing::info!(
                request_id = %request_id,
                cep = %request.cep,
                status = relayed.status.as_u16(),
                "Weather service answered"
            );
            relayed.into_response()
        }
        Err(failure) => {
            tracing::error!(
                request_id = %request_id,
                cep = %request.cep,
                cause = %failure.cause,
                "Weather service request failed"
            );
            failure.into_response()
        }
    }
}
