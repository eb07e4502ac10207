//! Outcome → HTTP response translation.
//!
//! # Responsibilities
//! - Failures become their status with the message as a plain-text body
//! - Successes become `200 OK` with a JSON body
//! - Relayed back-service answers keep their status, content type and body
//!
//! # Design Decisions
//! - Statuses are written verbatim; no remapping happens at this layer

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{Failure, Outcome};
use crate::upstream::Relayed;

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.status, self.message.into_owned()).into_response()
    }
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        response
    }
}

/// Translate a terminal outcome into the response written to the caller.
pub fn translate<T: Serialize>(outcome: Outcome<T>) -> Response {
    match outcome {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(failure) => failure.into_response(),
    }
}
