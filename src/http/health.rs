//! `GET /health`, served by both roles.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::observability::Telemetry;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: String,
    pub version: &'static str,
}

pub async fn health(State(telemetry): State<Telemetry>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        service: telemetry.service_name().to_string(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
