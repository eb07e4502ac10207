//! Provider status → outward failure mapping.
//!
//! Each provider has a table of explicit entries plus a default entry, so
//! every status code maps to exactly one failure.

use axum::http::StatusCode;

use crate::error::{Failure, GatewayError, Provider};

/// What kind of upstream failure a status code represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    NotFound,
    Timeout,
    Unavailable,
    Internal,
    Rejected,
    Unknown,
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    upstream: u16,
    outward: StatusCode,
    kind: Kind,
}

const fn rule(upstream: u16, outward: StatusCode, kind: Kind) -> Rule {
    Rule { upstream, outward, kind }
}

struct Table {
    rules: &'static [Rule],
    default: (StatusCode, Kind),
}

static GEOCODING: Table = Table {
    rules: &[
        rule(408, StatusCode::REQUEST_TIMEOUT, Kind::Timeout),
        rule(404, StatusCode::NOT_FOUND, Kind::NotFound),
        // Provider's "bad request" means the CEP itself is invalid.
        rule(400, StatusCode::UNPROCESSABLE_ENTITY, Kind::Rejected),
        rule(500, StatusCode::INTERNAL_SERVER_ERROR, Kind::Internal),
        rule(503, StatusCode::SERVICE_UNAVAILABLE, Kind::Unavailable),
    ],
    default: (StatusCode::NOT_FOUND, Kind::Unknown),
};

static WEATHER: Table = Table {
    rules: &[
        rule(408, StatusCode::REQUEST_TIMEOUT, Kind::Timeout),
        rule(404, StatusCode::NOT_FOUND, Kind::NotFound),
        rule(400, StatusCode::BAD_REQUEST, Kind::Rejected),
        rule(422, StatusCode::UNPROCESSABLE_ENTITY, Kind::Rejected),
        rule(500, StatusCode::INTERNAL_SERVER_ERROR, Kind::Internal),
        rule(503, StatusCode::SERVICE_UNAVAILABLE, Kind::Unavailable),
    ],
    default: (StatusCode::INTERNAL_SERVER_ERROR, Kind::Unknown),
};

// The back service already speaks the outward vocabulary.
static WEATHER_SERVICE: Table = Table {
    rules: &[],
    default: (StatusCode::INTERNAL_SERVER_ERROR, Kind::Unknown),
};

fn table(provider: Provider) -> &'static Table {
    match provider {
        Provider::Geocoding => &GEOCODING,
        Provider::Weather => &WEATHER,
        Provider::WeatherService => &WEATHER_SERVICE,
    }
}

/// Map a non-200 provider status to the failure the caller sees.
pub fn failure_for(provider: Provider, upstream: StatusCode) -> Failure {
    let code = upstream.as_u16();
    let table = table(provider);
    let (outward, kind) = table
        .rules
        .iter()
        .find(|r| r.upstream == code)
        .map(|r| (r.outward, r.kind))
        .unwrap_or(table.default);

    let cause = match kind {
        Kind::NotFound => GatewayError::UpstreamNotFound { provider },
        Kind::Timeout => GatewayError::UpstreamTimeout { provider },
        Kind::Unavailable => GatewayError::UpstreamUnavailable { provider },
        Kind::Internal => GatewayError::UpstreamInternalError { provider },
        Kind::Rejected => GatewayError::UpstreamRejected { provider, status: code },
        Kind::Unknown => GatewayError::UpstreamUnknownStatus { provider, status: code },
    };
    Failure::canonical(outward, cause)
}
