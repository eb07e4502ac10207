//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for a service role
//! - Wire up middleware (request id, tracing, timeout, metrics)
//! - Bind server to listener and shut down gracefully

use std::time::{Duration, Instant};

use axum::extract::{FromRef, Request, State};
use axum::http::Request as HttpRequest;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::Span;

use crate::config::{GatewayConfig, ListenerConfig};
use crate::http::request::{RequestIdExt, UuidRequestId};
use crate::http::{health, input, weather};
use crate::lifecycle::ShutdownSignal;
use crate::observability::telemetry::set_parent;
use crate::observability::{metrics, Telemetry};
use crate::upstream::{build_http_client, SetupError, WeatherResolver, WeatherServiceClient};

/// Which of the two services this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRole {
    /// Front service: validates zipcodes and relays to the weather service.
    Input,
    /// Back service: resolves a CEP to its city's temperature.
    Weather,
}

impl ServiceRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceRole::Input => "input",
            ServiceRole::Weather => "weather",
        }
    }

    pub fn bind_address<'a>(&self, listener: &'a ListenerConfig) -> &'a str {
        match self {
            ServiceRole::Input => &listener.input_address,
            ServiceRole::Weather => &listener.weather_address,
        }
    }

    pub fn address_field(&self) -> &'static str {
        match self {
            ServiceRole::Input => "listener.input_address",
            ServiceRole::Weather => "listener.weather_address",
        }
    }
}

/// State for the input service's handlers.
#[derive(Debug, Clone)]
pub struct InputState {
    pub telemetry: Telemetry,
    pub weather_service: WeatherServiceClient,
}

/// State for the weather service's handlers.
#[derive(Debug, Clone)]
pub struct WeatherState {
    pub telemetry: Telemetry,
    pub resolver: WeatherResolver,
}

impl FromRef<InputState> for Telemetry {
    fn from_ref(state: &InputState) -> Self {
        state.telemetry.clone()
    }
}

impl FromRef<WeatherState> for Telemetry {
    fn from_ref(state: &WeatherState) -> Self {
        state.telemetry.clone()
    }
}

/// One service role's HTTP server.
pub struct HttpServer {
    role: ServiceRole,
    router: Router,
}

impl HttpServer {
    pub fn new(role: ServiceRole, config: &GatewayConfig, telemetry: Telemetry) -> Result<Self, SetupError> {
        let http = build_http_client(&config.timeouts)?;
        let span_telemetry = telemetry.clone();

        let routes = match role {
            ServiceRole::Input => {
                let state = InputState {
                    weather_service: WeatherServiceClient::new(
                        http,
                        &config.upstream.weather_service_url,
                        telemetry.clone(),
                    )?,
                    telemetry,
                };
                Router::new()
                    .route("/cep", post(input::submit_cep))
                    .route("/health", get(health::health))
                    .with_state(state)
            }
            ServiceRole::Weather => {
                let state = WeatherState {
                    resolver: WeatherResolver::from_config(config, http, telemetry.clone())?,
                    telemetry,
                };
                Router::new()
                    .route("/", get(weather::weather_by_cep))
                    .route("/health", get(health::health))
                    .with_state(state)
            }
        };

        Ok(Self {
            role,
            router: Self::apply_layers(routes, role, config, span_telemetry),
        })
    }

    /// Wrap the routes in the middleware stack, outermost first.
    #[allow(deprecated)]
    fn apply_layers(routes: Router, role: ServiceRole, config: &GatewayConfig, telemetry: Telemetry) -> Router {
        routes.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(TraceLayer::new_for_http().make_span_with(RequestSpan { telemetry }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                .layer(middleware::from_fn_with_state(role, track_requests)),
        )
    }

    pub fn role(&self) -> ServiceRole {
        self.role
    }

    /// The fully layered router, for serving or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(role = self.role.as_str(), address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!(role = self.role.as_str(), "HTTP server stopped");
        Ok(())
    }
}

/// Builds the per-request span, parented on the caller's W3C trace context.
#[derive(Debug, Clone)]
struct RequestSpan {
    telemetry: Telemetry,
}

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &HttpRequest<B>) -> Span {
        let span = tracing::info_span!(
            "request",
            otel.kind = "server",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request.headers().request_id(),
        );
        set_parent(&span, self.telemetry.extract(request.headers()));
        span
    }
}

async fn track_requests(State(role): State<ServiceRole>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let response = next.run(request).await;
    metrics::record_request(role.as_str(), response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[test]
    fn test_role_addresses() {
        let listener = ListenerConfig::default();
        assert_eq!(ServiceRole::Input.bind_address(&listener), "0.0.0.0:8080");
        assert_eq!(ServiceRole::Weather.bind_address(&listener), "0.0.0.0:8081");
    }

    #[test]
    fn test_builds_both_roles() {
        let mut config = GatewayConfig::default();
        config.upstream.api_key = Some("k".into());
        for role in [ServiceRole::Input, ServiceRole::Weather] {
            let server = HttpServer::new(role, &config, Telemetry::local(role.as_str())).unwrap();
            assert_eq!(server.role(), role);
        }
    }

    #[test]
    fn test_rejects_unusable_upstream_url() {
        let mut config = GatewayConfig::default();
        config.upstream.weather_service_url = "not a url".into();
        assert!(HttpServer::new(ServiceRole::Input, &config, Telemetry::local("input")).is_err());
    }

    #[tokio::test]
    async fn test_input_router_rejects_without_forwarding() {
        let mut config = GatewayConfig::default();
        // Nothing listens here; a forwarded call would surface as 500.
        config.upstream.weather_service_url = "http://127.0.0.1:9".into();
        let server = HttpServer::new(ServiceRole::Input, &config, Telemetry::local("input")).unwrap();

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/cep")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"cep": "123"}"#))
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.headers().contains_key("x-request-id"));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"invalid zipcode");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let server = HttpServer::new(ServiceRole::Input, &GatewayConfig::default(), Telemetry::local("input")).unwrap();
        let request = axum::http::Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_request_span_continues_inbound_trace() {
        use tracing_subscriber::layer::SubscriberExt;

        const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";
        let telemetry = Telemetry::local("input");
        let subscriber = tracing_subscriber::registry()
            .with(tracing_opentelemetry::layer().with_tracer(telemetry.tracer()));

        tracing::subscriber::with_default(subscriber, || {
            let request = axum::http::Request::builder()
                .uri("/cep")
                .header("traceparent", TRACEPARENT)
                .body(())
                .unwrap();
            let mut make = RequestSpan {
                telemetry: telemetry.clone(),
            };
            let span = make.make_span(&request);
            let _entered = span.enter();

            // An empty fallback forces the headers to come from the live span.
            let headers = telemetry.outbound_headers(&opentelemetry::Context::new());
            let traceparent = headers["traceparent"].to_str().unwrap();
            assert_eq!(traceparent.split('-').nth(1).unwrap(), "4bf92f3577b34da6a3ce929d0e0e4736");
            assert_ne!(traceparent, TRACEPARENT);
        });
    }
}
