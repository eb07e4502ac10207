//! Shared utilities for integration tests.
//!
//! Spawns both services on ephemeral ports, wired to `wiremock` doubles of
//! the geocoding and weather providers.

#![allow(dead_code)]

use std::net::SocketAddr;

use cep_weather::lifecycle::Shutdown;
use cep_weather::observability::Telemetry;
use cep_weather::{GatewayConfig, HttpServer, ServiceRole};
use serde_json::json;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_KEY: &str = "test-key";
pub const TRACE_ID: &str = "4bf92f3577b34da6a3ce929d0e0e4736";
pub const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

/// Both services plus their provider doubles. Stops the services on drop.
pub struct Stack {
    pub input_url: String,
    pub weather_url: String,
    pub geocoding: MockServer,
    pub weather: MockServer,
    shutdown: Shutdown,
}

impl Drop for Stack {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

impl Stack {
    pub async fn submit(&self, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/cep", self.input_url))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn geocoding_calls(&self) -> usize {
        self.geocoding.received_requests().await.unwrap_or_default().len()
    }

    pub async fn weather_calls(&self) -> usize {
        self.weather.received_requests().await.unwrap_or_default().len()
    }
}

/// Config pointing at the given provider doubles.
pub fn test_config(geocoding: &MockServer, weather: &MockServer) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.upstream.geocoding_url = geocoding.uri();
    config.upstream.weather_url = weather.uri();
    config.upstream.api_key = Some(TEST_KEY.to_string());
    config
}

/// Start a server for `role` on an ephemeral port and return its address.
pub async fn spawn_service(role: ServiceRole, config: &GatewayConfig, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(role, config, Telemetry::local(role.as_str())).unwrap();
    tokio::spawn(server.run(listener, shutdown.subscribe()));
    addr
}

/// Start both services with the default resolution deadline.
pub async fn spawn_stack() -> Stack {
    spawn_stack_with(|_| {}).await
}

/// Start both services after applying `tweak` to the shared config.
pub async fn spawn_stack_with(tweak: impl FnOnce(&mut GatewayConfig)) -> Stack {
    let geocoding = MockServer::start().await;
    let weather = MockServer::start().await;
    let mut config = test_config(&geocoding, &weather);
    tweak(&mut config);

    let shutdown = Shutdown::new();
    let weather_addr = spawn_service(ServiceRole::Weather, &config, &shutdown).await;
    config.upstream.weather_service_url = format!("http://{}", weather_addr);
    let input_addr = spawn_service(ServiceRole::Input, &config, &shutdown).await;

    Stack {
        input_url: format!("http://{}", input_addr),
        weather_url: format!("http://{}", weather_addr),
        geocoding,
        weather,
        shutdown,
    }
}

pub fn montes_claros() -> serde_json::Value {
    json!({
        "cep": "39408-078",
        "logradouro": "Avenida Herlindo Silveira",
        "complemento": "",
        "unidade": "",
        "bairro": "Centro",
        "localidade": "Montes Claros",
        "uf": "MG",
        "estado": "Minas Gerais",
        "regiao": "Sudeste",
        "ibge": "3143302",
        "gia": "",
        "ddd": "38",
        "siafi": "4865"
    })
}

pub fn current_weather(city: &str, temp_c: f64) -> serde_json::Value {
    json!({
        "location": {"name": city, "region": "Minas Gerais", "country": "Brazil"},
        "current": {"temp_c": temp_c, "temp_f": temp_c * 1.8 + 32.0, "condition": {"text": "Sunny"}}
    })
}

pub async fn mount_geocoding(server: &MockServer, cep: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/ws/{}/json/", cep)))
        .respond_with(response)
        .mount(server)
        .await;
}

pub async fn mount_weather(server: &MockServer, city: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("key", TEST_KEY))
        .and(query_param("q", city))
        .and(query_param("aqi", "no"))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Geocoding and weather doubles answering for Montes Claros at `temp_c`.
pub async fn mount_happy_path(stack: &Stack, temp_c: f64) {
    mount_geocoding(
        &stack.geocoding,
        "39408078",
        ResponseTemplate::new(200).set_body_json(montes_claros()),
    )
    .await;
    mount_weather(
        &stack.weather,
        "Montes Claros",
        ResponseTemplate::new(200).set_body_json(current_weather("Montes Claros", temp_c)),
    )
    .await;
}
