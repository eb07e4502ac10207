//! Startup orchestration.
//!
//! # Responsibilities
//! - Build telemetry and install the subscriber before anything logs
//! - Start the optional metrics exporter
//! - Build the role's router, bind its listener, serve until a signal arrives
//! - Flush spans on the way out
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::net::{AddrParseError, SocketAddr};

use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::http::{HttpServer, ServiceRole};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{init_logging, metrics, LoggingError, Telemetry};
use crate::upstream::SetupError;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("invalid {field} {value:?}: {source}")]
    Address {
        field: &'static str,
        value: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

fn parse_addr(field: &'static str, value: &str) -> Result<SocketAddr, StartupError> {
    value.parse().map_err(|source| StartupError::Address {
        field,
        value: value.to_string(),
        source,
    })
}

/// Run one service role until SIGINT/SIGTERM.
pub async fn run(role: ServiceRole, config: GatewayConfig) -> Result<(), StartupError> {
    let telemetry = Telemetry::new(&config.observability, role.as_str());
    init_logging(&config.observability, &telemetry)?;

    if config.observability.metrics_enabled {
        let addr = parse_addr("observability.metrics_address", &config.observability.metrics_address)?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(role, &config, telemetry.clone())?;
    let addr = parse_addr(role.address_field(), role.bind_address(&config.listener))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    let signal_task = signals::spawn_signal_handler(shutdown);

    let result = server.run(listener, signal).await;

    signal_task.abort();
    telemetry.shutdown();
    result.map_err(StartupError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_addr_names_the_field() {
        assert!(parse_addr("listener.input_address", "127.0.0.1:8080").is_ok());

        let err = parse_addr("listener.input_address", "nope").unwrap_err();
        assert!(err.to_string().contains("listener.input_address"));
    }
}
