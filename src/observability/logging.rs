//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber
//! - Bridge `tracing` spans into OpenTelemetry through the service's [`Telemetry`]
//! - Configure log level at startup
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::observability::Telemetry;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter {filter:?}: {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("tracing subscriber already installed: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber for this process.
pub fn init_logging(config: &ObservabilityConfig, telemetry: &Telemetry) -> Result<(), LoggingError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|source| LoggingError::Filter {
            filter: config.log_level.clone(),
            source,
        })?,
    };

    let mut layers = Vec::new();
    layers.push(
        tracing_opentelemetry::layer()
            .with_tracer(telemetry.tracer())
            .boxed(),
    );
    match config.log_format {
        LogFormat::Json => layers.push(fmt::layer().json().boxed()),
        LogFormat::Pretty => layers.push(fmt::layer().boxed()),
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()?;

    tracing::info!(
        service.name = %telemetry.service_name(),
        log_format = ?config.log_format,
        exporter = ?config.trace_exporter,
        "Logging initialized"
    );
    Ok(())
}
