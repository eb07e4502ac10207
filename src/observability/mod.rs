//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every handler and upstream client produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → telemetry.rs (spans + W3C context in/out)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//!     → Span exporter (optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging with request id and cep on every event
//! - Trace context crosses both service hops and both provider calls

pub mod logging;
pub mod metrics;
pub mod telemetry;

pub use logging::{init_logging, LoggingError};
pub use telemetry::Telemetry;
