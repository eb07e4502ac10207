//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Input service (front):
//!     server.rs (layers: request id, trace span, timeout, metrics)
//!     → input.rs (POST /cep: validate, relay)
//!     → response.rs (relay status/content type/body verbatim)
//!
//! Weather service (back):
//!     server.rs
//!     → weather.rs (GET /?cep=: resolve)
//!     → response.rs (Outcome → status + JSON or plain text)
//! ```

pub mod health;
pub mod input;
pub mod request;
pub mod response;
pub mod server;
pub mod weather;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::{HttpServer, ServiceRole};
