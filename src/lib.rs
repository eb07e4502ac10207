//! CEP → weather gateway library.
//!
//! Two HTTP services built from the same crate: the input service validates
//! a Brazilian postal code and relays it to the weather service, which
//! resolves the code to a city and the city to its current temperature.

pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::{Failure, GatewayError, Outcome};
pub use http::{HttpServer, ServiceRole};
pub use lifecycle::Shutdown;
