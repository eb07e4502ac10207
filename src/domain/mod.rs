//! Request and response models.
//!
//! # Data Flow
//! ```text
//! POST /cep body
//!     → cep.rs (ZipcodeRequest, format checks)
//!     → [geocoding provider]
//!     → address.rs (ViaCepRecord → ResolvedAddress)
//!     → [weather provider]
//!     → temperature.rs (TemperatureReading)
//! ```

pub mod address;
pub mod cep;
pub mod temperature;

pub use address::{ResolvedAddress, ViaCepRecord};
pub use cep::{CepFormat, ZipcodeRequest};
pub use temperature::TemperatureReading;
