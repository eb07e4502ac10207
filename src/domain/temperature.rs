//! Temperature readings returned to callers.

use serde::{Deserialize, Serialize};

/// Current temperature for a city in three scales.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TemperatureReading {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl TemperatureReading {
    /// Derive Fahrenheit and Kelvin from a Celsius reading.
    pub fn from_celsius(city: impl Into<String>, temp_c: f64) -> Self {
        Self {
            city: city.into(),
            temp_c,
            temp_f: temp_c * 1.8 + 32.0,
            temp_k: temp_c + 273.0,
        }
    }
}
