//! CEP (Brazilian postal code) syntax checks.
//!
//! # Design Decisions
//! - Byte-level matching, no regex
//! - Only ASCII digits count; other Unicode digits are rejected
//! - The three accepted shapes are distinct and never conflated

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// The accepted CEP shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CepFormat {
    /// `01234567`: inbound requests to the front service.
    Digits,
    /// `01234-567`: the CEP echoed back by the geocoding provider.
    Dashed,
    /// `01234567` or `01234-567`: the back service's query parameter.
    Flexible,
}

impl CepFormat {
    fn describe(&self) -> &'static str {
        match self {
            CepFormat::Digits => "8 digits",
            CepFormat::Dashed => "5 digits, a dash and 3 digits",
            CepFormat::Flexible => "8 digits, optionally with a dash after the fifth",
        }
    }

    /// Returns true if `cep` has this shape.
    pub fn matches(&self, cep: &str) -> bool {
        let bytes = cep.as_bytes();
        match self {
            CepFormat::Digits => bytes.len() == 8 && all_digits(bytes),
            CepFormat::Dashed => {
                bytes.len() == 9
                    && bytes[5] == b'-'
                    && all_digits(&bytes[..5])
                    && all_digits(&bytes[6..])
            }
            CepFormat::Flexible => CepFormat::Digits.matches(cep) || CepFormat::Dashed.matches(cep),
        }
    }
}

fn all_digits(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_digit)
}

/// Check `cep` against `format`.
pub fn validate(cep: &str, format: CepFormat) -> Result<(), GatewayError> {
    if format.matches(cep) {
        Ok(())
    } else {
        Err(GatewayError::InvalidInput(format!(
            "cep must have {}",
            format.describe()
        )))
    }
}

/// Strip the separator from a CEP that already passed [`CepFormat::Flexible`].
pub fn normalize(cep: &str) -> String {
    cep.chars().filter(|c| *c != '-').collect()
}

/// Inbound body of `POST /cep`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ZipcodeRequest {
    pub cep: String,
}

impl ZipcodeRequest {
    /// Decode a raw request body and check it holds an 8-digit CEP.
    pub fn from_body(body: &[u8]) -> Result<Self, GatewayError> {
        let request: ZipcodeRequest = serde_json::from_slice(body)
            .map_err(|e| GatewayError::InvalidInput(format!("malformed body: {}", e)))?;
        validate(&request.cep, CepFormat::Digits)?;
        Ok(request)
    }
}
