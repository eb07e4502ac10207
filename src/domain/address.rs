//! Geocoding provider records and the normalized address derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::cep::CepFormat;

/// The 27 federative units, by their two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StateCode {
    Ac, Al, Ap, Am, Ba, Ce, Df, Es, Go, Ma, Mt, Ms, Mg, Pa,
    Pb, Pr, Pe, Pi, Rj, Rn, Rs, Ro, Rr, Sc, Sp, Se, To,
}

impl StateCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateCode::Ac => "AC",
            StateCode::Al => "AL",
            StateCode::Ap => "AP",
            StateCode::Am => "AM",
            StateCode::Ba => "BA",
            StateCode::Ce => "CE",
            StateCode::Df => "DF",
            StateCode::Es => "ES",
            StateCode::Go => "GO",
            StateCode::Ma => "MA",
            StateCode::Mt => "MT",
            StateCode::Ms => "MS",
            StateCode::Mg => "MG",
            StateCode::Pa => "PA",
            StateCode::Pb => "PB",
            StateCode::Pr => "PR",
            StateCode::Pe => "PE",
            StateCode::Pi => "PI",
            StateCode::Rj => "RJ",
            StateCode::Rn => "RN",
            StateCode::Rs => "RS",
            StateCode::Ro => "RO",
            StateCode::Rr => "RR",
            StateCode::Sc => "SC",
            StateCode::Sp => "SP",
            StateCode::Se => "SE",
            StateCode::To => "TO",
        }
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Long-form state names as the provider spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum StateName {
    Acre,
    Alagoas,
    #[serde(rename = "Amapá")]
    Amapa,
    Amazonas,
    Bahia,
    #[serde(rename = "Ceará")]
    Ceara,
    #[serde(rename = "Distrito Federal")]
    DistritoFederal,
    #[serde(rename = "Espírito Santo", alias = "Espirito Santo")]
    EspiritoSanto,
    #[serde(rename = "Goiás")]
    Goias,
    #[serde(rename = "Maranhão")]
    Maranhao,
    #[serde(rename = "Mato Grosso")]
    MatoGrosso,
    #[serde(rename = "Mato Grosso do Sul")]
    MatoGrossoDoSul,
    #[serde(rename = "Minas Gerais")]
    MinasGerais,
    #[serde(rename = "Pará")]
    Para,
    #[serde(rename = "Paraíba")]
    Paraiba,
    #[serde(rename = "Paraná")]
    Parana,
    Pernambuco,
    #[serde(rename = "Piauí", alias = "Piaui")]
    Piaui,
    #[serde(rename = "Rio de Janeiro")]
    RioDeJaneiro,
    #[serde(rename = "Rio Grande do Norte")]
    RioGrandeDoNorte,
    #[serde(rename = "Rio Grande do Sul")]
    RioGrandeDoSul,
    #[serde(rename = "Rondônia")]
    Rondonia,
    Roraima,
    #[serde(rename = "Santa Catarina")]
    SantaCatarina,
    #[serde(rename = "São Paulo")]
    SaoPaulo,
    Sergipe,
    Tocantins,
}

/// The five macro-regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Region {
    Norte,
    Nordeste,
    #[serde(rename = "Centro-Oeste")]
    CentroOeste,
    Sudeste,
    Sul,
}

/// Address record in the geocoding provider's native shape.
///
/// Enumerated fields are checked by serde; [`ViaCepRecord::validate`] covers
/// the rest. Use [`ViaCepRecord::from_json`] to get both.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViaCepRecord {
    pub cep: String,
    pub logradouro: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub unidade: String,
    pub bairro: String,
    pub localidade: String,
    pub uf: StateCode,
    pub estado: StateName,
    pub regiao: Region,
    #[serde(default)]
    pub ibge: String,
    #[serde(default)]
    pub gia: String,
    #[serde(default)]
    pub ddd: String,
    #[serde(default)]
    pub siafi: String,
}

/// Why a provider record was rejected.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("cep {0:?} is not in 00000-000 form")]
    Cep(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

impl ViaCepRecord {
    /// Parse and validate a provider payload.
    pub fn from_json(body: &str) -> Result<Self, RecordError> {
        let record: ViaCepRecord = serde_json::from_str(body)?;
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        if !CepFormat::Dashed.matches(&self.cep) {
            return Err(RecordError::Cep(self.cep.clone()));
        }
        for (name, value) in [
            ("localidade", &self.localidade),
            ("bairro", &self.bairro),
            ("logradouro", &self.logradouro),
        ] {
            if value.trim().is_empty() {
                return Err(RecordError::Empty(name));
            }
        }
        Ok(())
    }
}

/// Address reduced to what the gateway cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAddress {
    pub cep: String,
    pub state: StateCode,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
}

impl From<ViaCepRecord> for ResolvedAddress {
    fn from(record: ViaCepRecord) -> Self {
        Self {
            cep: record.cep,
            state: record.uf,
            city: record.localidade,
            neighborhood: record.bairro,
            street: record.logradouro,
        }
    }
}

/// True when a 200 response body carries the provider's not-found marker.
///
/// The provider answers unknown CEPs with `200 OK` and `{"erro": true}`
/// (older deployments send the string `"true"`).
pub fn is_not_found_marker(body: &str) -> bool {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => matches!(
            value.get("erro"),
            Some(serde_json::Value::Bool(true))
        ) || matches!(value.get("erro"), Some(serde_json::Value::String(s)) if s == "true"),
        Err(_) => body.contains(r#""erro": "true""#) || body.contains(r#""erro": true"#),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONTES_CLAROS: &str = r#"{
        "cep": "39408-078",
        "logradouro": "Avenida Herlindo Silveira",
        "complemento": "Apto 101",
        "unidade": "Sala 101",
        "bairro": "Centro",
        "localidade": "Montes Claros",
        "uf": "MG",
        "estado": "Minas Gerais",
        "regiao": "Sudeste",
        "ibge": "3143302",
        "gia": "",
        "ddd": "38",
        "siafi": "4865"
    }"#;

    fn with_field(field: &str, value: serde_json::Value) -> String {
        let mut json: serde_json::Value = serde_json::from_str(MONTES_CLAROS).unwrap();
        json[field] = value;
        json.to_string()
    }

    #[test]
    fn test_parse_valid_record() {
        let record = ViaCepRecord::from_json(MONTES_CLAROS).unwrap();
        assert_eq!(record.cep, "39408-078");
        assert_eq!(record.uf, StateCode::Mg);
        assert_eq!(record.estado, StateName::MinasGerais);
        assert_eq!(record.regiao, Region::Sudeste);
        assert_eq!(record.localidade, "Montes Claros");
    }

    #[test]
    fn test_record_json_roundtrip() {
        let record = ViaCepRecord::from_json(MONTES_CLAROS).unwrap();
        let encoded = serde_json::to_string(&record).unwrap();
        let decoded = ViaCepRecord::from_json(&encoded).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn test_record_requires_dashed_cep() {
        let body = with_field("cep", "39408078".into());
        assert!(matches!(ViaCepRecord::from_json(&body), Err(RecordError::Cep(_))));

        let body = with_field("cep", "3940807".into());
        assert!(ViaCepRecord::from_json(&body).is_err());

        let body = with_field("cep", serde_json::json!(39408078));
        assert!(matches!(ViaCepRecord::from_json(&body), Err(RecordError::Malformed(_))));
    }

    #[test]
    fn test_record_rejects_unknown_enumerations() {
        assert!(ViaCepRecord::from_json(&with_field("uf", "MM".into())).is_err());
        assert!(ViaCepRecord::from_json(&with_field("estado", "Minas".into())).is_err());
        assert!(ViaCepRecord::from_json(&with_field("regiao", "Sudoeste".into())).is_err());
    }

    #[test]
    fn test_record_rejects_empty_fields() {
        for field in ["logradouro", "bairro", "localidade"] {
            let body = with_field(field, "".into());
            assert!(
                matches!(ViaCepRecord::from_json(&body), Err(RecordError::Empty(name)) if name == field),
                "{field} should be required"
            );
        }
    }

    #[test]
    fn test_state_name_aliases() {
        let body = with_field("estado", "Espirito Santo".into());
        let record = ViaCepRecord::from_json(&body).unwrap();
        assert_eq!(record.estado, StateName::EspiritoSanto);
    }

    #[test]
    fn test_resolved_address_mapping() {
        let address = ResolvedAddress::from(ViaCepRecord::from_json(MONTES_CLAROS).unwrap());
        assert_eq!(address.state, StateCode::Mg);
        assert_eq!(address.city, "Montes Claros");
        assert_eq!(address.neighborhood, "Centro");
        assert_eq!(address.street, "Avenida Herlindo Silveira");
    }

    #[test]
    fn test_not_found_marker() {
        assert!(is_not_found_marker(r#"{"erro": true}"#));
        assert!(is_not_found_marker(r#"{"erro": "true"}"#));
        assert!(is_not_found_marker(&with_field("erro", "true".into())));
        assert!(!is_not_found_marker(MONTES_CLAROS));
        assert!(!is_not_found_marker(r#"{"erro": false}"#));
    }

    #[test]
    fn test_state_code_display() {
        assert_eq!(StateCode::Sp.to_string(), "SP");
        assert_eq!(serde_json::to_string(&StateCode::Df).unwrap(), "\"DF\"");
    }
}
