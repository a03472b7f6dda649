//! # TPM Test Payload
//!
//! File: cli/src/commands/probe/payload.rs
//!
//! ## Overview
//!
//! The subset of a TPM configuration record sent by CREATE and UPDATE probes.
//! Serialization follows the backend's sparse-update convention: a field the
//! caller left empty is left out of the JSON object entirely, so an UPDATE
//! only touches the fields it names.
//!
//! ```rust
//! let payload = TpmPayload { name: "Box".into(), a: Some(100), ..Default::default() };
//! assert_eq!(payload.to_json()?, br#"{"TPM":"Box","A":100}"#);
//! ```
//!
use crate::core::error::ProbeError;
use serde::Serialize;

/// Fields of a TPM record used for test bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TpmPayload {
    #[serde(rename = "TPM", skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub variant: String,
    #[serde(rename = "A", skip_serializing_if = "Option::is_none")]
    pub a: Option<i64>,
    #[serde(rename = "B", skip_serializing_if = "Option::is_none")]
    pub b: Option<i64>,
    #[serde(rename = "H", skip_serializing_if = "Option::is_none")]
    pub h: Option<i64>,
}

impl TpmPayload {
    /// Encodes the payload as a compact JSON object.
    pub fn to_json(&self) -> Result<Vec<u8>, ProbeError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Parses a dimension field: blank means "not supplied".
pub fn parse_dimension(field: &str, raw: &str) -> Result<Option<i64>, ProbeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<i64>().map(Some).map_err(|_| {
        ProbeError::InvalidInput(format!(
            "dimension {} must be an integer, got '{}'",
            field, raw
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(payload: &TpmPayload) -> String {
        String::from_utf8(payload.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_sparse_update_omits_empty_fields() {
        let payload = TpmPayload {
            name: "Box".into(),
            a: Some(100),
            ..Default::default()
        };
        assert_eq!(json(&payload), r#"{"TPM":"Box","A":100}"#);
    }

    #[test]
    fn test_full_payload_key_order() {
        let payload = TpmPayload {
            name: "Test TPM".into(),
            description: "Test description".into(),
            variant: "v1.0".into(),
            a: Some(100),
            b: Some(200),
            h: Some(50),
        };
        assert_eq!(
            json(&payload),
            r#"{"TPM":"Test TPM","description":"Test description","variant":"v1.0","A":100,"B":200,"H":50}"#
        );
    }

    #[test]
    fn test_strings_are_escaped() {
        let payload = TpmPayload {
            name: "say \"hi\" \\ bye".into(),
            description: "line\nbreak".into(),
            ..Default::default()
        };
        let encoded = json(&payload);
        assert_eq!(
            encoded,
            r#"{"TPM":"say \"hi\" \\ bye","description":"line\nbreak"}"#
        );
        // Still valid JSON after the round trip through a parser.
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["description"], "line\nbreak");
    }

    #[test]
    fn test_empty_payload_is_empty_object() {
        assert_eq!(json(&TpmPayload::default()), "{}");
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("A", "").unwrap(), None);
        assert_eq!(parse_dimension("A", "  ").unwrap(), None);
        assert_eq!(parse_dimension("B", "200").unwrap(), Some(200));
        assert_eq!(parse_dimension("H", " -5 ").unwrap(), Some(-5));
        let err = parse_dimension("H", "tall").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: dimension H must be an integer, got 'tall'"
        );
    }
}
