//! Mediator identity and registration document
//!
//! The identity is what OpenHIM knows this mediator by: its URN plus the
//! registration document (endpoints, default channel, `configDefs` schema).
//! It is fixed at startup and never mutated afterwards.

use super::ids::MediatorUrn;
use crate::domain::{MediatorError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Registration document shipped with the binary
const BUNDLED_REGISTRATION: &str = include_str!("../../mediator.json");

/// Immutable mediator identity
#[derive(Debug, Clone, PartialEq)]
pub struct MediatorIdentity {
    urn: MediatorUrn,
    name: String,
    version: String,
    document: Value,
}

impl MediatorIdentity {
    /// Parses an identity from a registration document
    ///
    /// The document must be a JSON object with a valid `urn`, and string
    /// `name` and `version` fields. Everything else is passed through to
    /// OpenHIM untouched.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the document is not valid JSON or a
    /// required field is missing.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(raw).map_err(|e| {
            MediatorError::Configuration(format!("Invalid registration document: {e}"))
        })?;

        let object = document.as_object().ok_or_else(|| {
            MediatorError::Configuration("Registration document must be a JSON object".to_string())
        })?;

        let urn = object
            .get("urn")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                MediatorError::Configuration("Registration document is missing 'urn'".to_string())
            })
            .and_then(|s| MediatorUrn::new(s).map_err(MediatorError::Configuration))?;

        let name = required_string(object, "name")?;
        let version = required_string(object, "version")?;

        Ok(Self {
            urn,
            name,
            version,
            document,
        })
    }

    /// Loads an identity from a registration document on disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            MediatorError::Configuration(format!(
                "Failed to read registration document {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&raw)
    }

    /// The registration document compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_REGISTRATION)
    }

    /// Mediator URN
    pub fn urn(&self) -> &MediatorUrn {
        &self.urn
    }

    /// Human-readable mediator name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mediator version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Full registration document, including the `configDefs` schema
    pub fn document(&self) -> &Value {
        &self.document
    }
}

fn required_string(object: &serde_json::Map<String, Value>, field: &str) -> Result<String> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            MediatorError::Configuration(format!("Registration document is missing '{field}'"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bundled_identity_is_valid() {
        let identity = MediatorIdentity::bundled().unwrap();
        assert_eq!(identity.urn().as_str(), "urn:mediator:dhis2-facilities");
        assert!(identity.document().get("configDefs").is_some());
    }

    #[test]
    fn test_missing_urn_is_rejected() {
        let result = MediatorIdentity::from_json_str(r#"{"name": "x", "version": "1"}"#);
        assert!(matches!(result, Err(MediatorError::Configuration(_))));
    }

    #[test]
    fn test_invalid_urn_is_rejected() {
        let result =
            MediatorIdentity::from_json_str(r#"{"urn": "bad", "name": "x", "version": "1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(MediatorIdentity::from_json_str("[]").is_err());
        assert!(MediatorIdentity::from_json_str("not json").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"urn": "urn:mediator:custom", "name": "Custom", "version": "2.0.0", "extra": 1}"#,
        )
        .unwrap();
        file.flush().unwrap();

        let identity = MediatorIdentity::from_file(file.path()).unwrap();
        assert_eq!(identity.name(), "Custom");
        assert_eq!(identity.version(), "2.0.0");
        assert_eq!(identity.document()["extra"], 1);
    }
}
