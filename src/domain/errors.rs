//! Domain error types
//!
//! This module defines the error hierarchy for the mediator.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main mediator error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum MediatorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// OpenHIM (switch) errors
    #[error("OpenHIM error: {0}")]
    Switch(#[from] SwitchError),

    /// DHIS2 (upstream) errors
    #[error("DHIS2 error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Facility transformation errors
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Fatal startup failure (registration or initial config fetch)
    #[error("Startup failed: {0}")]
    Startup(String),

    /// Lifecycle ordering violations
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl MediatorError {
    /// Whether this error must terminate the process with the startup exit code
    pub fn is_fatal_startup(&self) -> bool {
        matches!(self, MediatorError::Startup(_))
    }
}

/// OpenHIM-specific errors
///
/// Errors that occur when talking to the OpenHIM core API.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum SwitchError {
    /// Failed to reach the OpenHIM API
    #[error("Failed to connect to OpenHIM: {0}")]
    ConnectionFailed(String),

    /// Authentication handshake failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Registration was rejected by OpenHIM
    #[error("Mediator registration rejected with status {status}: {body}")]
    RegistrationRejected { status: u16, body: String },

    /// Config fetch returned an unexpected status
    #[error("Config fetch failed with status {status}: {body}")]
    ConfigFetchFailed { status: u16, body: String },

    /// Heartbeat returned an unexpected status
    #[error("Heartbeat unsuccessful, received status code of {status}")]
    HeartbeatRejected { status: u16 },

    /// Response could not be decoded
    #[error("Invalid response from OpenHIM: {0}")]
    InvalidResponse(String),
}

/// DHIS2 fetch errors
///
/// The request handler renders each variant as a distinct envelope.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// No response was received (connection, DNS, timeout)
    #[error("Failed to reach DHIS2: {0}")]
    Transport(String),

    /// A response was received with a status other than 200
    #[error("DHIS2 responded with status {code}")]
    Status { code: u16, body: String },

    /// The configured url/path pair does not form a valid URL
    #[error("Invalid DHIS2 URL: {0}")]
    InvalidUrl(String),
}

/// Facility transformation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransformError {
    /// The body is not well-formed XML
    #[error("Failed to parse DHIS2 XML: {0}")]
    ParseFailure(String),

    /// The XML parsed but does not have the expected organisation unit shape
    #[error("Unexpected data structure: {0}")]
    UnexpectedStructure(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for MediatorError {
    fn from(err: std::io::Error) -> Self {
        MediatorError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MediatorError {
    fn from(err: serde_json::Error) -> Self {
        MediatorError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MediatorError {
    fn from(err: toml::de::Error) -> Self {
        MediatorError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mediator_error_display() {
        let err = MediatorError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_switch_error_conversion() {
        let switch_err = SwitchError::ConnectionFailed("Network error".to_string());
        let err: MediatorError = switch_err.into();
        assert!(matches!(err, MediatorError::Switch(_)));
        assert!(!err.is_fatal_startup());
    }

    #[test]
    fn test_upstream_status_display() {
        let err = UpstreamError::Status {
            code: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "DHIS2 responded with status 404");
    }

    #[test]
    fn test_transform_errors_are_distinguishable() {
        let parse = TransformError::ParseFailure("bad".to_string());
        let shape = TransformError::UnexpectedStructure("bad".to_string());
        assert_ne!(parse, shape);
    }

    #[test]
    fn test_startup_is_fatal() {
        assert!(MediatorError::Startup("registration".to_string()).is_fatal_startup());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: MediatorError = io_err.into();
        assert!(matches!(err, MediatorError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: MediatorError = toml_err.into();
        assert!(matches!(err, MediatorError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
