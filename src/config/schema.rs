//! Configuration schema types
//!
//! This module defines the process configuration for the mediator. Every
//! section has defaults so the mediator can start from environment variables
//! alone.

use crate::config::{secret_string, SecretString};
use serde::{Deserialize, Serialize};

/// Main mediator configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MediatorSettings {
    /// Listener and heartbeat settings
    #[serde(default)]
    pub server: ServerConfig,

    /// OpenHIM API connection
    #[serde(default)]
    pub openhim: OpenHimConfig,

    /// DHIS2 fetch settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MediatorSettings {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.openhim.validate()?;
        self.upstream.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Listener and heartbeat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the mediator listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to run the OpenHIM heartbeat
    #[serde(default = "default_true")]
    pub heartbeat: bool,

    /// Seconds between heartbeats
    #[serde(default = "default_heartbeat_interval_seconds")]
    pub heartbeat_interval_seconds: u64,

    /// Registration document to use instead of the bundled one
    #[serde(default)]
    pub registration_file: Option<String>,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("server.port must be > 0".to_string());
        }

        if self.heartbeat_interval_seconds == 0 {
            return Err("server.heartbeat_interval_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            heartbeat: true,
            heartbeat_interval_seconds: default_heartbeat_interval_seconds(),
            registration_file: None,
        }
    }
}

/// OpenHIM API connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenHimConfig {
    /// Base URL of the OpenHIM core API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API user the mediator authenticates as
    #[serde(default = "default_username")]
    pub username: String,

    /// API user password
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default = "default_password")]
    pub password: SecretString,

    /// Accept self-signed certificates from the OpenHIM API
    ///
    /// **SECURITY WARNING**: disables certificate verification for OpenHIM
    /// API calls. Intended for local OpenHIM instances only.
    #[serde(default)]
    pub trust_self_signed: bool,

    /// Request timeout in seconds
    #[serde(default = "default_openhim_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl OpenHimConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.api_url.is_empty() {
            return Err("openhim.api_url cannot be empty".to_string());
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err("openhim.api_url must start with http:// or https://".to_string());
        }

        if self.username.trim().is_empty() {
            return Err("openhim.username cannot be empty".to_string());
        }

        if self.password.expose_secret().is_empty() {
            return Err("openhim.password cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("openhim.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for OpenHimConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            username: default_username(),
            password: default_password(),
            trust_self_signed: false,
            timeout_seconds: default_openhim_timeout_seconds(),
        }
    }
}

/// DHIS2 fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Upper bound on a single DHIS2 request, in seconds
    #[serde(default = "default_upstream_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl UpstreamConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("upstream.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_upstream_timeout_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            ));
        }

        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_port() -> u16 {
    3001
}

fn default_true() -> bool {
    true
}

fn default_heartbeat_interval_seconds() -> u64 {
    10
}

fn default_api_url() -> String {
    "https://localhost:8080".to_string()
}

fn default_username() -> String {
    "root@openhim.org".to_string()
}

fn default_password() -> SecretString {
    secret_string("openhim-password".to_string())
}

fn default_openhim_timeout_seconds() -> u64 {
    30
}

fn default_upstream_timeout_seconds() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = MediatorSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.server.port, 3001);
        assert!(settings.server.heartbeat);
        assert_eq!(settings.openhim.api_url, "https://localhost:8080");
        assert!(!settings.openhim.trust_self_signed);
    }

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.port = 0;
        assert!(config.validate().is_err());

        config.port = 3001;
        config.heartbeat_interval_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_openhim_config_validation() {
        let mut config = OpenHimConfig::default();
        assert!(config.validate().is_ok());

        config.api_url = "localhost:8080".to_string();
        assert!(config.validate().is_err());

        config.api_url = "https://openhim-core:8080".to_string();
        config.username = String::new();
        assert!(config.validate().is_err());

        config.username = "root@openhim.org".to_string();
        config.password = secret_string(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());

        config.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.level = "info".to_string();
        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: MediatorSettings = toml::from_str(
            r#"
[server]
port = 4000
"#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 4000);
        assert!(settings.server.heartbeat);
        assert_eq!(settings.upstream.timeout_seconds, 60);
        assert_eq!(settings.logging.level, "info");
    }
}
