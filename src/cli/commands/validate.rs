//! Validate config command implementation
//!
//! This module implements the `validate-config` command for checking the
//! mediator configuration and registration document without contacting
//! OpenHIM.

use crate::config::load_config;
use crate::domain::MediatorIdentity;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let source = config_path.unwrap_or("(defaults and environment)");
        tracing::info!(config_path = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();

        // load_config validates after applying overrides
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let identity = match &config.server.registration_file {
            Some(path) => MediatorIdentity::from_file(path),
            None => MediatorIdentity::bundled(),
        };
        let identity = match identity {
            Ok(identity) => {
                println!("✅ Registration document is valid");
                identity
            }
            Err(e) => {
                println!("❌ Registration document is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Mediator: {} {}", identity.name(), identity.version());
        println!("  URN: {}", identity.urn());
        println!("  Port: {}", config.server.port);
        println!(
            "  Heartbeat: {}",
            if config.server.heartbeat {
                format!("every {}s", config.server.heartbeat_interval_seconds)
            } else {
                "disabled".to_string()
            }
        );
        println!("  OpenHIM API: {}", config.openhim.api_url);
        println!("  OpenHIM User: {}", config.openhim.username);
        if config.openhim.trust_self_signed {
            println!("  ⚠️  Self-signed certificates are trusted");
        }
        println!("  DHIS2 Timeout: {}s", config.upstream.timeout_seconds);
        println!("  Log Level: {}", config.logging.level);
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_invalid_file_returns_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[logging]\nlocal_rotation = \"weekly\"\n").unwrap();
        file.flush().unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_missing_file_returns_config_error() {
        let code = ValidateArgs {}
            .execute(Some("does-not-exist.toml"))
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
