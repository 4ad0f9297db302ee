//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "mediator.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing mediator configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your OpenHIM settings", self.output);
                println!("  2. Set OPENHIM_PASSWORD in your environment or a .env file");
                println!(
                    "  3. Validate configuration: dhis-mediator --config {} validate-config",
                    self.output
                );
                println!("  4. Start the mediator: dhis-mediator --config {} serve", self.output);
                println!("  5. Add the DHIS2 url and path in the OpenHIM console");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Sample configuration with every setting and its default
    fn generate_config() -> String {
        r#"# DHIS2 Facility Mediator Configuration
#
# Every setting has a default; environment variables override this file.
# ${VAR_NAME} is replaced with the value of the environment variable.

# ============================================================================
# Listener and Heartbeat
# ============================================================================
[server]
# Port the mediator listens on (MEDIATOR_PORT)
port = 3001

# Send heartbeats to OpenHIM and receive config updates (MEDIATOR_HEARTBEAT)
heartbeat = true

# Seconds between heartbeats
heartbeat_interval_seconds = 10

# Registration document to use instead of the bundled one
# registration_file = "mediator.json"

# ============================================================================
# OpenHIM Core API
# ============================================================================
[openhim]
# Base URL of the OpenHIM API (OPENHIM_API_URL)
api_url = "https://localhost:8080"

# API user (OPENHIM_USERNAME)
username = "root@openhim.org"

# API password (OPENHIM_PASSWORD)
password = "${OPENHIM_PASSWORD}"

# Accept self-signed certificates; local OpenHIM instances only
# (OPENHIM_TRUST_SELF_SIGNED)
trust_self_signed = false

# Request timeout in seconds
timeout_seconds = 30

# ============================================================================
# DHIS2
# ============================================================================
# The DHIS2 url and path are set in the OpenHIM console, not here.
[upstream]
# Request timeout in seconds (DHIS_TIMEOUT_SECONDS)
timeout_seconds = 60

# ============================================================================
# Logging
# ============================================================================
[logging]
# Log level: trace, debug, info, warn, error (LOG_LEVEL)
level = "info"

# JSON log files with rotation
local_enabled = false
local_path = "logs"

# Rotation: daily or hourly
local_rotation = "daily"
"#
        .to_string()
    }
}
