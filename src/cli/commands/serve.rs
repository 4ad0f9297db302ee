//! Serve command implementation
//!
//! This module implements the `serve` command: register with OpenHIM, fetch
//! the initial config, then serve `/facilities` with the heartbeat running.

use crate::adapters::dhis::UpstreamClient;
use crate::adapters::openhim::OpenHimClient;
use crate::config::{load_config, MediatorSettings};
use crate::core::handler::FacilityService;
use crate::core::lifecycle::{LifecycleOptions, MediatorLifecycle};
use crate::core::state::ConfigStore;
use crate::domain::{MediatorIdentity, Result};
use crate::server;
use clap::Args;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Exit code for a failed registration or initial config fetch
pub const EXIT_STARTUP_FAILURE: i32 = 1;

/// Exit code for invalid configuration
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Exit code for any other fatal error
pub const EXIT_FATAL: i32 = 5;

/// Arguments for the serve command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override the listener port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Do not send heartbeats to OpenHIM
    #[arg(long)]
    pub no_heartbeat: bool,

    /// Registration document to use instead of the bundled one
    #[arg(long, value_name = "FILE")]
    pub registration: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut settings = match load_config(config_path) {
            Ok(settings) => settings,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        self.apply_overrides(&mut settings);

        let identity = match self.load_identity(&settings) {
            Ok(identity) => identity,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load registration document");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        tracing::info!(
            urn = %identity.urn(),
            name = identity.name(),
            version = identity.version(),
            "Starting mediator"
        );

        let switch = match OpenHimClient::new(&settings.openhim) {
            Ok(client) => client,
            Err(e) => {
                crate::log_error_with_context!(&e, "Invalid OpenHIM settings");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let upstream = match UpstreamClient::new(&settings.upstream) {
            Ok(client) => client,
            Err(e) => {
                crate::log_error_with_context!(&e, "Invalid upstream settings");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let store = ConfigStore::new();
        let service = FacilityService::new(identity.urn().clone(), store.clone(), upstream);
        let router = server::router(Arc::new(service));

        let lifecycle = MediatorLifecycle::new(
            Arc::new(switch),
            identity,
            store,
            LifecycleOptions {
                heartbeat_enabled: settings.server.heartbeat,
                heartbeat_interval: Duration::from_secs(settings.server.heartbeat_interval_seconds),
            },
        );

        let addr = SocketAddr::from(([0, 0, 0, 0], settings.server.port));

        match lifecycle.run(addr, router, shutdown_signal).await {
            Ok(()) => {
                tracing::info!("Mediator stopped");
                Ok(0)
            }
            Err(e) if e.is_fatal_startup() => {
                tracing::error!(error = %e, "Mediator startup failed");
                Ok(EXIT_STARTUP_FAILURE)
            }
            Err(e) => {
                tracing::error!(error = %e, "Mediator failed");
                Ok(EXIT_FATAL)
            }
        }
    }

    fn apply_overrides(&self, settings: &mut MediatorSettings) {
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if self.no_heartbeat {
            settings.server.heartbeat = false;
        }
        if let Some(path) = &self.registration {
            settings.server.registration_file = Some(path.clone());
        }
    }

    fn load_identity(&self, settings: &MediatorSettings) -> Result<MediatorIdentity> {
        match &settings.server.registration_file {
            Some(path) => MediatorIdentity::from_file(path),
            None => MediatorIdentity::bundled(),
        }
    }
}
