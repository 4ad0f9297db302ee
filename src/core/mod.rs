//! Core mediator logic.
//!
//! # Modules
//!
//! - [`lifecycle`] - Registration, initial config fetch, serving phase
//! - [`heartbeat`] - Periodic heartbeat and its event channel
//! - [`state`] - Shared mediator config and heartbeat-driven sync
//! - [`handler`] - `GET /facilities` request pipeline
//! - [`transform`] - DHIS2 XML to facility records
//! - [`envelope`] - OpenHIM response envelope
//!
//! # Startup Workflow
//!
//! 1. **Register**: send the registration document to OpenHIM
//! 2. **Fetch Config**: install the config OpenHIM holds for this mediator
//! 3. **Serve**: bind the listener and start the heartbeat
//! 4. **Sync**: replace the config whenever a heartbeat delivers one
//!
//! # Example
//!
//! ```rust,no_run
//! use dhis_mediator::adapters::dhis::UpstreamClient;
//! use dhis_mediator::adapters::openhim::OpenHimClient;
//! use dhis_mediator::config::MediatorSettings;
//! use dhis_mediator::core::handler::FacilityService;
//! use dhis_mediator::core::lifecycle::{LifecycleOptions, MediatorLifecycle};
//! use dhis_mediator::core::state::ConfigStore;
//! use dhis_mediator::domain::MediatorIdentity;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = MediatorSettings::default();
//! let identity = MediatorIdentity::bundled()?;
//! let store = ConfigStore::new();
//!
//! let service = FacilityService::new(
//!     identity.urn().clone(),
//!     store.clone(),
//!     UpstreamClient::new(&settings.upstream)?,
//! );
//! let router = dhis_mediator::server::router(Arc::new(service));
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let lifecycle = MediatorLifecycle::new(
//!     Arc::new(OpenHimClient::new(&settings.openhim)?),
//!     identity,
//!     store,
//!     LifecycleOptions::default(),
//! );
//! lifecycle.run(([0, 0, 0, 0], 3001).into(), router, shutdown_rx).await?;
//! # Ok(())
//! # }
//! ```

pub mod envelope;
pub mod handler;
pub mod heartbeat;
pub mod lifecycle;
pub mod state;
pub mod transform;
