//! Switch API trait definition
//!
//! The lifecycle only ever needs three things from OpenHIM: register, fetch
//! the persisted configuration, and send a heartbeat. Keeping them behind a
//! trait lets the lifecycle run against an in-memory switch in tests.

use crate::domain::{MediatorConfig, MediatorIdentity, MediatorUrn, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Operations the mediator consumes from the integration switch
///
/// # Example
///
/// ```no_run
/// use dhis_mediator::adapters::openhim::{OpenHimClient, SwitchApi};
/// use dhis_mediator::config::OpenHimConfig;
/// use dhis_mediator::domain::MediatorIdentity;
///
/// # async fn example() -> dhis_mediator::domain::Result<()> {
/// let identity = MediatorIdentity::bundled()?;
/// let switch = OpenHimClient::new(&OpenHimConfig::default())?;
///
/// switch.register(&identity).await?;
/// let config = switch.fetch_config(identity.urn()).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait SwitchApi: Send + Sync {
    /// Register the mediator and its configuration schema
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or if the switch rejects the
    /// registration document.
    async fn register(&self, identity: &MediatorIdentity) -> Result<()>;

    /// Fetch the configuration currently persisted for `urn`
    ///
    /// The configuration may come from an earlier registration or from an
    /// operator editing it in the console.
    async fn fetch_config(&self, urn: &MediatorUrn) -> Result<MediatorConfig>;

    /// Send one heartbeat
    ///
    /// Returns `Some(config)` when the switch answered with a configuration
    /// snapshot. `force_config` asks the switch to include the snapshot even
    /// if it has not changed.
    async fn heartbeat(
        &self,
        urn: &MediatorUrn,
        uptime: Duration,
        force_config: bool,
    ) -> Result<Option<MediatorConfig>>;

    /// Base URL of the switch API, for diagnostics
    fn api_url(&self) -> &str;
}
