//! Config-sync subscriber
//!
//! Applies every [`HeartbeatEvent::ConfigUpdated`] to the [`ConfigStore`].
//! Snapshots are stored as delivered; a snapshot without a usable `dhis`
//! section is reported to callers at request time.

use super::store::ConfigStore;
use crate::core::heartbeat::HeartbeatEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Spawn the task that keeps `store` in step with heartbeat config events
///
/// The task ends when every sender of `events` is dropped.
pub fn spawn_config_sync(
    store: ConfigStore,
    mut events: broadcast::Receiver<HeartbeatEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(HeartbeatEvent::ConfigUpdated(config)) => {
                    store.replace(config);
                    tracing::debug!("Mediator config replaced");
                }
                Ok(HeartbeatEvent::HeartbeatFailed(_)) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Each ConfigUpdated carries a full snapshot
                    tracing::warn!(skipped, "Config sync lagged behind heartbeat events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
