//! OpenHIM heartbeat
//!
//! The heartbeat tells OpenHIM the mediator is alive and is the channel over
//! which console edits to the mediator config arrive. Each beat's outcome is
//! published as a [`HeartbeatEvent`] on a broadcast channel; the monitor
//! itself never acts on the config.

use crate::adapters::openhim::SwitchApi;
use crate::domain::{MediatorConfig, MediatorUrn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Default seconds between heartbeats
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Outcome of a heartbeat that subscribers care about
#[derive(Debug, Clone, PartialEq)]
pub enum HeartbeatEvent {
    /// OpenHIM answered with a config snapshot
    ConfigUpdated(MediatorConfig),

    /// The beat failed; the monitor keeps running
    HeartbeatFailed(String),
}

/// Periodic heartbeat against OpenHIM
pub struct HeartbeatMonitor {
    switch: Arc<dyn SwitchApi>,
    urn: MediatorUrn,
    interval: Duration,
    events: broadcast::Sender<HeartbeatEvent>,
    started: Instant,
}

impl HeartbeatMonitor {
    /// Create a monitor; nothing is sent until [`run`](Self::run) or [`beat`](Self::beat)
    pub fn new(switch: Arc<dyn SwitchApi>, urn: MediatorUrn, interval: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            switch,
            urn,
            interval,
            events,
            started: Instant::now(),
        }
    }

    /// Subscribe to heartbeat events
    ///
    /// Subscribe before calling [`run`](Self::run) so the first, forced
    /// config delivery is not missed.
    pub fn subscribe(&self) -> broadcast::Receiver<HeartbeatEvent> {
        self.events.subscribe()
    }

    /// The configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Send one heartbeat and publish its outcome
    ///
    /// Returns the published event, if any. A successful beat without a config
    /// snapshot publishes nothing.
    pub async fn beat(&self, force_config: bool) -> Option<HeartbeatEvent> {
        let uptime = self.started.elapsed();

        let event = match self.switch.heartbeat(&self.urn, uptime, force_config).await {
            Ok(Some(config)) => Some(HeartbeatEvent::ConfigUpdated(config)),
            Ok(None) => {
                tracing::trace!(uptime_secs = uptime.as_secs(), "Heartbeat sent");
                None
            }
            Err(e) => Some(HeartbeatEvent::HeartbeatFailed(e.to_string())),
        };

        if let Some(event) = &event {
            // No receivers is not an error
            let _ = self.events.send(event.clone());
        }

        event
    }

    /// Beat until `shutdown` flips to `true`
    ///
    /// The first beat is sent immediately and forces config delivery.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            urn = %self.urn,
            interval_secs = self.interval.as_secs(),
            "Heartbeat started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut force_config = true;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.beat(force_config).await;
                    force_config = false;
                }
                _ = shutdown_requested(&mut shutdown) => break,
            }
        }

        tracing::info!(urn = %self.urn, "Heartbeat stopped");
    }

    /// Spawn [`run`](Self::run) on the runtime
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

/// Resolves once `shutdown` reads `true` or its sender is dropped
///
/// The borrow returned by `wait_for` is released before this resolves, so
/// callers can keep awaiting afterwards.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

/// Spawn the subscriber that logs heartbeat outcomes
pub fn spawn_heartbeat_logger(mut events: broadcast::Receiver<HeartbeatEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(HeartbeatEvent::HeartbeatFailed(detail)) => {
                    crate::log_heartbeat_failure!(detail);
                }
                Ok(HeartbeatEvent::ConfigUpdated(config)) => {
                    tracing::info!(config = %config.as_value(), "Received updated config");
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Heartbeat logger lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
