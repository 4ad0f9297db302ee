//! Mediator lifecycle
//!
//! Startup is strictly sequential:
//!
//! ```text
//! Unregistered -> Registering -> ConfigFetching -> Serving
//!                      |               |
//!                      +---> Aborted <-+
//! ```
//!
//! The listener is bound and the heartbeat spawned only after registration
//! and the initial config fetch have both succeeded. From then on the
//! heartbeat runs beside request serving and its config events replace the
//! shared [`ConfigStore`].

use crate::adapters::openhim::SwitchApi;
use crate::core::heartbeat::{spawn_heartbeat_logger, HeartbeatMonitor, DEFAULT_HEARTBEAT_INTERVAL};
use crate::core::state::{spawn_config_sync, ConfigStore};
use crate::domain::{MediatorError, MediatorIdentity, Result};
use axum::Router;
use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Nothing sent to OpenHIM yet
    Unregistered,
    /// Registration in flight
    Registering,
    /// Registered; initial config fetch pending or done
    ConfigFetching,
    /// Listener and heartbeat running
    Serving,
    /// Startup failed; the process should exit
    Aborted,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Unregistered => "unregistered",
            LifecycleState::Registering => "registering",
            LifecycleState::ConfigFetching => "config-fetching",
            LifecycleState::Serving => "serving",
            LifecycleState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Heartbeat settings for the serving phase
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    pub heartbeat_enabled: bool,
    pub heartbeat_interval: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            heartbeat_enabled: true,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
        }
    }
}

/// Drives registration, initial config fetch and the serving phase
pub struct MediatorLifecycle {
    switch: Arc<dyn SwitchApi>,
    identity: MediatorIdentity,
    store: ConfigStore,
    options: LifecycleOptions,
    state: watch::Sender<LifecycleState>,
    config_loaded: AtomicBool,
}

impl MediatorLifecycle {
    /// Create a lifecycle in the `Unregistered` state
    ///
    /// `store` is the same store the request handler reads from.
    pub fn new(
        switch: Arc<dyn SwitchApi>,
        identity: MediatorIdentity,
        store: ConfigStore,
        options: LifecycleOptions,
    ) -> Self {
        let (state, _) = watch::channel(LifecycleState::Unregistered);
        Self {
            switch,
            identity,
            store,
            options,
            state,
            config_loaded: AtomicBool::new(false),
        }
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Observe state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// The identity registered with OpenHIM
    pub fn identity(&self) -> &MediatorIdentity {
        &self.identity
    }

    fn transition(&self, next: LifecycleState) {
        let previous = self.state.send_replace(next);
        tracing::debug!(from = %previous, to = %next, "Lifecycle transition");
    }

    /// Register the mediator with OpenHIM
    ///
    /// # Errors
    ///
    /// Returns [`MediatorError::Lifecycle`] if called outside `Unregistered`,
    /// and [`MediatorError::Startup`] (moving to `Aborted`) if OpenHIM cannot
    /// be reached or rejects the registration.
    pub async fn register(&self) -> Result<()> {
        let current = self.state();
        if current != LifecycleState::Unregistered {
            return Err(MediatorError::Lifecycle(format!(
                "register called in state {current}"
            )));
        }

        self.transition(LifecycleState::Registering);

        match self.switch.register(&self.identity).await {
            Ok(()) => {
                tracing::info!(
                    urn = %self.identity.urn(),
                    api_url = self.switch.api_url(),
                    "Successfully registered mediator"
                );
                self.transition(LifecycleState::ConfigFetching);
                Ok(())
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Mediator registration failed");
                self.transition(LifecycleState::Aborted);
                Err(MediatorError::Startup(format!(
                    "Failed to register mediator. Check your config. {e}"
                )))
            }
        }
    }

    /// Fetch the config OpenHIM holds for this mediator and install it
    ///
    /// # Errors
    ///
    /// Returns [`MediatorError::Lifecycle`] unless registration has
    /// succeeded, and [`MediatorError::Startup`] (moving to `Aborted`) if the
    /// fetch fails.
    pub async fn fetch_initial_config(&self) -> Result<()> {
        let current = self.state();
        if current != LifecycleState::ConfigFetching {
            return Err(MediatorError::Lifecycle(format!(
                "initial config fetch requires a successful registration, state is {current}"
            )));
        }

        match self.switch.fetch_config(self.identity.urn()).await {
            Ok(config) => {
                tracing::info!(config = %config.as_value(), "Initial config");
                self.store.replace(config);
                self.config_loaded.store(true, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Initial config fetch failed");
                self.transition(LifecycleState::Aborted);
                Err(MediatorError::Startup(format!(
                    "Failed to fetch initial config. {e}"
                )))
            }
        }
    }

    /// Register, then fetch the initial config
    ///
    /// The fetch is never attempted if registration fails.
    pub async fn start(&self) -> Result<()> {
        self.register().await?;
        self.fetch_initial_config().await
    }

    /// Enter `Serving` on an already bound listener
    ///
    /// Spawns the heartbeat (when enabled) with its config-sync and logger
    /// subscribers, then serves `router` until `shutdown` flips to `true`.
    ///
    /// # Errors
    ///
    /// Returns [`MediatorError::Lifecycle`] if startup has not completed, and
    /// [`MediatorError::Io`] if the server fails.
    pub async fn serve(
        &self,
        listener: TcpListener,
        router: Router,
        shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let current = self.state();
        if current != LifecycleState::ConfigFetching || !self.config_loaded.load(Ordering::SeqCst) {
            return Err(MediatorError::Lifecycle(format!(
                "cannot serve before registration and initial config fetch succeed, state is {current}"
            )));
        }

        self.transition(LifecycleState::Serving);

        let heartbeat = if self.options.heartbeat_enabled {
            let monitor = HeartbeatMonitor::new(
                Arc::clone(&self.switch),
                self.identity.urn().clone(),
                self.options.heartbeat_interval,
            );
            spawn_config_sync(self.store.clone(), monitor.subscribe());
            spawn_heartbeat_logger(monitor.subscribe());
            Some(monitor.spawn(shutdown.clone()))
        } else {
            tracing::info!("Heartbeat disabled; config changes require a restart");
            None
        };

        let served = crate::server::serve(listener, router, shutdown).await;

        if let Some(handle) = heartbeat {
            handle.abort();
        }

        served.map_err(|e| MediatorError::Io(format!("Server error: {e}")))
    }

    /// Full startup: register, fetch config, bind `addr`, serve
    ///
    /// # Errors
    ///
    /// Startup failures are [`MediatorError::Startup`]; a bind failure is
    /// [`MediatorError::Io`].
    pub async fn run(
        &self,
        addr: SocketAddr,
        router: Router,
        shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        self.start().await?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| MediatorError::Io(format!("Failed to bind {addr}: {e}")))?;

        tracing::info!(address = %addr, "Listening");

        self.serve(listener, router, shutdown).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MediatorConfig, MediatorUrn, SwitchError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct FakeSwitch {
        reject_registration: bool,
        fail_fetch: bool,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl SwitchApi for FakeSwitch {
        async fn register(&self, _identity: &MediatorIdentity) -> Result<()> {
            if self.reject_registration {
                return Err(SwitchError::RegistrationRejected {
                    status: 400,
                    body: "invalid".to_string(),
                }
                .into());
            }
            Ok(())
        }

        async fn fetch_config(&self, _urn: &MediatorUrn) -> Result<MediatorConfig> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch {
                return Err(SwitchError::ConnectionFailed("refused".to_string()).into());
            }
            Ok(MediatorConfig::from_value(json!({
                "dhis": {"url": "http://dhis/", "path": "api/metadata.xml"}
            })))
        }

        async fn heartbeat(
            &self,
            _urn: &MediatorUrn,
            _uptime: Duration,
            _force_config: bool,
        ) -> Result<Option<MediatorConfig>> {
            Ok(None)
        }

        fn api_url(&self) -> &str {
            "http://switch.test"
        }
    }

    fn lifecycle(switch: FakeSwitch, store: ConfigStore) -> MediatorLifecycle {
        MediatorLifecycle::new(
            Arc::new(switch),
            MediatorIdentity::bundled().unwrap(),
            store,
            LifecycleOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_start_installs_initial_config() {
        let store = ConfigStore::new();
        let lifecycle = lifecycle(FakeSwitch::default(), store.clone());

        lifecycle.start().await.unwrap();

        assert_eq!(lifecycle.state(), LifecycleState::ConfigFetching);
        assert_eq!(store.snapshot().upstream().unwrap().url, "http://dhis/");
    }

    #[tokio::test]
    async fn test_registration_failure_aborts() {
        let lifecycle = lifecycle(
            FakeSwitch {
                reject_registration: true,
                ..Default::default()
            },
            ConfigStore::new(),
        );

        let err = lifecycle.start().await.unwrap_err();

        assert!(err.is_fatal_startup());
        assert_eq!(lifecycle.state(), LifecycleState::Aborted);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts() {
        let lifecycle = lifecycle(
            FakeSwitch {
                fail_fetch: true,
                ..Default::default()
            },
            ConfigStore::new(),
        );

        let err = lifecycle.start().await.unwrap_err();

        assert!(err.is_fatal_startup());
        assert_eq!(lifecycle.state(), LifecycleState::Aborted);
    }

    #[tokio::test]
    async fn test_fetch_requires_registration() {
        let lifecycle = lifecycle(FakeSwitch::default(), ConfigStore::new());

        let err = lifecycle.fetch_initial_config().await.unwrap_err();

        assert!(matches!(err, MediatorError::Lifecycle(_)));
        assert_eq!(lifecycle.state(), LifecycleState::Unregistered);
    }

    #[tokio::test]
    async fn test_register_twice_is_rejected() {
        let lifecycle = lifecycle(FakeSwitch::default(), ConfigStore::new());
        lifecycle.register().await.unwrap();

        assert!(matches!(
            lifecycle.register().await,
            Err(MediatorError::Lifecycle(_))
        ));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(LifecycleState::ConfigFetching.to_string(), "config-fetching");
        assert_eq!(LifecycleState::Aborted.to_string(), "aborted");
    }
}
