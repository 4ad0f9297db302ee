//! Integration tests for the mediator lifecycle
//!
//! OpenHIM is played by an in-memory switch so the tests can script
//! registration, config fetch and heartbeat outcomes.

use async_trait::async_trait;
use dhis_mediator::adapters::dhis::UpstreamClient;
use dhis_mediator::adapters::openhim::SwitchApi;
use dhis_mediator::config::UpstreamConfig;
use dhis_mediator::core::handler::FacilityService;
use dhis_mediator::core::lifecycle::{LifecycleOptions, LifecycleState, MediatorLifecycle};
use dhis_mediator::core::state::ConfigStore;
use dhis_mediator::domain::{
    MediatorConfig, MediatorError, MediatorIdentity, MediatorUrn, Result, SwitchError,
};
use dhis_mediator::server::{router, CATCH_ALL_TEXT};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// What the scripted switch answers to heartbeats
#[derive(Clone)]
enum HeartbeatReply {
    Nothing,
    Config(MediatorConfig),
    Fail,
}

struct ScriptedSwitch {
    reject_registration: bool,
    heartbeat_reply: Mutex<HeartbeatReply>,
    fetches: AtomicUsize,
    heartbeats: AtomicUsize,
}

impl ScriptedSwitch {
    fn new(heartbeat_reply: HeartbeatReply) -> Self {
        Self {
            reject_registration: false,
            heartbeat_reply: Mutex::new(heartbeat_reply),
            fetches: AtomicUsize::new(0),
            heartbeats: AtomicUsize::new(0),
        }
    }

    fn rejecting() -> Self {
        Self {
            reject_registration: true,
            ..Self::new(HeartbeatReply::Nothing)
        }
    }
}

#[async_trait]
impl SwitchApi for ScriptedSwitch {
    async fn register(&self, _identity: &MediatorIdentity) -> Result<()> {
        if self.reject_registration {
            return Err(SwitchError::RegistrationRejected {
                status: 400,
                body: "Invalid mediator".to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn fetch_config(&self, _urn: &MediatorUrn) -> Result<MediatorConfig> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(initial_config())
    }

    async fn heartbeat(
        &self,
        _urn: &MediatorUrn,
        _uptime: Duration,
        _force_config: bool,
    ) -> Result<Option<MediatorConfig>> {
        self.heartbeats.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .heartbeat_reply
            .lock()
            .map(|reply| reply.clone())
            .unwrap_or(HeartbeatReply::Nothing);
        match reply {
            HeartbeatReply::Nothing => Ok(None),
            HeartbeatReply::Config(config) => Ok(Some(config)),
            HeartbeatReply::Fail => Err(SwitchError::HeartbeatRejected { status: 500 }.into()),
        }
    }

    fn api_url(&self) -> &str {
        "http://switch.test"
    }
}

fn initial_config() -> MediatorConfig {
    MediatorConfig::from_value(json!({
        "dhis": {"url": "http://dhis-initial/", "path": "api/metadata.xml"}
    }))
}

fn options(heartbeat_enabled: bool) -> LifecycleOptions {
    LifecycleOptions {
        heartbeat_enabled,
        heartbeat_interval: Duration::from_millis(50),
    }
}

fn build(switch: Arc<ScriptedSwitch>, store: ConfigStore, heartbeat: bool) -> Arc<MediatorLifecycle> {
    Arc::new(MediatorLifecycle::new(
        switch,
        MediatorIdentity::bundled().unwrap(),
        store,
        options(heartbeat),
    ))
}

fn app(store: ConfigStore) -> axum::Router {
    let service = FacilityService::new(
        MediatorUrn::new("urn:mediator:lifecycle-test").unwrap(),
        store,
        UpstreamClient::new(&UpstreamConfig::default()).unwrap(),
    );
    router(Arc::new(service))
}

/// Start, bind an ephemeral port and serve in the background
async fn serve_in_background(
    lifecycle: Arc<MediatorLifecycle>,
    store: ConfigStore,
) -> (
    String,
    watch::Sender<bool>,
    tokio::task::JoinHandle<Result<()>>,
) {
    lifecycle.start().await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move { lifecycle.serve(listener, app(store), shutdown_rx).await });

    (base_url, shutdown_tx, handle)
}

#[tokio::test]
async fn test_registration_failure_skips_config_fetch() {
    let switch = Arc::new(ScriptedSwitch::rejecting());
    let lifecycle = build(Arc::clone(&switch), ConfigStore::new(), true);

    let err = lifecycle.start().await.unwrap_err();

    assert!(matches!(err, MediatorError::Startup(_)));
    assert!(err.to_string().contains("Failed to register mediator"));
    assert_eq!(lifecycle.state(), LifecycleState::Aborted);
    assert_eq!(switch.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_serve_before_start_is_rejected() {
    let switch = Arc::new(ScriptedSwitch::new(HeartbeatReply::Nothing));
    let store = ConfigStore::new();
    let lifecycle = build(switch, store.clone(), false);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (_tx, rx) = watch::channel(false);

    let err = lifecycle.serve(listener, app(store), rx).await.unwrap_err();

    assert!(matches!(err, MediatorError::Lifecycle(_)));
    assert_eq!(lifecycle.state(), LifecycleState::Unregistered);
}

#[tokio::test]
async fn test_heartbeat_config_replaces_store() {
    let pushed = MediatorConfig::from_value(json!({
        "dhis": {"url": "http://dhis-pushed/", "path": "api/organisationUnits.xml"}
    }));
    let switch = Arc::new(ScriptedSwitch::new(HeartbeatReply::Config(pushed.clone())));
    let store = ConfigStore::new();
    let lifecycle = build(Arc::clone(&switch), store.clone(), true);

    let (_, shutdown_tx, handle) = serve_in_background(Arc::clone(&lifecycle), store.clone()).await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(lifecycle.state(), LifecycleState::Serving);
    assert_eq!(*store.snapshot(), pushed);
    assert!(switch.heartbeats.load(Ordering::SeqCst) >= 1);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_heartbeat_failure_keeps_serving() {
    let switch = Arc::new(ScriptedSwitch::new(HeartbeatReply::Fail));
    let store = ConfigStore::new();
    let lifecycle = build(Arc::clone(&switch), store.clone(), true);

    let (base_url, shutdown_tx, handle) =
        serve_in_background(Arc::clone(&lifecycle), store.clone()).await;
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(switch.heartbeats.load(Ordering::SeqCst) >= 2);
    assert_eq!(lifecycle.state(), LifecycleState::Serving);
    assert_eq!(*store.snapshot(), initial_config());

    let body = reqwest::get(format!("{base_url}/status"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, CATCH_ALL_TEXT);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_disabled_heartbeat_sends_nothing() {
    let switch = Arc::new(ScriptedSwitch::new(HeartbeatReply::Nothing));
    let store = ConfigStore::new();
    let lifecycle = build(Arc::clone(&switch), store.clone(), false);

    let (_, shutdown_tx, handle) = serve_in_background(lifecycle, store).await;
    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(switch.heartbeats.load(Ordering::SeqCst), 0);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_shutdown_stops_listener() {
    let switch = Arc::new(ScriptedSwitch::new(HeartbeatReply::Nothing));
    let store = ConfigStore::new();
    let lifecycle = build(switch, store.clone(), true);

    let (base_url, shutdown_tx, handle) = serve_in_background(lifecycle, store).await;

    let response = reqwest::get(format!("{base_url}/")).await.unwrap();
    assert!(response.status().is_success());

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();

    assert!(reqwest::get(format!("{base_url}/")).await.is_err());
}
