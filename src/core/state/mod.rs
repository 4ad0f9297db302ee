// Shared mediator configuration and heartbeat-driven sync

pub mod store;
pub mod sync;

pub use store::ConfigStore;
pub use sync::spawn_config_sync;
