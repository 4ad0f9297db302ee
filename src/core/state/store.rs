//! Shared mediator configuration
//!
//! The configuration OpenHIM pushes is replaced wholesale, never edited in
//! place. Readers take an `Arc` snapshot, so a request always sees one
//! complete configuration even while a heartbeat swaps in a new one.

use crate::domain::MediatorConfig;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Process-wide holder of the current [`MediatorConfig`]
///
/// Cloning is cheap; clones share the same underlying snapshot.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    current: Arc<ArcSwap<MediatorConfig>>,
}

impl ConfigStore {
    /// Create a store holding the empty configuration
    pub fn new() -> Self {
        Self::with_config(MediatorConfig::empty())
    }

    /// Create a store holding `config`
    pub fn with_config(config: MediatorConfig) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// The latest complete snapshot
    pub fn snapshot(&self) -> Arc<MediatorConfig> {
        self.current.load_full()
    }

    /// Atomically replaces the whole configuration
    pub fn replace(&self, config: MediatorConfig) {
        self.current.store(Arc::new(config));
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
