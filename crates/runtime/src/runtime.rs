//! High-level tracker orchestrator.
//!
//! The tracker owns the per-encounter context and the combatant workers, and
//! exposes a builder-based API for hosts to wire in their oracles, storage
//! and request relay.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracker_core::SettingsOracle;

use crate::api::{RequestRelay, Result, RuntimeError, TrackerHandle};
use crate::authority::AuthorityGate;
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, Topic};
use crate::oracle::OracleManager;
use crate::repository::{DocumentStore, Documents, InMemoryDocumentStore};
use crate::services::TrackerContext;
use crate::workers::WorkerPool;

/// Main tracker that coordinates ingest and combatant workers
///
/// [`TrackerHandle`] provides a cloneable façade for hosts.
pub struct Tracker {
    handle: TrackerHandle,
}

impl Tracker {
    pub fn builder() -> TrackerBuilder {
        TrackerBuilder::new()
    }

    /// Get a cloneable handle to this tracker
    pub fn handle(&self) -> TrackerHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Let every worker finish its queue, then stop them.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown_workers().await
    }
}

/// Builder for [`Tracker`].
pub struct TrackerBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    settings: Option<Arc<dyn SettingsOracle>>,
    store: Option<Arc<dyn DocumentStore>>,
    relay: Option<Arc<dyn RequestRelay>>,
}

impl TrackerBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            settings: None,
            store: None,
            relay: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Host-backed alert toggles. Without one, `config.alerts` is used.
    pub fn settings(mut self, settings: Arc<dyn SettingsOracle>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Document storage. Defaults to an in-memory store.
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Transport to the session authority, for non-authoritative participants.
    pub fn relay(mut self, relay: Arc<dyn RequestRelay>) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Build the tracker. Workers start lazily inside the caller's tokio runtime.
    pub fn build(self) -> Result<Tracker> {
        let settings = self
            .settings
            .unwrap_or_else(|| Arc::new(self.config.alerts));
        let oracles = self
            .oracles
            .ok_or(RuntimeError::MissingOracles)?
            .with_settings(settings);
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryDocumentStore::new()));

        let gate = AuthorityGate::new(Arc::clone(&oracles.session));
        let events = EventBus::with_capacity(self.config.event_capacity);
        let ctx = Arc::new(TrackerContext::new(
            Documents::new(store),
            oracles,
            gate,
            events,
        ));
        let workers = Arc::new(WorkerPool::new(
            Arc::clone(&ctx),
            self.config.movement_queue,
        ));

        tracing::debug!(
            authority = ctx.gate.is_authority(),
            relay = self.relay.is_some(),
            "tracker built"
        );
        Ok(Tracker {
            handle: TrackerHandle::new(ctx, workers, self.relay),
        })
    }
}
