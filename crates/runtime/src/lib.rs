//! Async runtime for the action tracker.
//!
//! Modules are grouped by responsibility:
//! - [`api`] exposes the public surface ([`TrackerHandle`], errors, privileged requests).
//! - [`authority`] decides who may mutate.
//! - [`events`] provides the topic-based event bus.
//! - [`oracle`] bundles the collaborator lookups and their in-memory implementations.
//! - [`repository`] persists ledgers and actor documents.
//! - `services` and `workers` hold the authority-side logic and the per-combatant tasks.
//!
//! Most hosts build a [`Tracker`] with [`TrackerBuilder`], feed it
//! [`ActionSignal`]s through the handle and subscribe to the topics they render.
//!
//! [`ActionSignal`]: tracker_core::ActionSignal
pub mod api;
pub mod authority;
pub mod config;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod services;
mod workers;

pub use api::{
    PrivilegedRequest, RequestRelay, Result, RuntimeError, TrackerHandle,
    requests::{ChannelRelay, RelayedRequest},
};
pub use authority::{Admission, AuthorityGate, SessionOracle, StaticSession};
pub use config::RuntimeConfig;
pub use events::{Event, EventBus, LedgerEvent, SustainReminder, Topic};
pub use oracle::{
    ActorOracleImpl, ActorSheet, Hazard, OracleManager, RosterOracleImpl, TerrainOracleImpl,
};
pub use repository::{
    ActorDocument, DocumentKey, DocumentStore, Documents, InMemoryDocumentStore, RepositoryError,
};
pub use runtime::{Tracker, TrackerBuilder};
