//! Repository layer for tracker documents.
//!
//! Ledgers are stored per combatant; turn snapshots and sustain registries per
//! actor. Process-local state (reroll queues, sustain staging, intents) is
//! never persisted.

mod documents;
mod error;
mod memory;
mod traits;

pub use documents::{ActorDocument, Documents};
pub use error::{RepositoryError, Result};
pub use memory::InMemoryDocumentStore;
pub use traits::{DocumentKey, DocumentStore};
