//! Typed access to the documents the tracker persists.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracker_core::{ActorId, CombatantId, Ledger, SustainRegistry, TurnSnapshot};

use super::{DocumentKey, DocumentStore, RepositoryError, Result};

/// Per-actor state that outlives a single turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ActorDocument {
    /// Captured at the actor's last turn start.
    pub snapshot: TurnSnapshot,
    pub sustained: SustainRegistry,
}

/// Serialises ledgers and actor documents into a [`DocumentStore`].
///
/// Absent documents read back as their defaults.
#[derive(Clone)]
pub struct Documents {
    store: Arc<dyn DocumentStore>,
}

impl Documents {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn ledger(&self, combatant: &CombatantId) -> Result<Ledger> {
        self.load(DocumentKey::Ledger(combatant.clone()))
    }

    pub fn save_ledger(&self, combatant: &CombatantId, ledger: &Ledger) -> Result<()> {
        self.save(DocumentKey::Ledger(combatant.clone()), ledger)
    }

    pub fn actor(&self, actor: &ActorId) -> Result<ActorDocument> {
        self.load(DocumentKey::Actor(actor.clone()))
    }

    pub fn save_actor(&self, actor: &ActorId, document: &ActorDocument) -> Result<()> {
        self.save(DocumentKey::Actor(actor.clone()), document)
    }

    pub fn clear(&self) -> Result<usize> {
        self.store.clear()
    }

    fn load<T: DeserializeOwned + Default>(&self, key: DocumentKey) -> Result<T> {
        match self.store.get(&key)? {
            Some(value) => serde_json::from_value(value).map_err(|err| {
                RepositoryError::CorruptedDocument {
                    key,
                    message: err.to_string(),
                }
            }),
            None => Ok(T::default()),
        }
    }

    fn save<T: Serialize>(&self, key: DocumentKey, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|err| RepositoryError::Encode {
            key: key.clone(),
            message: err.to_string(),
        })?;
        self.store.set(key, value)
    }
}
