//! Repository contracts for per-combatant and per-actor documents.

use std::fmt;

use serde_json::Value;
use tracker_core::{ActorId, CombatantId};

use super::Result;

/// Address of a stored document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKey {
    /// The combatant's current-round ledger.
    Ledger(CombatantId),
    /// The actor's turn snapshot and sustain registry.
    Actor(ActorId),
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKey::Ledger(combatant) => write!(f, "ledger/{combatant}"),
            DocumentKey::Actor(actor) => write!(f, "actor/{actor}"),
        }
    }
}

/// Key-value store for tracker documents.
///
/// Hosts typically back this with flags on their own entities; the tracker
/// only needs whole-document reads and writes.
pub trait DocumentStore: Send + Sync {
    fn get(&self, key: &DocumentKey) -> Result<Option<Value>>;

    fn set(&self, key: DocumentKey, value: Value) -> Result<()>;

    /// Removes a document; absent keys are not an error.
    fn remove(&self, key: &DocumentKey) -> Result<()>;

    fn keys(&self) -> Result<Vec<DocumentKey>>;

    /// Removes every document.
    fn clear(&self) -> Result<usize> {
        let keys = self.keys()?;
        for key in &keys {
            self.remove(key)?;
        }
        Ok(keys.len())
    }
}
