//! Event payloads for each topic.

use serde::{Deserialize, Serialize};
use tracker_core::{ActionLogEntry, ActorId, CombatantId, ItemId, SustainedItem, TurnSnapshot};

/// Changes to a combatant's ledger or an actor's sustain registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    EntryAdded {
        combatant: CombatantId,
        entry: ActionLogEntry,
    },
    EntryEdited {
        combatant: CombatantId,
        entry: ActionLogEntry,
    },
    EntryRemoved {
        combatant: CombatantId,
        entry: ActionLogEntry,
    },

    /// A fresh ledger was written, seeded with any condition drains.
    TurnStarted {
        combatant: CombatantId,
        snapshot: TurnSnapshot,
        drains: Vec<ActionLogEntry>,
    },
    TurnEnded {
        combatant: CombatantId,
    },

    /// The actor chose to keep an effect going this turn.
    SustainRenewed {
        actor: ActorId,
        item: SustainedItem,
    },
    /// The actor dropped a sustained effect; the host should remove it.
    SustainLapsed {
        actor: ActorId,
        item_id: ItemId,
        item_name: Option<String>,
    },

    EncounterEnded,
}

/// A sustain obligation surfaced at the start of its owner's turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SustainReminder {
    pub actor: ActorId,
    pub item_id: ItemId,
    pub item_name: String,
}
