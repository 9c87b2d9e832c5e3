//! Worker tasks that back the tracker.
//!
//! One combatant worker per combatant serialises that combatant's ledger
//! mutations, movement included.

mod combatant;

pub(crate) use combatant::{Command, WorkerPool};
