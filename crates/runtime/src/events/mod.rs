//! Topic-based event bus for tracker events.
//!
//! Alerts, sustain reminders and ledger changes are published to separate
//! topics so hosts subscribe only to what they render.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{LedgerEvent, SustainReminder};
