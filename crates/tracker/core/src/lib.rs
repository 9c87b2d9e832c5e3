//! Action-economy rules and data types for turn-based encounters.
//!
//! `tracker-core` classifies host declarations into action costs, keeps the
//! per-round [`Ledger`] consistent under edits, undos and rerolls, plans
//! movement reconciliation and turn-start drains, and evaluates economy
//! alerts. Everything here is synchronous and free of I/O; the runtime crate
//! owns persistence, authority and concurrency.
pub mod classify;
pub mod config;
pub mod economy;
pub mod entry;
pub mod env;
pub mod ids;
pub mod intent;
pub mod ledger;
pub mod movement;
pub mod reroll;
pub mod signal;
pub mod sustain;
pub mod turn;

pub use classify::{ActionDescriptor, Rejection, classify, is_sustain_declaration, sustain_metadata};
pub use config::{AlertSettings, Setting, TrackerConfig};
pub use economy::{Alert, AlertCategory, EconomyMonitor};
pub use entry::{ActionLogEntry, EntryKind, EntryUpdate, MoveMode, MoveSegment, SustainedItem};
pub use env::{ActorOracle, Condition, RosterOracle, SettingsOracle, Terrain, TerrainOracle};
pub use ids::{ActorId, CombatantId, ItemId, SourceId, UserId};
pub use intent::IntentRegistry;
pub use ledger::{EntryTarget, Ledger, LedgerError, Mutation, Slot, SlotKind, SlotPlan};
pub use movement::{IgnoreReason, MeasuredPath, MovePlan, MoveStep, plan_movement};
pub use reroll::RerollQueues;
pub use signal::{
    ActionSignal, ActionType, ContextKind, Declaration, ItemRecord, ItemType, MovementUpdate,
    Origin, PathPoint, SignalContext, SustainDecision, TrackerMarkers, TurnChange, TurnPointer,
    Visibility,
};
pub use sustain::{SustainRegistry, SustainStaging};
pub use turn::{ConditionReadout, TurnPhase, TurnSnapshot, TurnStartPlan, plan_turn_start};
