//! Ledger entries and the partial updates applied to them.

use crate::config::TrackerConfig;
use crate::ids::{ItemId, SourceId};

/// How an entry draws on the actor's budget.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EntryKind {
    /// A declared action spending the standard pool.
    #[default]
    Standard,
    /// Spends the reaction pool; never occupies action slots.
    Reaction,
    /// Tracker-written drain (stunned, slowed, paralyzed).
    System,
    /// Bonus action logged explicitly by the host.
    Bonus,
}

impl EntryKind {
    pub fn is_reaction(self) -> bool {
        matches!(self, EntryKind::Reaction)
    }
}

/// An effect the actor must renew each round.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SustainedItem {
    pub id: ItemId,
    pub name: String,
}

impl SustainedItem {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Distance carried by a reconciled movement segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveSegment {
    /// Measured distance in feet, including terrain surcharge.
    pub distance: u32,
    pub mode: MoveMode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MoveMode {
    #[default]
    #[strum(serialize = "Stride")]
    Stride,
    #[strum(serialize = "Step")]
    Step,
    #[strum(serialize = "Fly")]
    Fly,
}

impl MoveSegment {
    /// Picks the movement mode for a segment. A step is exactly one square,
    /// costs one action and may not enter difficult terrain.
    pub fn new(distance: u32, cost: u32, elevated: bool, difficult: bool) -> Self {
        let mode = if elevated {
            MoveMode::Fly
        } else if distance == TrackerConfig::STEP_DISTANCE && cost == 1 && !difficult {
            MoveMode::Step
        } else {
            MoveMode::Stride
        };
        Self { distance, mode }
    }

    pub fn label(&self) -> String {
        match self.mode {
            MoveMode::Step => "Step".to_owned(),
            mode => format!("{mode}: {}ft", self.distance),
        }
    }
}

/// One resolved unit of spending within a round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionLogEntry {
    pub cost: u32,
    pub source_id: SourceId,
    pub label: String,
    pub kind: EntryKind,
    pub quickened_eligible: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sustained_item: Option<SustainedItem>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub movement: Option<MoveSegment>,
}

impl ActionLogEntry {
    pub fn new(
        source_id: impl Into<SourceId>,
        label: impl Into<String>,
        cost: u32,
        kind: EntryKind,
    ) -> Self {
        Self {
            cost,
            source_id: source_id.into(),
            label: label.into(),
            kind,
            quickened_eligible: false,
            sustained_item: None,
            movement: None,
        }
    }

    /// A movement segment. Moves may always fill the quickened slot.
    pub fn movement(source_id: SourceId, segment: MoveSegment, cost: u32) -> Self {
        Self {
            cost,
            source_id,
            label: segment.label(),
            kind: EntryKind::Standard,
            quickened_eligible: true,
            sustained_item: None,
            movement: Some(segment),
        }
    }

    pub fn with_quickened_eligible(mut self, eligible: bool) -> Self {
        self.quickened_eligible = eligible;
        self
    }

    pub fn with_sustained_item(mut self, item: SustainedItem) -> Self {
        self.sustained_item = Some(item);
        self
    }

    pub fn is_move(&self) -> bool {
        self.movement.is_some()
    }

    pub fn is_reaction(&self) -> bool {
        self.kind.is_reaction()
    }

    /// Distance this entry contributes to the recorded path; zero for non-moves.
    pub fn distance(&self) -> u32 {
        self.movement.map(|segment| segment.distance).unwrap_or(0)
    }

    /// Tracker-written entries cannot be edited, only removed by the authority.
    pub fn is_immutable(&self) -> bool {
        self.kind == EntryKind::System || self.source_id.is_system()
    }
}

/// Shallow merge applied by `Ledger::edit`. `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryUpdate {
    pub cost: Option<u32>,
    pub source_id: Option<SourceId>,
    pub label: Option<String>,
    pub kind: Option<EntryKind>,
    pub quickened_eligible: Option<bool>,
    pub movement: Option<MoveSegment>,
}

impl EntryUpdate {
    /// Retargets an entry onto a replacement event.
    pub fn retarget(source_id: SourceId) -> Self {
        Self {
            source_id: Some(source_id),
            ..Self::default()
        }
    }

    /// Resizes a movement segment; label and cost follow the segment.
    pub fn resize_move(segment: MoveSegment, cost: u32) -> Self {
        Self {
            cost: Some(cost),
            label: Some(segment.label()),
            movement: Some(segment),
            ..Self::default()
        }
    }

    pub fn touches_movement(&self) -> bool {
        self.movement.is_some()
    }

    pub(crate) fn apply(self, entry: &mut ActionLogEntry) {
        if let Some(cost) = self.cost {
            entry.cost = cost;
        }
        if let Some(source_id) = self.source_id {
            entry.source_id = source_id;
        }
        if let Some(label) = self.label {
            entry.label = label;
        }
        if let Some(kind) = self.kind {
            entry.kind = kind;
        }
        if let Some(eligible) = self.quickened_eligible {
            entry.quickened_eligible = eligible;
        }
        if let Some(segment) = self.movement {
            entry.movement = Some(segment);
        }
    }
}
