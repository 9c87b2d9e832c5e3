//! Input vocabulary: every host event the tracker reacts to.
//!
//! Host payloads are loosely typed; each field the classifier may consult is
//! spelled out here as an explicit optional so extraction stays a pure
//! function of this structure.

use crate::ids::{ActorId, CombatantId, ItemId, SourceId, UserId};

/// A host event routed into the tracker.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ActionSignal {
    /// A chat-style action declaration was created or updated.
    Declaration(Declaration),
    /// A declaration was deleted by the host.
    DeclarationDeleted { actor: ActorId, source_id: SourceId },
    /// A declaration is about to be superseded by a reroll.
    RerollRequested { actor: ActorId, source_id: SourceId },
    /// An actor announced which item it intends to use next.
    IntentDeclared { actor: ActorId, item_id: ItemId },
    /// A token's path changed.
    Movement(MovementUpdate),
    /// Initiative advanced or rewound.
    TurnChange(TurnChange),
    /// An actor answered a sustain reminder.
    SustainChoice {
        actor: ActorId,
        item_id: ItemId,
        #[cfg_attr(feature = "serde", serde(default))]
        item_name: String,
        choice: SustainDecision,
    },
    /// The encounter was deleted; all tracker state is discarded.
    EncounterEnded,
}

impl ActionSignal {
    /// Short label used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ActionSignal::Declaration(_) => "declaration",
            ActionSignal::DeclarationDeleted { .. } => "declaration_deleted",
            ActionSignal::RerollRequested { .. } => "reroll_requested",
            ActionSignal::IntentDeclared { .. } => "intent_declared",
            ActionSignal::Movement(_) => "movement",
            ActionSignal::TurnChange(_) => "turn_change",
            ActionSignal::SustainChoice { .. } => "sustain_choice",
            ActionSignal::EncounterEnded => "encounter_ended",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SustainDecision {
    #[cfg_attr(feature = "serde", serde(alias = "yes"))]
    #[strum(to_string = "sustain", serialize = "yes")]
    Sustain,
    #[cfg_attr(feature = "serde", serde(alias = "no"))]
    #[strum(to_string = "lapse", serialize = "no")]
    Lapse,
}

/// Who may read a declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Visibility {
    /// Explicit recipients; empty means public.
    pub whisper: Vec<UserId>,
    /// Blind rolls are hidden even from their author.
    pub blind: bool,
}

impl Visibility {
    pub fn is_visible_to(&self, viewer: &UserId) -> bool {
        !self.blind && (self.whisper.is_empty() || self.whisper.contains(viewer))
    }
}

/// What kind of roll or card the host rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ContextKind {
    Action,
    SpellCast,
    SkillCheck,
    AttackRoll,
    /// The attack roll a spell makes on behalf of its own cast action.
    SpellAttackRoll,
    DamageRoll,
    SavingThrow,
    FlatCheck,
    RecoveryCheck,
    Other,
}

impl ContextKind {
    /// Rolls that resolve something already declared; never an action on their own.
    pub fn is_resolution_roll(self) -> bool {
        matches!(
            self,
            ContextKind::AttackRoll
                | ContextKind::DamageRoll
                | ContextKind::SavingThrow
                | ContextKind::FlatCheck
                | ContextKind::RecoveryCheck
        )
    }
}

/// Structured context tags attached by the game system.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SignalContext {
    pub kind: Option<ContextKind>,
    pub title: Option<String>,
    /// Machine-readable action identifier (`stride`, `sustain-a-spell`, ...).
    pub action: Option<String>,
    /// Roll options such as `num-actions:2` or `trait:reaction`.
    pub options: Vec<String>,
    pub is_reroll: bool,
}

impl SignalContext {
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemType {
    Spell,
    Action,
    Feat,
    Weapon,
    Consumable,
    Equipment,
    Effect,
    #[default]
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionType {
    Action,
    Reaction,
    Free,
    Passive,
}

/// Where the declaration came from, as reported by the game system.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Origin {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub item_id: Option<ItemId>,
    pub item_type: Option<ItemType>,
}

/// The item record linked to a declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    pub slug: Option<String>,
    pub item_type: ItemType,
    /// Raw action time as the sheet stores it: `"2"`, `"reaction"`, `"free"`.
    pub time: Option<String>,
    pub action_type: Option<ActionType>,
    /// Duration requires sustaining.
    pub sustained: bool,
    pub description: Option<String>,
}

impl ItemRecord {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            item_type,
            ..Self::default()
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_action_type(mut self, action_type: ActionType) -> Self {
        self.action_type = Some(action_type);
        self
    }

    pub fn sustained(mut self) -> Self {
        self.sustained = true;
        self
    }
}

/// Metadata the tracker itself stamps onto declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerMarkers {
    /// The declaration was synthesised by a sustain choice.
    pub sustain_automation: bool,
    pub sustained_item_id: Option<ItemId>,
    pub sustained_item_name: Option<String>,
    /// The actor deliberately used this item (consumables only count when set).
    pub explicit_use: bool,
}

/// A chat-style declaration as delivered by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
    pub id: SourceId,
    pub actor: ActorId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
    /// Rendered header text, possibly containing an action heading and glyph.
    #[cfg_attr(feature = "serde", serde(default))]
    pub flavor: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub context: Option<SignalContext>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub origin: Option<Origin>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub item: Option<ItemRecord>,
    /// Spell cast through another item (wand, scroll, staff).
    #[cfg_attr(feature = "serde", serde(default))]
    pub embedded_spell: Option<ItemRecord>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub markers: TrackerMarkers,
}

impl Declaration {
    pub fn new(id: impl Into<SourceId>, actor: impl Into<ActorId>) -> Self {
        Self {
            id: id.into(),
            actor: actor.into(),
            ..Self::default()
        }
    }

    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = Some(flavor.into());
        self
    }

    pub fn with_context(mut self, context: SignalContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_item(mut self, item: ItemRecord) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Declaration renewing a sustained effect for one action.
    pub fn sustain(id: impl Into<SourceId>, actor: impl Into<ActorId>, item_id: ItemId, name: &str) -> Self {
        let name = if name.is_empty() { "Action" } else { name };
        Self::new(id, actor)
            .with_flavor(
                r#"<h4 class="action"><strong>Sustain</strong> <span class="action-glyph">1</span></h4>"#,
            )
            .with_origin(Origin {
                slug: Some("sustain-a-spell".into()),
                name: Some(name.to_owned()),
                item_id: Some(item_id.clone()),
                item_type: None,
            })
            .with_context(SignalContext {
                kind: Some(ContextKind::Action),
                title: Some(format!("Sustain: {name}")),
                action: Some("sustain-a-spell".into()),
                options: vec!["num-actions:1".into(), "action:sustain-a-spell".into()],
                is_reroll: false,
            })
            .with_markers(TrackerMarkers {
                sustain_automation: true,
                sustained_item_id: Some(item_id),
                sustained_item_name: Some(name.to_owned()),
                explicit_use: false,
            })
    }

    pub fn with_markers(mut self, markers: TrackerMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn is_reroll(&self) -> bool {
        self.context.as_ref().is_some_and(|c| c.is_reroll)
    }

    /// Item the declaration originates from, by whichever reference is present.
    pub fn origin_item_id(&self) -> Option<&ItemId> {
        self.origin
            .as_ref()
            .and_then(|o| o.item_id.as_ref())
            .or(self.item.as_ref().map(|i| &i.id))
    }
}

/// One vertex of a token's path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation: f64,
}

impl PathPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            elevation: 0.0,
        }
    }

    pub const fn elevated(x: f64, y: f64, elevation: f64) -> Self {
        Self { x, y, elevation }
    }
}

/// The full path a combatant's token has travelled this turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementUpdate {
    pub combatant: CombatantId,
    /// Empty means the host cleared the path entirely.
    pub points: Vec<PathPoint>,
}

impl MovementUpdate {
    pub fn new(combatant: impl Into<CombatantId>, points: Vec<PathPoint>) -> Self {
        Self {
            combatant: combatant.into(),
            points,
        }
    }
}

/// A position in initiative order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnPointer {
    pub round: u32,
    pub turn: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub combatant: Option<CombatantId>,
}

impl TurnPointer {
    pub fn new(round: u32, turn: u32, combatant: impl Into<CombatantId>) -> Self {
        Self {
            round,
            turn,
            combatant: Some(combatant.into()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnChange {
    #[cfg_attr(feature = "serde", serde(default))]
    pub previous: Option<TurnPointer>,
    pub current: TurnPointer,
}

impl TurnChange {
    /// Rewinds are ignored; only forward progress ends and starts turns.
    pub fn is_forward(&self) -> bool {
        let Some(previous) = &self.previous else {
            return true;
        };
        previous.round == 0
            || self.current.round > previous.round
            || (self.current.round == previous.round && self.current.turn > previous.turn)
    }
}
