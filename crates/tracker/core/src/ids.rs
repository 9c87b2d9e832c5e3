//! Opaque identifiers for combatants, actors, items and log sources.
//!
//! All identities come from the host; the tracker never invents them except
//! for reserved system sources and movement segments.
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// A participant slot in the encounter's initiative order.
    CombatantId
);
string_id!(
    /// The creature sheet behind a combatant. Conditions, speeds and the
    /// sustain registry belong to the actor, not the combatant.
    ActorId
);
string_id!(
    /// An item, spell, feat or effect owned by an actor.
    ItemId
);
string_id!(
    /// A participant (player or GM) viewing the encounter.
    UserId
);
string_id!(
    /// Identity of the event that produced a ledger entry.
    SourceId
);

impl SourceId {
    const SYSTEM_PREFIX: &'static str = "system:";
    const MOVE_PREFIX: &'static str = "move-";

    /// Source of the start-of-turn action drain.
    pub fn action_drain() -> Self {
        Self(format!("{}actions", Self::SYSTEM_PREFIX))
    }

    /// Source of the start-of-turn reaction drain.
    pub fn reaction_drain() -> Self {
        Self(format!("{}reaction", Self::SYSTEM_PREFIX))
    }

    /// Source id for the `sequence`-th movement segment of a combatant.
    pub fn movement(combatant: &CombatantId, sequence: u64) -> Self {
        Self(format!("{}{}-{}", Self::MOVE_PREFIX, combatant, sequence))
    }

    /// Reserved sources are written by the tracker itself, never by the host.
    pub fn is_system(&self) -> bool {
        self.0.starts_with(Self::SYSTEM_PREFIX)
    }
}
