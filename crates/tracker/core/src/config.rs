/// Rule constants for the action economy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackerConfig {
    /// Maximum reactions assumed when the actor sheet does not say otherwise.
    pub default_reactions: u32,
}

impl TrackerConfig {
    // ===== action economy =====
    pub const BASE_ACTION_CAP: u32 = 3;
    pub const QUICKENED_ACTION_CAP: u32 = 4;
    pub const DEFAULT_REACTIONS: u32 = 1;

    // ===== movement =====
    pub const STEP_DISTANCE: u32 = 5;
    /// Anything longer is a GM drag-and-drop, not gameplay movement.
    pub const MOVEMENT_SANITY_CEILING: u32 = 200;
    pub const DIFFICULT_SURCHARGE: u32 = 5;
    pub const GREATER_DIFFICULT_SURCHARGE: u32 = 10;

    /// Activities allowed to fill the quickened bonus slot.
    pub const QUICKENED_ELIGIBLE_SLUGS: [&'static str; 5] =
        ["strike", "stride", "step", "interact", "sustain-a-spell"];

    pub fn new() -> Self {
        Self {
            default_reactions: Self::DEFAULT_REACTIONS,
        }
    }

    pub fn is_quickened_eligible(slug: &str) -> bool {
        Self::QUICKENED_ELIGIBLE_SLUGS
            .iter()
            .any(|eligible| eligible.eq_ignore_ascii_case(slug))
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Named alert toggles the host exposes as boolean settings.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Setting {
    Overspend,
    ReactionOverspend,
    Underspend,
    SustainReminder,
}

/// Concrete flag set; every alert category is on unless switched off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertSettings {
    pub overspend: bool,
    pub reaction_overspend: bool,
    pub underspend: bool,
    pub sustain_reminder: bool,
}

impl AlertSettings {
    pub const fn all_enabled() -> Self {
        Self {
            overspend: true,
            reaction_overspend: true,
            underspend: true,
            sustain_reminder: true,
        }
    }

    pub fn get(&self, setting: Setting) -> bool {
        match setting {
            Setting::Overspend => self.overspend,
            Setting::ReactionOverspend => self.reaction_overspend,
            Setting::Underspend => self.underspend,
            Setting::SustainReminder => self.sustain_reminder,
        }
    }

    pub fn set(&mut self, setting: Setting, enabled: bool) {
        match setting {
            Setting::Overspend => self.overspend = enabled,
            Setting::ReactionOverspend => self.reaction_overspend = enabled,
            Setting::Underspend => self.underspend = enabled,
            Setting::SustainReminder => self.sustain_reminder = enabled,
        }
    }
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self::all_enabled()
    }
}
