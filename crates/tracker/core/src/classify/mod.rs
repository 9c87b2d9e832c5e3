//! Declaration classification.
//!
//! [`classify`] normalises one declaration into an [`ActionDescriptor`].
//! Cost, label, slug and reaction status are each derived by an independent
//! fallback chain; the first step that yields a value wins.
mod sustain;
pub mod text;

pub use sustain::{is_sustain_declaration, sustain_metadata};

use crate::ids::UserId;
use crate::signal::{ActionType, ContextKind, Declaration, ItemType};

/// Normalised action derived from a declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionDescriptor {
    pub cost: u32,
    pub label: String,
    /// Only used for quickened-eligibility matching; may be empty.
    pub slug: String,
    pub is_reaction: bool,
    /// The viewer could not read the declaration and the label was redacted.
    pub redacted: bool,
}

/// Why a declaration produced no descriptor before cost derivation ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    /// Damage, attack, save, flat or recovery roll.
    ResolutionRoll,
    /// Attack roll nested inside its own spellcasting action.
    NestedSpellAttack,
    /// Consumable item without an explicit use intent.
    UnmarkedConsumable,
    NoActionableContext,
}

pub const SECRET_LABEL: &str = "Secret Action";
const DEFAULT_LABEL: &str = "Action";
const SUSTAIN_SLUG: &str = "sustain-a-spell";

/// Classifies a declaration from the point of view of `viewer`.
///
/// Returns `None` for rejected, unparseable and untracked (free, non-reaction)
/// declarations.
pub fn classify(decl: &Declaration, viewer: &UserId) -> Option<ActionDescriptor> {
    if rejection(decl).is_some() {
        return None;
    }
    let cost = derive_cost(decl)?;
    let is_reaction = is_reaction(decl);
    if cost == 0 && !is_reaction {
        return None;
    }

    let redacted = !decl.visibility.is_visible_to(viewer);
    let label = if redacted {
        SECRET_LABEL.to_owned()
    } else {
        derive_label(decl)
    };

    Some(ActionDescriptor {
        cost,
        label,
        slug: derive_slug(decl),
        is_reaction,
        redacted,
    })
}

/// First matching rejection rule, if any.
pub fn rejection(decl: &Declaration) -> Option<Rejection> {
    let kind = decl.context.as_ref().and_then(|c| c.kind);
    if kind.is_some_and(ContextKind::is_resolution_roll) {
        return Some(Rejection::ResolutionRoll);
    }
    if kind == Some(ContextKind::SpellAttackRoll) {
        return Some(Rejection::NestedSpellAttack);
    }
    if is_consumable(decl) && !decl.markers.explicit_use {
        return Some(Rejection::UnmarkedConsumable);
    }

    let marked = decl.markers.explicit_use || decl.markers.sustain_automation;
    let has_context = decl.context.is_some()
        || decl.item.is_some()
        || decl.origin.as_ref().is_some_and(|o| o.slug.is_some())
        || decl.flavor.as_deref().is_some_and(text::has_action_heading);
    if !has_context && !marked {
        return Some(Rejection::NoActionableContext);
    }
    None
}

fn is_consumable(decl: &Declaration) -> bool {
    decl.item
        .as_ref()
        .is_some_and(|item| item.item_type == ItemType::Consumable)
        || decl
            .origin
            .as_ref()
            .is_some_and(|o| o.item_type == Some(ItemType::Consumable))
}

pub fn derive_cost(decl: &Declaration) -> Option<u32> {
    if decl.markers.sustain_automation || sustain::has_sustain_slug(decl) {
        return Some(1);
    }
    if let Some(count) = decl
        .context
        .as_ref()
        .and_then(|c| text::action_count(&c.options))
    {
        return Some(count);
    }
    if is_consumable(decl) && decl.markers.explicit_use {
        return Some(1);
    }
    if let Some(flavor) = decl.flavor.as_deref().filter(|f| text::has_action_heading(f)) {
        // A heading without a glyph is a single action the system did not annotate.
        return Some(text::glyph(flavor).map_or(1, text::Glyph::cost));
    }

    let item = decl.item.as_ref()?;
    if let Some(time) = item.time.as_deref().map(str::trim) {
        if time.eq_ignore_ascii_case("reaction") || time.eq_ignore_ascii_case("free") {
            return Some(0);
        }
        if let Ok(n) = time.parse() {
            return Some(n);
        }
    }
    match item.item_type {
        ItemType::Spell => Some(2),
        ItemType::Action | ItemType::Feat | ItemType::Weapon => Some(1),
        _ => None,
    }
}

pub fn derive_label(decl: &Declaration) -> String {
    let explicit = decl
        .context
        .as_ref()
        .and_then(|c| c.title.as_deref())
        .or(decl.item.as_ref().map(|item| item.name.as_str()))
        .filter(|label| !label.is_empty());
    if let Some(label) = explicit {
        return text::strip_parens(label);
    }

    if let Some((title, subtitle)) = decl.flavor.as_deref().and_then(text::heading) {
        let full = match subtitle {
            Some(subtitle) => format!("{title} {subtitle}"),
            None => title,
        };
        return text::strip_parens(&full);
    }

    let name = sustain::sustain_name(decl);
    if name != DEFAULT_LABEL {
        return name;
    }
    DEFAULT_LABEL.to_owned()
}

pub fn derive_slug(decl: &Declaration) -> String {
    if decl.markers.sustain_automation {
        return SUSTAIN_SLUG.to_owned();
    }
    let explicit = decl
        .context
        .as_ref()
        .and_then(|c| c.action.as_deref())
        .or(decl.origin.as_ref().and_then(|o| o.slug.as_deref()))
        .or(decl.item.as_ref().and_then(|item| item.slug.as_deref()))
        .filter(|slug| !slug.is_empty());
    if let Some(slug) = explicit {
        return slug.to_owned();
    }
    decl.flavor
        .as_deref()
        .and_then(text::heading)
        .map(|(title, _)| text::synthetic_slug(&title))
        .unwrap_or_default()
}

/// Reaction status comes from the trait option or the item's action type.
/// A rendered `R` glyph on its own does not count.
pub fn is_reaction(decl: &Declaration) -> bool {
    decl.context
        .as_ref()
        .is_some_and(|c| c.has_option("trait:reaction"))
        || decl
            .item
            .as_ref()
            .is_some_and(|item| item.action_type == Some(ActionType::Reaction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ItemId;
    use crate::signal::{ItemRecord, Origin, SignalContext, TrackerMarkers, Visibility};

    fn viewer() -> UserId {
        UserId::from("gm")
    }

    fn heading(glyph: &str) -> String {
        format!(
            r#"<h4 class="action"><strong>Demoralize</strong> <span class="action-glyph">{glyph}</span></h4>"#
        )
    }

    #[test]
    fn glyph_two_is_a_two_action_standard() {
        let decl = Declaration::new("m1", "a1").with_flavor(heading("2"));
        let descriptor = classify(&decl, &viewer()).unwrap();
        assert_eq!(descriptor.cost, 2);
        assert!(!descriptor.is_reaction);
        assert_eq!(descriptor.label, "Demoralize");
        assert_eq!(descriptor.slug, "demoralize");
    }

    #[test]
    fn glyph_r_alone_is_not_tracked() {
        let decl = Declaration::new("m1", "a1").with_flavor(heading("R"));
        assert_eq!(derive_cost(&decl), Some(0));
        assert!(!is_reaction(&decl));
        assert_eq!(classify(&decl, &viewer()), None);
    }

    #[test]
    fn reaction_trait_keeps_zero_cost_reactions() {
        let decl = Declaration::new("m1", "a1")
            .with_flavor(heading("R"))
            .with_context(SignalContext {
                kind: Some(ContextKind::Action),
                title: Some("Shield Block".into()),
                options: vec!["trait:reaction".into()],
                ..SignalContext::default()
            });
        let descriptor = classify(&decl, &viewer()).unwrap();
        assert!(descriptor.is_reaction);
        assert_eq!(descriptor.cost, 0);
        assert_eq!(descriptor.label, "Shield Block");
    }

    #[test]
    fn explicit_action_count_beats_glyph() {
        let decl = Declaration::new("m1", "a1")
            .with_flavor(heading("1"))
            .with_context(SignalContext {
                kind: Some(ContextKind::SpellCast),
                options: vec!["num-actions:3".into()],
                ..SignalContext::default()
            });
        assert_eq!(derive_cost(&decl), Some(3));
    }

    #[test]
    fn resolution_rolls_are_rejected() {
        for kind in [
            ContextKind::DamageRoll,
            ContextKind::AttackRoll,
            ContextKind::SavingThrow,
            ContextKind::FlatCheck,
            ContextKind::RecoveryCheck,
        ] {
            let decl = Declaration::new("m1", "a1").with_context(SignalContext {
                kind: Some(kind),
                options: vec!["num-actions:1".into()],
                ..SignalContext::default()
            });
            assert_eq!(rejection(&decl), Some(Rejection::ResolutionRoll));
            assert_eq!(classify(&decl, &viewer()), None);
        }

        let nested = Declaration::new("m1", "a1").with_context(SignalContext {
            kind: Some(ContextKind::SpellAttackRoll),
            ..SignalContext::default()
        });
        assert_eq!(rejection(&nested), Some(Rejection::NestedSpellAttack));
    }

    #[test]
    fn consumables_need_explicit_use() {
        let potion = ItemRecord::new("p1", "Healing Potion", ItemType::Consumable);
        let decl = Declaration::new("m1", "a1").with_item(potion.clone());
        assert_eq!(rejection(&decl), Some(Rejection::UnmarkedConsumable));

        let used = Declaration::new("m2", "a1")
            .with_item(potion)
            .with_markers(TrackerMarkers {
                explicit_use: true,
                ..TrackerMarkers::default()
            });
        let descriptor = classify(&used, &viewer()).unwrap();
        assert_eq!(descriptor.cost, 1);
        assert_eq!(descriptor.label, "Healing Potion");
    }

    #[test]
    fn empty_declarations_have_no_context() {
        let decl = Declaration::new("m1", "a1").with_flavor("<p>hello</p>");
        assert_eq!(rejection(&decl), Some(Rejection::NoActionableContext));
    }

    #[test]
    fn item_time_fallbacks() {
        let spell = Declaration::new("m1", "a1")
            .with_item(ItemRecord::new("s1", "Fireball", ItemType::Spell));
        assert_eq!(derive_cost(&spell), Some(2));

        let quick = Declaration::new("m2", "a1")
            .with_item(ItemRecord::new("s2", "Shield", ItemType::Spell).with_time("1"));
        assert_eq!(derive_cost(&quick), Some(1));

        let free = Declaration::new("m3", "a1")
            .with_item(ItemRecord::new("f1", "Quick Draw", ItemType::Feat).with_time("free"));
        assert_eq!(classify(&free, &viewer()), None);

        let reactive = Declaration::new("m4", "a1").with_item(
            ItemRecord::new("f2", "Attack of Opportunity", ItemType::Action)
                .with_time("reaction")
                .with_action_type(ActionType::Reaction),
        );
        let descriptor = classify(&reactive, &viewer()).unwrap();
        assert!(descriptor.is_reaction);

        let gear = Declaration::new("m5", "a1")
            .with_item(ItemRecord::new("e1", "Rope", ItemType::Equipment));
        assert_eq!(derive_cost(&gear), None);
    }

    #[test]
    fn hidden_declarations_are_redacted() {
        let decl = Declaration::new("m1", "a1")
            .with_flavor(heading("1"))
            .with_visibility(Visibility {
                whisper: vec![UserId::from("gm")],
                blind: false,
            });
        let descriptor = classify(&decl, &UserId::from("player")).unwrap();
        assert_eq!(descriptor.label, SECRET_LABEL);
        assert!(descriptor.redacted);
        assert_eq!(descriptor.slug, "demoralize");
    }

    #[test]
    fn sustain_automation_overrides() {
        let decl = Declaration::sustain("s1", "a1", ItemId::from("bless"), "Bless");
        let descriptor = classify(&decl, &viewer()).unwrap();
        assert_eq!(descriptor.cost, 1);
        assert_eq!(descriptor.slug, "sustain-a-spell");
        assert_eq!(descriptor.label, "Sustain: Bless");
    }

    #[test]
    fn label_and_slug_chains() {
        let decl = Declaration::new("m1", "a1")
            .with_origin(Origin {
                slug: Some("stride".into()),
                ..Origin::default()
            })
            .with_item(ItemRecord::new("i1", "Stride (Boots)", ItemType::Action).with_slug("boots"));
        assert_eq!(derive_label(&decl), "Stride Boots");
        assert_eq!(derive_slug(&decl), "stride");

        let bare = Declaration::new("m2", "a1").with_markers(TrackerMarkers {
            explicit_use: true,
            sustained_item_name: Some("Spiritual Weapon".into()),
            ..TrackerMarkers::default()
        });
        assert_eq!(derive_label(&bare), "Spiritual Weapon");
        assert_eq!(derive_slug(&bare), "");
    }
}
