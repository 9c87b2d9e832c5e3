use crate::entry::SustainedItem;
use crate::signal::Declaration;

const SUSTAIN_SLUGS: [&str; 2] = ["sustain", "sustain-a-spell"];

pub(crate) fn has_sustain_slug(decl: &Declaration) -> bool {
    decl.origin
        .as_ref()
        .and_then(|o| o.slug.as_deref())
        .is_some_and(|slug| SUSTAIN_SLUGS.contains(&slug))
}

/// Whether the declaration creates or renews a sustained effect.
pub fn is_sustain_declaration(decl: &Declaration) -> bool {
    if decl.markers.sustain_automation || has_sustain_slug(decl) {
        return true;
    }
    if decl.item.as_ref().is_some_and(|item| item.sustained) {
        return true;
    }
    if decl.embedded_spell.as_ref().is_some_and(|spell| spell.sustained) {
        return true;
    }
    decl.item
        .as_ref()
        .and_then(|item| item.description.as_deref())
        .map(str::to_lowercase)
        .is_some_and(|text| text.contains("sustain a spell") || text.contains("sustain the spell"))
}

/// Item and display name of the effect being sustained.
///
/// Returns `None` when no item can be identified; such declarations are
/// still tracked but never enter the sustain registry.
pub fn sustain_metadata(decl: &Declaration) -> Option<SustainedItem> {
    let id = decl
        .markers
        .sustained_item_id
        .clone()
        .or_else(|| decl.origin.as_ref().and_then(|o| o.item_id.clone()))
        .or_else(|| decl.item.as_ref().map(|item| item.id.clone()))
        .filter(|id| !id.as_str().is_empty())?;

    Some(SustainedItem::new(id, sustain_name(decl)))
}

pub(crate) fn sustain_name(decl: &Declaration) -> String {
    decl.markers
        .sustained_item_name
        .clone()
        .or_else(|| decl.embedded_spell.as_ref().map(|spell| spell.name.clone()))
        .or_else(|| decl.item.as_ref().map(|item| item.name.clone()))
        .or_else(|| decl.origin.as_ref().and_then(|o| o.name.clone()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Action".to_owned())
}
