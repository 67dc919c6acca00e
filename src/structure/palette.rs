use super::{PaletteEntry, StateValue, PALETTE_PATH, UNKNOWN_BLOCK};
use shulker_nbt::Tag;
use std::collections::BTreeMap;

/// Builds the default-variant palette. Output position equals source
/// position; entries are never sorted or merged, since voxels reference
/// them by ordinal.
pub fn build_palette(tree: &Tag) -> Vec<PaletteEntry> {
    let Some(entries) = tree.path(&PALETTE_PATH).and_then(Tag::as_list) else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| palette_entry(index, entry))
        .collect()
}

fn palette_entry(index: usize, entry: &Tag) -> PaletteEntry {
    let name = entry
        .get("name")
        .and_then(Tag::as_string)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_BLOCK.to_string());

    let states: BTreeMap<String, StateValue> = entry
        .get("states")
        .and_then(Tag::as_compound)
        .map(|states| {
            states
                .iter()
                .filter_map(|(key, value)| Some((key.clone(), state_value(value)?)))
                .collect()
        })
        .unwrap_or_default();

    let version = entry
        .get("version")
        .and_then(Tag::as_number)
        .filter(|n| n.is_finite())
        .map_or(0, |n| n as i64);

    PaletteEntry {
        index,
        name,
        states,
        version,
    }
}

/// Boolean properties are stored as bytes 0/1.
fn state_value(tag: &Tag) -> Option<StateValue> {
    match tag {
        Tag::Byte(0) => Some(StateValue::Bool(false)),
        Tag::Byte(1) => Some(StateValue::Bool(true)),
        Tag::Byte(n) => Some(StateValue::Int(i64::from(*n))),
        Tag::Short(n) => Some(StateValue::Int(i64::from(*n))),
        Tag::Int(n) => Some(StateValue::Int(i64::from(*n))),
        Tag::Long(n) => Some(StateValue::Int(*n)),
        Tag::Float(n) => Some(StateValue::Float(f64::from(*n))),
        Tag::Double(n) => Some(StateValue::Float(*n)),
        Tag::String(s) => Some(StateValue::String(s.clone())),
        _ => None,
    }
}
