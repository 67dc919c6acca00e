//! Tag tree to [`StructureModel`].
//!
//! Nothing here fails: missing or oddly shaped sections degrade to zero
//! sizes and empty lists so a partly valid file still yields a model.

use super::layers::{normalize_layers, LayerRecord};
use super::palette::build_palette;
use super::{
    DecodeOptions, LayerAddressing, MaterialHistogram, PaletteEntry, StructureModel,
    StructureSize, Voxel, BLOCK_INDICES_PATH, FORMAT_VERSION_KEY, ORIGIN_KEY, SIZE_KEY,
};
use shulker_nbt::Tag;
use std::sync::Arc;

fn dimension(value: Option<f64>) -> u32 {
    match value {
        Some(n) if n.is_finite() && n > 0.0 => n as u32,
        _ => 0,
    }
}

/// Palette ordinal for a raw occupancy value, if it names a palette entry.
fn palette_ordinal(value: Option<f64>, palette_len: usize) -> Option<usize> {
    let n = value?;
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 || n >= palette_len as f64 {
        return None;
    }
    Some(n as usize)
}

/// Reads `size` as three dimensions. Absent or non-numeric components are 0.
pub fn extract_size(tree: &Tag) -> StructureSize {
    let size = tree.get(SIZE_KEY).and_then(Tag::as_sequence);
    let component = |i: usize| dimension(size.and_then(|s| s.number_at(i)));
    StructureSize::new(component(0), component(1), component(2))
}

pub fn extract_origin(tree: &Tag) -> [i32; 3] {
    let origin = tree.get(ORIGIN_KEY).and_then(Tag::as_sequence);
    let component = |i: usize| {
        origin
            .and_then(|s| s.number_at(i))
            .filter(|n| n.is_finite())
            .map_or(0, |n| n as i32)
    };
    [component(0), component(1), component(2)]
}

fn extract_format_version(tree: &Tag) -> i64 {
    tree.get(FORMAT_VERSION_KEY)
        .and_then(Tag::as_number)
        .filter(|n| n.is_finite())
        .map_or(0, |n| n as i64)
}

/// Number of leading values of each layer that address a cell.
fn layer_bound(size: StructureSize, addressing: LayerAddressing) -> u64 {
    match addressing {
        LayerAddressing::PerLayerY => size.layer_area(),
        LayerAddressing::WholeVolume => size.volume(),
    }
}

fn usable_len(layer: &LayerRecord<'_>, bound: u64) -> usize {
    (layer.data.len() as u64).min(bound) as usize
}

/// Emits one voxel per occupied cell. Values outside the palette, and by
/// default cells naming the empty block, leave the cell vacant.
pub fn reconstruct_voxels(
    size: StructureSize,
    palette: &[PaletteEntry],
    layers: &[LayerRecord<'_>],
    options: &DecodeOptions,
) -> Vec<Voxel> {
    let occupied = |value: Option<f64>| {
        palette_ordinal(value, palette.len())
            .filter(|&i| options.keep_empty_voxels || !options.is_empty_block(&palette[i].name))
    };
    let mut voxels = Vec::new();

    match options.addressing {
        LayerAddressing::PerLayerY => {
            let bound = layer_bound(size, options.addressing);
            let width = u64::from(size.x);
            for layer in layers {
                if layer.key < 0 || layer.key >= i64::from(size.y) {
                    continue;
                }
                let y = layer.key as u32;
                for idx in 0..usable_len(layer, bound) {
                    if let Some(palette_index) = occupied(layer.data.number_at(idx)) {
                        let idx = idx as u64;
                        voxels.push(Voxel {
                            x: (idx % width) as u32,
                            y,
                            z: (idx / width) as u32,
                            palette_index,
                        });
                    }
                }
            }
        }
        LayerAddressing::WholeVolume => {
            let Some(primary) = layers.first() else {
                return voxels;
            };
            let bound = layer_bound(size, options.addressing);
            let (height, depth) = (u64::from(size.y), u64::from(size.z));
            for idx in 0..usable_len(primary, bound) {
                if let Some(palette_index) = occupied(primary.data.number_at(idx)) {
                    let idx = idx as u64;
                    voxels.push(Voxel {
                        x: (idx / (height * depth)) as u32,
                        y: ((idx / depth) % height) as u32,
                        z: (idx % depth) as u32,
                        palette_index,
                    });
                }
            }
        }
    }

    voxels
}

/// Counts every in-range value of every layer by lower-cased block name.
/// Only the empty block is left out; ordinal 0 counts like any other.
pub fn material_histogram(
    size: StructureSize,
    palette: &[PaletteEntry],
    layers: &[LayerRecord<'_>],
    options: &DecodeOptions,
) -> MaterialHistogram {
    let bound = layer_bound(size, options.addressing);
    let mut counts = vec![0u64; palette.len()];

    for layer in layers {
        let values = layer.data.numbers().take(usable_len(layer, bound));
        for ordinal in values.filter_map(|value| palette_ordinal(value, palette.len())) {
            counts[ordinal] += 1;
        }
    }

    let mut materials = MaterialHistogram::new();
    for (entry, count) in palette.iter().zip(counts) {
        if count == 0 || options.is_empty_block(&entry.name) {
            continue;
        }
        *materials.entry(entry.name.to_lowercase()).or_insert(0) += count;
    }
    materials
}

pub fn transform(tree: impl Into<Arc<Tag>>) -> StructureModel {
    transform_with(tree, &DecodeOptions::default())
}

pub fn transform_with(tree: impl Into<Arc<Tag>>, options: &DecodeOptions) -> StructureModel {
    let raw: Arc<Tag> = tree.into();

    let size = extract_size(&raw);
    let palette = build_palette(&raw);
    let layers = normalize_layers(raw.path(&BLOCK_INDICES_PATH));
    let blocks = reconstruct_voxels(size, &palette, &layers, options);
    let materials = material_histogram(size, &palette, &layers, options);
    let origin = extract_origin(&raw);
    let format_version = extract_format_version(&raw);

    StructureModel {
        size,
        origin,
        format_version,
        palette,
        materials,
        blocks,
        raw,
    }
}
