//! Voxel structure model decoded from a structure tag tree.

pub mod layers;
pub mod palette;
pub mod transform;

use serde::{Deserialize, Serialize};
use shulker_nbt::Tag;
use std::collections::BTreeMap;
use std::sync::Arc;

pub use layers::{normalize_layers, LayerRecord};
pub use palette::build_palette;
pub use transform::{
    extract_origin, extract_size, material_histogram, reconstruct_voxels, transform,
    transform_with,
};

/// Block identifier skipped by the histogram (and, by default, the voxel list).
pub const AIR_BLOCK: &str = "minecraft:air";
/// Name given to palette entries without a usable `name` field.
pub const UNKNOWN_BLOCK: &str = "minecraft:unknown";

pub const SIZE_KEY: &str = "size";
pub const FORMAT_VERSION_KEY: &str = "format_version";
pub const ORIGIN_KEY: &str = "structure_world_origin";
pub const PALETTE_PATH: [&str; 4] = ["structure", "palette", "default", "block_palette"];
pub const BLOCK_INDICES_PATH: [&str; 2] = ["structure", "block_indices"];

/// Lower-cased block name to occurrence count.
pub type MaterialHistogram = BTreeMap<String, u64>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructureSize {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl StructureSize {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        StructureSize { x, y, z }
    }

    /// Cells in one Y slab.
    pub fn layer_area(&self) -> u64 {
        u64::from(self.x).saturating_mul(u64::from(self.z))
    }

    /// Cell count, saturating at `u64::MAX` for absurd sizes.
    pub fn volume(&self) -> u64 {
        self.layer_area().saturating_mul(u64::from(self.y))
    }

    pub fn contains(&self, x: u32, y: u32, z: u32) -> bool {
        x < self.x && y < self.y && z < self.z
    }
}

/// Value of a single block-state property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Position in the source palette; voxels refer to entries by this value.
    pub index: usize,
    pub name: String,
    pub states: BTreeMap<String, StateValue>,
    pub version: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voxel {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub palette_index: usize,
}

/// How occupancy layers map onto the voxel grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerAddressing {
    /// Layer key is the Y coordinate; each layer covers one X/Z slab,
    /// indexed `z * size.x + x`.
    #[default]
    PerLayerY,
    /// Each layer covers the whole volume, indexed
    /// `(x * size.y + y) * size.z + z`. Only the lowest-keyed layer yields
    /// voxels; later layers (waterlogging and the like) only feed the
    /// material histogram.
    WholeVolume,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub addressing: LayerAddressing,
    /// Compared case-insensitively against palette names.
    pub empty_block: String,
    /// Emit voxels whose palette entry is `empty_block`.
    pub keep_empty_voxels: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            addressing: LayerAddressing::default(),
            empty_block: AIR_BLOCK.to_string(),
            keep_empty_voxels: false,
        }
    }
}

impl DecodeOptions {
    pub fn is_empty_block(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.empty_block)
    }
}

/// Decoded structure. `raw` keeps the source tree for diagnostics only and
/// takes no part in equality or serialization.
#[derive(Debug, Clone, Serialize)]
pub struct StructureModel {
    pub size: StructureSize,
    pub origin: [i32; 3],
    pub format_version: i64,
    pub palette: Vec<PaletteEntry>,
    pub materials: MaterialHistogram,
    pub blocks: Vec<Voxel>,
    #[serde(skip)]
    pub raw: Arc<Tag>,
}

impl PartialEq for StructureModel {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.origin == other.origin
            && self.format_version == other.format_version
            && self.palette == other.palette
            && self.materials == other.materials
            && self.blocks == other.blocks
    }
}

impl StructureModel {
    pub fn palette_entry(&self, index: usize) -> Option<&PaletteEntry> {
        self.palette.get(index)
    }

    /// Palette entry of the voxel at the given cell, if one was emitted.
    pub fn block_at(&self, x: u32, y: u32, z: u32) -> Option<&PaletteEntry> {
        if !self.size.contains(x, y, z) {
            return None;
        }
        self.blocks
            .iter()
            .find(|v| v.x == x && v.y == y && v.z == z)
            .and_then(|v| self.palette_entry(v.palette_index))
    }

    pub fn voxel_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn volume(&self) -> u64 {
        self.size.volume()
    }
}
