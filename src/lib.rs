//! Decodes Minecraft structure files into an indexable voxel model.
//!
//! Raw bytes pass through the [`gate`] (gzip detection), a tag-tree decoder
//! (NBT in either byte order) and the [`structure`] transform.

pub mod error;
pub mod gate;
pub mod reader;
pub mod structure;

// Re-export commonly used items
pub use error::{Dependency, Result, ShulkerError};
pub use reader::{
    parse_structure, parse_structure_async, AsyncTagDecoder, InputForm, NbtDecoder,
    StructureReader, TagDecoder,
};
pub use structure::{
    transform, transform_with, DecodeOptions, LayerAddressing, PaletteEntry, StructureModel,
    StructureSize, Voxel,
};
