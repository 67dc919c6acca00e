use byteorder::ByteOrder;
use flate2::write::GzEncoder;
use flate2::Compression;
use shulker_nbt::{NbtFile, Tag};
use std::collections::HashMap;
use std::io::Write;

pub fn compound(entries: Vec<(&str, Tag)>) -> Tag {
    Tag::Compound(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<HashMap<_, _>>(),
    )
}

pub fn block(name: &str, states: Vec<(&str, Tag)>) -> Tag {
    compound(vec![
        ("name", Tag::String(name.to_string())),
        ("states", compound(states)),
        ("version", Tag::Int(18090528)),
    ])
}

/// A 2x2x2 structure: stone floor, air and a lit furnace on top.
pub fn sample_structure() -> Tag {
    compound(vec![
        ("format_version", Tag::Int(1)),
        ("size", Tag::List(vec![Tag::Int(2), Tag::Int(2), Tag::Int(2)])),
        (
            "structure_world_origin",
            Tag::List(vec![Tag::Int(100), Tag::Int(64), Tag::Int(-20)]),
        ),
        (
            "structure",
            compound(vec![
                (
                    "block_indices",
                    Tag::List(vec![
                        Tag::List(vec![Tag::Int(1), Tag::Int(1), Tag::Int(1), Tag::Int(1)]),
                        Tag::List(vec![Tag::Int(0), Tag::Int(2), Tag::Int(0), Tag::Int(0)]),
                    ]),
                ),
                (
                    "palette",
                    compound(vec![(
                        "default",
                        compound(vec![(
                            "block_palette",
                            Tag::List(vec![
                                block("minecraft:air", vec![]),
                                block(
                                    "minecraft:stone",
                                    vec![("stone_type", Tag::String("stone".to_string()))],
                                ),
                                block(
                                    "minecraft:lit_furnace",
                                    vec![("facing_direction", Tag::Int(3))],
                                ),
                            ]),
                        )]),
                    )]),
                ),
            ]),
        ),
    ])
}

pub fn encode<B: ByteOrder>(root: Tag) -> Vec<u8> {
    let mut buffer = Vec::new();
    NbtFile::new(String::new(), root)
        .write::<B, _>(&mut buffer)
        .unwrap();
    buffer
}

pub fn gzip(payload: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).unwrap();
    encoder.finish().unwrap()
}
