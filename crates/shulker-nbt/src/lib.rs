//! Named binary tag codec for structure files.
//!
//! Java edition files are big-endian and usually gzip-compressed; Bedrock
//! edition `.mcstructure` files are little-endian and stored raw. The codec
//! is generic over [`ByteOrder`] so both read through the same code.

pub mod access;

use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::{self, Read, Write};

pub use access::Sequence;
pub use byteorder::{BigEndian, LittleEndian};

/// Compounds and lists nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 512;

/// Upper bound on elements preallocated from an untrusted length prefix.
const PREALLOC_LIMIT: usize = 4096;

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Tag>),
    Compound(HashMap<String, Tag>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

fn invalid_data(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

fn read_len<B: ByteOrder, R: Read>(reader: &mut R) -> io::Result<usize> {
    let length = reader.read_i32::<B>()?;
    if length < 0 {
        return Err(invalid_data(format!("Negative length prefix: {}", length)));
    }
    Ok(length as usize)
}

fn read_string<B: ByteOrder, R: Read>(reader: &mut R) -> io::Result<String> {
    let length = reader.read_u16::<B>()?;
    let mut bytes = vec![0u8; length as usize];
    reader.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write_string<B: ByteOrder, W: Write>(writer: &mut W, value: &str) -> io::Result<()> {
    let length = u16::try_from(value.len())
        .map_err(|_| invalid_data(format!("String too long: {} bytes", value.len())))?;
    writer.write_u16::<B>(length)?;
    writer.write_all(value.as_bytes())
}

fn write_len<B: ByteOrder, W: Write>(writer: &mut W, length: usize) -> io::Result<()> {
    let length = i32::try_from(length)
        .map_err(|_| invalid_data(format!("Sequence too long: {} elements", length)))?;
    writer.write_i32::<B>(length)
}

impl Tag {
    pub fn get_type_id(&self) -> u8 {
        match self {
            Tag::End => 0,
            Tag::Byte(_) => 1,
            Tag::Short(_) => 2,
            Tag::Int(_) => 3,
            Tag::Long(_) => 4,
            Tag::Float(_) => 5,
            Tag::Double(_) => 6,
            Tag::ByteArray(_) => 7,
            Tag::String(_) => 8,
            Tag::List(_) => 9,
            Tag::Compound(_) => 10,
            Tag::IntArray(_) => 11,
            Tag::LongArray(_) => 12,
        }
    }

    /// Reads one named tag. A bare `End` byte yields an empty name.
    pub fn read<B: ByteOrder, R: Read>(reader: &mut R) -> io::Result<(String, Tag)> {
        Self::read_named::<B, R>(reader, 0)
    }

    fn read_named<B: ByteOrder, R: Read>(
        reader: &mut R,
        depth: usize,
    ) -> io::Result<(String, Tag)> {
        let type_id = reader.read_u8()?;
        if type_id == 0 {
            return Ok((String::new(), Tag::End));
        }

        let name = read_string::<B, R>(reader)?;
        let tag = Tag::read_payload::<B, R>(reader, type_id, depth)?;
        Ok((name, tag))
    }

    fn read_payload<B: ByteOrder, R: Read>(
        reader: &mut R,
        type_id: u8,
        depth: usize,
    ) -> io::Result<Tag> {
        if depth > MAX_DEPTH {
            return Err(invalid_data(format!(
                "Nesting deeper than {} levels",
                MAX_DEPTH
            )));
        }

        match type_id {
            0 => Ok(Tag::End),
            1 => Ok(Tag::Byte(reader.read_i8()?)),
            2 => Ok(Tag::Short(reader.read_i16::<B>()?)),
            3 => Ok(Tag::Int(reader.read_i32::<B>()?)),
            4 => Ok(Tag::Long(reader.read_i64::<B>()?)),
            5 => Ok(Tag::Float(reader.read_f32::<B>()?)),
            6 => Ok(Tag::Double(reader.read_f64::<B>()?)),
            7 => {
                let length = read_len::<B, R>(reader)?;
                let mut bytes = Vec::with_capacity(length.min(PREALLOC_LIMIT));
                for _ in 0..length {
                    bytes.push(reader.read_i8()?);
                }
                Ok(Tag::ByteArray(bytes))
            }
            8 => read_string::<B, R>(reader).map(Tag::String),
            9 => {
                let list_type = reader.read_u8()?;
                let length = read_len::<B, R>(reader)?;
                let mut list = Vec::with_capacity(length.min(PREALLOC_LIMIT));
                for _ in 0..length {
                    list.push(Tag::read_payload::<B, R>(reader, list_type, depth + 1)?);
                }
                Ok(Tag::List(list))
            }
            10 => {
                let mut compound = HashMap::new();
                loop {
                    let (name, tag) = Tag::read_named::<B, R>(reader, depth + 1)?;
                    if let Tag::End = tag {
                        break;
                    }
                    compound.insert(name, tag);
                }
                Ok(Tag::Compound(compound))
            }
            11 => {
                let length = read_len::<B, R>(reader)?;
                let mut ints = Vec::with_capacity(length.min(PREALLOC_LIMIT));
                for _ in 0..length {
                    ints.push(reader.read_i32::<B>()?);
                }
                Ok(Tag::IntArray(ints))
            }
            12 => {
                let length = read_len::<B, R>(reader)?;
                let mut longs = Vec::with_capacity(length.min(PREALLOC_LIMIT));
                for _ in 0..length {
                    longs.push(reader.read_i64::<B>()?);
                }
                Ok(Tag::LongArray(longs))
            }
            _ => Err(invalid_data(format!("Invalid tag type: {}", type_id))),
        }
    }

    pub fn write<B: ByteOrder, W: Write>(&self, writer: &mut W, name: &str) -> io::Result<()> {
        writer.write_u8(self.get_type_id())?;

        if !matches!(self, Tag::End) {
            write_string::<B, W>(writer, name)?;
        }

        self.write_payload::<B, W>(writer)
    }

    fn write_payload<B: ByteOrder, W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Tag::End => Ok(()),
            Tag::Byte(v) => writer.write_i8(*v),
            Tag::Short(v) => writer.write_i16::<B>(*v),
            Tag::Int(v) => writer.write_i32::<B>(*v),
            Tag::Long(v) => writer.write_i64::<B>(*v),
            Tag::Float(v) => writer.write_f32::<B>(*v),
            Tag::Double(v) => writer.write_f64::<B>(*v),
            Tag::ByteArray(v) => {
                write_len::<B, W>(writer, v.len())?;
                for &b in v {
                    writer.write_i8(b)?;
                }
                Ok(())
            }
            Tag::String(v) => write_string::<B, W>(writer, v),
            Tag::List(v) => {
                // empty lists are typed as End
                writer.write_u8(v.first().map_or(0, Tag::get_type_id))?;
                write_len::<B, W>(writer, v.len())?;
                for tag in v {
                    tag.write_payload::<B, W>(writer)?;
                }
                Ok(())
            }
            Tag::Compound(v) => {
                for (name, tag) in v {
                    tag.write::<B, W>(writer, name)?;
                }
                Tag::End.write::<B, W>(writer, "")
            }
            Tag::IntArray(v) => {
                write_len::<B, W>(writer, v.len())?;
                for &i in v {
                    writer.write_i32::<B>(i)?;
                }
                Ok(())
            }
            Tag::LongArray(v) => {
                write_len::<B, W>(writer, v.len())?;
                for &l in v {
                    writer.write_i64::<B>(l)?;
                }
                Ok(())
            }
        }
    }

    pub fn as_compound(&self) -> Option<&HashMap<String, Tag>> {
        match self {
            Tag::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Tag>> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A complete NBT document: the root tag and its (often empty) name.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtFile {
    pub root: Tag,
    pub name: String,
}

impl NbtFile {
    pub fn new(name: String, root: Tag) -> Self {
        NbtFile { root, name }
    }

    pub fn read<B: ByteOrder, R: Read>(reader: &mut R) -> io::Result<Self> {
        let (name, root) = Tag::read::<B, R>(reader)?;
        Ok(NbtFile { root, name })
    }

    pub fn write<B: ByteOrder, W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.root.write::<B, W>(writer, &self.name)
    }

    pub fn read_gzip<B: ByteOrder, R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut decoder = GzDecoder::new(reader);
        Self::read::<B, _>(&mut decoder)
    }

    pub fn write_gzip<B: ByteOrder, W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        self.write::<B, _>(&mut encoder)?;
        encoder.finish()?;
        Ok(())
    }
}
