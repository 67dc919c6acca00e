//! Raw bytes to [`StructureModel`]: gate, tag decode, transform.

use crate::error::{Dependency, Result, ShulkerError};
use crate::gate::{self, GzipInflater, Inflate};
use crate::structure::{transform_with, DecodeOptions, StructureModel};
use bytes::Bytes;
use futures::future::BoxFuture;
use shulker_logger::{log, LogSeverity::Debug};
use shulker_nbt::{BigEndian, LittleEndian, NbtFile, Tag};
use std::io::{self, Cursor};
use std::path::Path;
use std::sync::Arc;

/// Which input form a decoder is asked to read. The primary form is tried
/// first and the fallback form once after it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputForm {
    Primary,
    Fallback,
}

pub trait TagDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8], form: InputForm) -> io::Result<Tag>;
}

pub trait AsyncTagDecoder: Send + Sync {
    fn decode_async<'a>(&'a self, bytes: &'a [u8], form: InputForm)
        -> BoxFuture<'a, io::Result<Tag>>;
}

/// NBT decoder: big-endian (Java edition) first, little-endian (Bedrock
/// edition) as the fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NbtDecoder;

impl TagDecoder for NbtDecoder {
    fn decode(&self, bytes: &[u8], form: InputForm) -> io::Result<Tag> {
        let mut cursor = Cursor::new(bytes);
        match form {
            InputForm::Primary => {
                let file = NbtFile::read::<BigEndian, _>(&mut cursor)?;
                // a little-endian file can parse as big-endian garbage; demand an exact fit
                let consumed = cursor.position() as usize;
                if consumed != bytes.len() {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("{} trailing bytes after root tag", bytes.len() - consumed),
                    ));
                }
                Ok(file.root)
            }
            InputForm::Fallback => Ok(NbtFile::read::<LittleEndian, _>(&mut cursor)?.root),
        }
    }
}

#[derive(Clone)]
enum Decoder {
    Blocking(Arc<dyn TagDecoder>),
    Async(Arc<dyn AsyncTagDecoder>),
}

impl Decoder {
    async fn decode(&self, bytes: &[u8], form: InputForm) -> io::Result<Tag> {
        match self {
            Decoder::Blocking(decoder) => decoder.decode(bytes, form),
            Decoder::Async(decoder) => decoder.decode_async(bytes, form).await,
        }
    }

    /// Primary form, then the fallback form once if the primary fails.
    async fn decode_tree(&self, bytes: &[u8]) -> Result<Tag> {
        let primary = match require_compound(self.decode(bytes, InputForm::Primary).await) {
            Ok(tree) => return Ok(tree),
            Err(err) => err,
        };
        log_retry(&primary);
        require_compound(self.decode(bytes, InputForm::Fallback).await)
            .map_err(|fallback| ShulkerError::Decode { primary, fallback })
    }
}

fn require_compound(decoded: io::Result<Tag>) -> io::Result<Tag> {
    match decoded? {
        tree @ Tag::Compound(_) => Ok(tree),
        other => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("root tag is not a compound (type id {})", other.get_type_id()),
        )),
    }
}

fn log_retry(primary: &io::Error) {
    log(
        format!("Primary decode failed ({}), retrying fallback form", primary),
        Debug,
    );
}

/// Configured decoding pipeline. The default reader inflates gzip and
/// decodes NBT in either byte order.
#[derive(Clone)]
pub struct StructureReader {
    inflater: Option<Arc<dyn Inflate>>,
    decoder: Option<Decoder>,
    options: DecodeOptions,
}

impl Default for StructureReader {
    fn default() -> Self {
        StructureReader {
            inflater: Some(Arc::new(GzipInflater)),
            decoder: Some(Decoder::Blocking(Arc::new(NbtDecoder))),
            options: DecodeOptions::default(),
        }
    }
}

impl StructureReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inflater(mut self, inflater: impl Inflate + 'static) -> Self {
        self.inflater = Some(Arc::new(inflater));
        self
    }

    pub fn without_inflater(mut self) -> Self {
        self.inflater = None;
        self
    }

    pub fn with_decoder(mut self, decoder: impl TagDecoder + 'static) -> Self {
        self.decoder = Some(Decoder::Blocking(Arc::new(decoder)));
        self
    }

    pub fn with_async_decoder(mut self, decoder: impl AsyncTagDecoder + 'static) -> Self {
        self.decoder = Some(Decoder::Async(Arc::new(decoder)));
        self
    }

    pub fn without_decoder(mut self) -> Self {
        self.decoder = None;
        self
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    fn prepare(&self, raw: Bytes) -> Result<(Bytes, &Decoder)> {
        let decoder = self
            .decoder
            .as_ref()
            .ok_or(ShulkerError::MissingDependency(Dependency::TagDecoder))?;
        let bytes = gate::detect_and_decompress(raw, self.inflater.as_deref())?;
        Ok((bytes, decoder))
    }

    fn finish(&self, tree: Tag) -> StructureModel {
        let model = transform_with(tree, &self.options);
        log(
            format!(
                "Decoded structure {}x{}x{}: {} palette entries, {} voxels",
                model.size.x,
                model.size.y,
                model.size.z,
                model.palette.len(),
                model.voxel_count()
            ),
            Debug,
        );
        model
    }

    /// Runs the pipeline synchronously on the current thread.
    ///
    /// An async decoder is driven with `futures::executor::block_on`, so
    /// calling this from inside an async runtime blocks a worker thread for
    /// the whole decode; use [`StructureReader::read_async`] there.
    pub fn read(&self, raw: impl Into<Bytes>) -> Result<StructureModel> {
        futures::executor::block_on(self.read_async(raw))
    }

    pub async fn read_async(&self, raw: impl Into<Bytes>) -> Result<StructureModel> {
        let (bytes, decoder) = self.prepare(raw.into())?;
        let tree = decoder.decode_tree(&bytes).await?;
        Ok(self.finish(tree))
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<StructureModel> {
        let raw = std::fs::read(path)?;
        self.read(raw)
    }

    pub async fn read_file_async(&self, path: impl AsRef<Path>) -> Result<StructureModel> {
        let raw = tokio::fs::read(path).await?;
        self.read_async(raw).await
    }
}

/// Decodes a structure with the default reader.
pub fn parse_structure(raw: impl Into<Bytes>) -> Result<StructureModel> {
    StructureReader::default().read(raw)
}

pub async fn parse_structure_async(raw: impl Into<Bytes>) -> Result<StructureModel> {
    StructureReader::default().read_async(raw).await
}
