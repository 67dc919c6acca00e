//! Decompression gate: sniffs the gzip signature and inflates when present.

use crate::error::{Dependency, Result, ShulkerError};
use bytes::Bytes;
use flate2::read::MultiGzDecoder;
use shulker_logger::{log, LogSeverity::Debug};
use std::io::{self, Read};

/// First two bytes of every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decompression primitive used by the gate.
pub trait Inflate: Send + Sync {
    fn inflate(&self, bytes: &[u8]) -> io::Result<Vec<u8>>;
}

impl<F> Inflate for F
where
    F: Fn(&[u8]) -> io::Result<Vec<u8>> + Send + Sync,
{
    fn inflate(&self, bytes: &[u8]) -> io::Result<Vec<u8>> {
        self(bytes)
    }
}

/// Gzip inflater backed by flate2. Concatenated members are decoded as one stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct GzipInflater;

impl Inflate for GzipInflater {
    fn inflate(&self, bytes: &[u8]) -> io::Result<Vec<u8>> {
        let mut decoder = MultiGzDecoder::new(bytes);
        let mut inflated = Vec::new();
        decoder.read_to_end(&mut inflated)?;
        Ok(inflated)
    }
}

/// Buffers shorter than the magic are never compressed.
pub fn is_compressed(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Inflates `buffer` if it carries the gzip signature, otherwise hands it
/// back untouched. A single attempt is made; failures are not retried.
pub fn detect_and_decompress(buffer: Bytes, inflater: Option<&dyn Inflate>) -> Result<Bytes> {
    if !is_compressed(&buffer) {
        log(
            format!("No gzip signature, passing {} bytes through", buffer.len()),
            Debug,
        );
        return Ok(buffer);
    }

    let inflater = inflater.ok_or(ShulkerError::MissingDependency(Dependency::Inflater))?;
    let inflated = inflater
        .inflate(&buffer)
        .map_err(|source| ShulkerError::Decompression { source })?;
    log(
        format!("Inflated {} bytes to {}", buffer.len(), inflated.len()),
        Debug,
    );
    Ok(Bytes::from(inflated))
}
