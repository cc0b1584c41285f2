//! Loading of the read-only resources shared by the filters.
//!
//! Dictionaries, blocklists and language models may be stored either plain or
//! gzip-compressed. The compression is detected from the leading magic bytes,
//! never from the file extension.

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression as GzLevel;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};
use std::path::Path;

/// Magic bytes of a gzip member.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Storage encodings understood by the resource loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Stored as-is.
    Plain,
    /// Gzip-compressed.
    Gzip,
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::Plain => write!(f, "plain"),
            Compression::Gzip => write!(f, "gzip"),
        }
    }
}

/// Detect the storage encoding of raw resource bytes.
pub fn detect_compression(data: &[u8]) -> Compression {
    if data.len() >= 2 && data[..2] == GZIP_MAGIC {
        Compression::Gzip
    } else {
        Compression::Plain
    }
}

/// Decode resource bytes, inflating them when they are gzip-compressed.
pub fn decode_bytes(data: Vec<u8>) -> std::io::Result<Vec<u8>> {
    match detect_compression(&data) {
        Compression::Plain => Ok(data),
        Compression::Gzip => {
            let mut decoder = GzDecoder::new(data.as_slice());
            let mut decoded = Vec::new();
            decoder.read_to_end(&mut decoded)?;
            Ok(decoded)
        }
    }
}

/// Read a resource file and return its decompressed contents.
///
/// Any failure is reported as [`Error::ResourceLoad`] naming the path.
pub fn read_resource(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let raw = std::fs::read(path).map_err(|e| Error::resource(path, e))?;
    let compression = detect_compression(&raw);
    let data = decode_bytes(raw).map_err(|e| Error::resource(path, e))?;
    tracing::debug!(
        path = %path.display(),
        %compression,
        bytes = data.len(),
        "read resource"
    );
    Ok(data)
}

/// Read a JSON resource file (plain or gzip) into `T`.
pub fn read_json_resource<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let data = read_resource(path)?;
    serde_json::from_slice(&data).map_err(|e| Error::resource(path, e))
}

/// Gzip-compress a byte buffer.
pub fn gzip_bytes(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), GzLevel::default());
    encoder.write_all(data)?;
    encoder.finish()
}
