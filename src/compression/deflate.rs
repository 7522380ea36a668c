//! Handler for Deflate (zlib) compressed data

use std::io::{Read, Write};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Deflate handler
///
/// Decodes both the standard (8) and the legacy (32946) code; always
/// writes the standard one.
pub struct DeflateHandler {
    level: Compression,
}

impl DeflateHandler {
    pub fn new() -> Self {
        DeflateHandler { level: Compression::default() }
    }

    /// Handler compressing at zlib level 0-9
    pub fn with_level(level: u32) -> Self {
        DeflateHandler { level: Compression::new(level.min(9)) }
    }
}

impl Default for DeflateHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for DeflateHandler {
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)
            .map_err(|e| TiffError::CorruptData(format!("deflate stream: {}", e)))?;
        Ok(decompressed)
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), self.level);
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;
        debug!("Deflate compressed {} bytes to {}", data.len(), compressed.len());
        Ok(compressed)
    }

    fn name(&self) -> &'static str {
        "Deflate"
    }

    fn code(&self) -> u16 {
        compression::DEFLATE
    }
}
