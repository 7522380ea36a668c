//! Zstandard (Compression = 14)

use log::debug;

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

pub struct ZstdHandler {
    level: i32,
}

impl ZstdHandler {
    pub fn new() -> Self {
        ZstdHandler { level: zstd::DEFAULT_COMPRESSION_LEVEL }
    }

    /// Handler compressing at `level`, clamped to what the library accepts
    pub fn with_level(level: i32) -> Self {
        let range = zstd::compression_level_range();
        ZstdHandler { level: level.clamp(*range.start(), *range.end()) }
    }
}

impl Default for ZstdHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        zstd::decode_all(data)
            .map_err(|e| TiffError::CorruptData(format!("zstd stream: {}", e)))
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let compressed = zstd::encode_all(data, self.level)
            .map_err(|e| TiffError::Other(format!("zstd compression failed: {}", e)))?;
        debug!("Zstd level {} compressed {} bytes to {}", self.level, data.len(), compressed.len());
        Ok(compressed)
    }

    fn name(&self) -> &'static str {
        "ZSTD"
    }

    fn code(&self) -> u16 {
        compression::ZSTD
    }
}
