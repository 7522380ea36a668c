//! Compression handler trait definition

use crate::tiff::errors::TiffResult;

/// Strategy trait for one TIFF compression scheme
pub trait CompressionHandler: Send + Sync {
    /// Decompresses one strip or tile
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>>;

    /// Compresses one strip or tile
    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>>;

    /// Human-readable name of the scheme
    fn name(&self) -> &'static str;

    /// Value of the Compression tag
    fn code(&self) -> u16;
}
