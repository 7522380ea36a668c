//! Factory for creating compression handlers

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::deflate::DeflateHandler;
use super::handler::CompressionHandler;
use super::lzw::LzwHandler;
use super::packbits::PackBitsHandler;
use super::uncompressed::UncompressedHandler;
use super::zstandard::ZstdHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Handler for a Compression tag value
    pub fn create_handler(code: u64) -> TiffResult<Box<dyn CompressionHandler>> {
        let code16 = u16::try_from(code).map_err(|_| TiffError::UnsupportedCompression(code))?;
        match code16 {
            compression::NONE => Ok(Box::new(UncompressedHandler)),
            compression::LZW => Ok(Box::new(LzwHandler)),
            compression::DEFLATE | compression::DEFLATE_LEGACY => Ok(Box::new(DeflateHandler::new())),
            compression::ZSTD => Ok(Box::new(ZstdHandler::new())),
            compression::PACKBITS => Ok(Box::new(PackBitsHandler)),
            _ => Err(TiffError::UnsupportedCompression(code))
        }
    }

    /// Handler by command-line name
    pub fn get_handler_by_name(name: &str) -> TiffResult<Box<dyn CompressionHandler>> {
        match name.to_lowercase().as_str() {
            "none" | "uncompressed" => Ok(Box::new(UncompressedHandler)),
            "deflate" | "zip" => Ok(Box::new(DeflateHandler::new())),
            "zstd" => Ok(Box::new(ZstdHandler::new())),
            "lzw" => Ok(Box::new(LzwHandler)),
            "packbits" => Ok(Box::new(PackBitsHandler)),
            _ => Err(TiffError::Other(format!("Unknown compression type: {}", name)))
        }
    }
}
