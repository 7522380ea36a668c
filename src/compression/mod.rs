//! Compression handling for TIFF files
//!
//! One `CompressionHandler` per scheme, chosen by `CompressionFactory` from
//! the Compression tag or a command-line name.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod lzw;
mod packbits;
mod zstandard;

#[cfg(test)]
mod tests;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::DeflateHandler;
pub use factory::CompressionFactory;
pub use lzw::LzwHandler;
pub use packbits::PackBitsHandler;
pub use zstandard::ZstdHandler;
