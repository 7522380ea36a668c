//! TIFF and BigTIFF container format
//!
//! Reading of headers, IFD chains and tag payloads, GeoTIFF key parsing,
//! and a builder that assembles new files.

pub mod errors;
pub mod ifd;
pub mod types;
pub mod reader;
pub mod geotags;
pub mod builder;
pub(crate) mod builders;
pub mod constants;
pub mod geo_key_parser;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use types::TIFF;
pub use geotags::{GeoKeyEntry, get_key_name};
pub use geo_key_parser::GeoKeyParser;
pub use builder::TiffBuilder;
