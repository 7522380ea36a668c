//! Raster decoding and encoding on top of the TIFF layer
//!
//! `RasterReader` turns a GeoTIFF into band buffers plus georeferencing;
//! `write_geotiff` goes the other way.

pub mod data;
pub mod data_type;
pub mod layout;
pub mod reader;
pub mod strip_reader;
pub mod tile_reader;
pub mod writer;

#[cfg(test)]
mod tests;

pub use data::RasterData;
pub use data_type::DataType;
pub use reader::{read_geotiff, GeoRaster, RasterReader};
pub use writer::{write_geotiff, WriteOptions};
