//! GeoTIFF and CVAT annotation conversion
//!
//! Three pipelines share one in-crate TIFF codec:
//! - `geotiff2png` exports rasters as PNG/JPEG plus JSON georeferencing
//! - `png2geotiff` turns images and their sidecars back into GeoTIFFs
//! - `xml2geotiff` rasterizes CVAT for images 1.1 annotations into label
//!   GeoTIFFs on the grid of each image's sidecar

pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod error;
pub mod georef;
pub mod raster;
pub mod annotations;
pub mod rasterize;
pub mod convert;
pub mod commands;
pub mod cli;

pub use error::{ConvertError, ConvertResult};
pub use georef::{Crs, GeoMetadata, GeoReference, GeoTransform};
pub use raster::{read_geotiff, write_geotiff, DataType, GeoRaster, RasterData, WriteOptions};
pub use tiff::TiffReader;
