//! GeoTIFF raster writing
//!
//! Rasters are written little-endian as one chunky strip. Files whose pixel
//! data would not fit 32-bit offsets are written as BigTIFF.

use log::{debug, info, warn};
use std::path::Path;

use crate::compression::CompressionFactory;
use crate::error::ConvertResult;
use crate::georef::GeoReference;
use crate::tiff::builder::TiffBuilder;
use crate::tiff::constants::compression;
use crate::tiff::ifd::IFD;

use super::data::RasterData;
use super::data_type::DataType;

/// Headroom left for IFDs and tag payloads before switching to BigTIFF
const TAG_HEADROOM: u64 = 1 << 20;

/// Output settings for `write_geotiff`
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    /// Compression tag value
    pub compression: u16,
    /// Palette for single-band 8-bit rasters, index = pixel value
    pub colormap: Option<Vec<[u8; 3]>>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            compression: compression::LZW,
            colormap: None,
        }
    }
}

/// Expands an RGB palette into the 3 x 256 TIFF ColorMap layout
///
/// Missing entries are black; 8-bit channels are scaled to 16 bits.
pub fn color_map_values(palette: &[[u8; 3]]) -> Vec<u16> {
    let mut values = vec![0u16; 3 * 256];
    for (index, rgb) in palette.iter().take(256).enumerate() {
        for (channel, value) in rgb.iter().enumerate() {
            values[channel * 256 + index] = *value as u16 * 257;
        }
    }
    values
}

/// Writes `data` as a GeoTIFF at `path`
pub fn write_geotiff(
    path: &Path,
    data: &RasterData,
    georef: &GeoReference,
    options: &WriteOptions
) -> ConvertResult<()> {
    let handler = CompressionFactory::create_handler(options.compression as u64)?;
    let compressed = handler.compress(&data.interleaved())?;
    debug!("{} strip: {} bytes", handler.name(), compressed.len());

    let is_big_tiff = compressed.len() as u64 + TAG_HEADROOM > u32::MAX as u64;
    let mut builder = TiffBuilder::new(is_big_tiff);
    let index = builder.add_ifd(IFD::new(0, 0));

    builder.add_image_structure_tags(
        index, data.width, data.height, data.band_count() as u16, data.data_type, handler.code())?;
    builder.setup_single_strip(index, compressed, data.height)?;

    if let Some(palette) = &options.colormap {
        if data.data_type == DataType::Uint8 && data.band_count() == 1 {
            builder.add_color_map(index, &color_map_values(palette))?;
        } else {
            warn!("Colour map needs a single uint8 band, writing {} band(s) of {} without one",
                  data.band_count(), data.data_type);
        }
    }

    builder.set_georeference(index, georef)?;
    builder.add_software_tag(index, concat!("geocvat ", env!("CARGO_PKG_VERSION")))?;
    builder.write(path)?;

    info!("Wrote {} ({}x{}, {} band(s), {}{})", path.display(), data.width, data.height,
          data.band_count(), handler.name(), if is_big_tiff { ", BigTIFF" } else { "" });
    Ok(())
}
