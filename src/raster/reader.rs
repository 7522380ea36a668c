//! GeoTIFF raster reading

use log::{debug, info};
use std::path::Path;

use crate::error::{ConvertError, ConvertResult};
use crate::georef::GeoReference;
use crate::tiff::geo_key_parser::GeoKeyParser;
use crate::tiff::reader::TiffReader;

use super::data::RasterData;
use super::layout::SampleLayout;
use super::strip_reader::StripReader;
use super::tile_reader::TileReader;

/// Decoded raster with its georeferencing
#[derive(Debug, Clone)]
pub struct GeoRaster {
    pub data: RasterData,
    pub georef: GeoReference,
}

/// Reads the full-resolution image of a GeoTIFF
pub struct RasterReader {
    tiff_reader: TiffReader,
}

impl Default for RasterReader {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterReader {
    pub fn new() -> Self {
        RasterReader { tiff_reader: TiffReader::new() }
    }

    /// Decodes all bands of the main IFD of `path`
    ///
    /// Overviews and masks are skipped.
    pub fn read(&mut self, path: &Path) -> ConvertResult<GeoRaster> {
        let tiff = self.tiff_reader.load(path)?;
        let ifd = tiff.main_ifd().ok_or_else(|| ConvertError::InvalidArgument(format!(
            "{} has no full-resolution image", path.display())))?;
        let mut reader = self.tiff_reader.create_reader()?;

        let layout = SampleLayout::from_ifd(&self.tiff_reader, &mut reader, ifd)?;
        let mut data = RasterData::zeroed(layout.width, layout.height, layout.data_type, layout.samples as usize);

        if ifd.is_tiled() {
            TileReader::new(ifd, &self.tiff_reader, &layout).read_into(&mut reader, &mut data)?;
        } else {
            StripReader::new(ifd, &self.tiff_reader, &layout).read_into(&mut reader, &mut data)?;
        }

        let georef = GeoKeyParser::read_georeference(&self.tiff_reader, &mut reader, ifd)?;
        info!("Read {}: {}x{}, {} band(s) of {}", path.display(),
              data.width, data.height, data.band_count(), data.data_type);
        debug!("{} georeference: {:?}", path.display(), georef);

        Ok(GeoRaster { data, georef })
    }
}

/// Reads a GeoTIFF into memory
pub fn read_geotiff(path: &Path) -> ConvertResult<GeoRaster> {
    RasterReader::new().read(path)
}
