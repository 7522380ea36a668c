//! Tile-organised image data
//!
//! Tiles are stored row-major and always hold a full tile; edge tiles are
//! padded and clipped on the way into the raster.

use log::debug;
use std::io::SeekFrom;

use crate::compression::CompressionFactory;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

use super::data::RasterData;
use super::layout::SampleLayout;

/// Decodes all tiles of one IFD
pub struct TileReader<'a> {
    ifd: &'a IFD,
    tiff_reader: &'a TiffReader,
    layout: &'a SampleLayout,
}

impl<'a> TileReader<'a> {
    pub fn new(ifd: &'a IFD, tiff_reader: &'a TiffReader, layout: &'a SampleLayout) -> Self {
        TileReader { ifd, tiff_reader, layout }
    }

    fn tile_dimensions(&self) -> TiffResult<(usize, usize)> {
        match (self.ifd.get_tag_value(tags::TILE_WIDTH), self.ifd.get_tag_value(tags::TILE_LENGTH)) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Ok((w as usize, h as usize)),
            _ => Err(TiffError::CorruptData("missing or zero tile dimensions".to_string())),
        }
    }

    /// Decodes every tile into `raster`
    pub fn read_into(&self, reader: &mut dyn SeekableReader, raster: &mut RasterData) -> TiffResult<()> {
        let handler = CompressionFactory::create_handler(self.layout.compression)?;
        let (tile_width, tile_height) = self.tile_dimensions()?;
        let offsets = self.tiff_reader.read_tag_values(reader, self.ifd, tags::TILE_OFFSETS)?;
        let byte_counts = self.tiff_reader.read_tag_values(reader, self.ifd, tags::TILE_BYTE_COUNTS)?;

        let tiles_across = (self.layout.width as usize).div_ceil(tile_width);
        let tiles_down = (self.layout.height as usize).div_ceil(tile_height);
        let tiles_per_plane = tiles_across * tiles_down;
        let expected = tiles_per_plane * self.layout.planes();

        if offsets.len() < expected || byte_counts.len() < expected {
            return Err(TiffError::CorruptData(format!(
                "{} tile offsets and {} byte counts, expected {}",
                offsets.len(), byte_counts.len(), expected)));
        }
        debug!("Reading {}x{} tiles of {}x{} with {}",
               tiles_across, tiles_down, tile_width, tile_height, handler.name());

        for (i, (&offset, &count)) in offsets.iter().zip(&byte_counts).take(expected).enumerate() {
            let plane = i / tiles_per_plane;
            let index = i % tiles_per_plane;
            let x0 = (index % tiles_across) * tile_width;
            let y0 = (index / tiles_across) * tile_height;

            reader.seek(SeekFrom::Start(offset))?;
            let mut compressed = vec![0u8; count as usize];
            reader.read_exact(&mut compressed)?;

            let tile = self.layout.decode_chunk(handler.as_ref(), &compressed, tile_width, tile_height)?;
            let band = self.layout.is_planar().then_some(plane);
            self.layout.scatter(&tile, tile_width, tile_height, x0, y0, band, raster);
        }

        Ok(())
    }
}
