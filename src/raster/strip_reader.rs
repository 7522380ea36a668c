//! Strip-organised image data
//!
//! Strips span the full image width. Chunky files store
//! `ceil(height / rows_per_strip)` strips; planar files repeat that count
//! once per sample plane.

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

/// Decodes all strips of one IFD
pub struct StripReader<'a> {
    ifd: &'a IFD,
    tiff_reader: &'a TiffReader,
    layout: &'a SampleLayout,
}

impl<'a> StripReader<'a> {
    pub fn new(ifd: &'a IFD, tiff_reader: &'a TiffReader, layout: &'a SampleLayout) -> Self {
        StripReader { ifd, tiff_reader, layout }
    }

    /// RowsPerStrip, defaulting to (and capped at) the image height
    fn rows_per_strip(&self) -> usize {
        let height = self.layout.height as usize;
        match self.ifd.get_tag_value(tags::ROWS_PER_STRIP) {
            Some(rows) if rows > 0 => (rows as usize).min(height),
            _ => height,
        }
    }

    /// Decodes every strip into `raster`
    pub fn read_into(&self, reader: &mut dyn SeekableReader, raster: &mut RasterData) -> TiffResult<()> {
        let handler = CompressionFactory::create_handler(self.layout.compression)?;
        let offsets = self.tiff_reader.read_tag_values(reader, self.ifd, tags::STRIP_OFFSETS)?;
        let byte_counts = self.tiff_reader.read_tag_values(reader, self.ifd, tags::STRIP_BYTE_COUNTS)?;

        let rows_per_strip = self.rows_per_strip();
        let height = self.layout.height as usize;
        let width = self.layout.width as usize;
        let strips_per_plane = height.div_ceil(rows_per_strip);
        let expected = strips_per_plane * self.layout.planes();

        if offsets.len() < expected || byte_counts.len() < expected {
            return Err(TiffError::CorruptData(format!(
                "{} strip offsets and {} byte counts, expected {}",
                offsets.len(), byte_counts.len(), expected)));
        }
        debug!("Reading {} strips of {} rows with {}", expected, rows_per_strip, handler.name());

        for (i, (&offset, &count)) in offsets.iter().zip(&byte_counts).take(expected).enumerate() {
            let plane = i / strips_per_plane;
            let y0 = (i % strips_per_plane) * rows_per_strip;
            let rows = rows_per_strip.min(height - y0);

            reader.seek(SeekFrom::Start(offset))?;
            let mut compressed = vec![0u8; count as usize];
            reader.read_exact(&mut compressed)?;

            let strip = self.layout.decode_chunk(handler.as_ref(), &compressed, width, rows)?;
            let band = self.layout.is_planar().then_some(plane);
            self.layout.scatter(&strip, width, rows, 0, y0, band, raster);
        }

        Ok(())
    }
}
