//! Sample layout of a TIFF image and chunk decoding
//!
//! A chunk is a strip or a tile. Decoding decompresses it, converts samples
//! to little-endian and undoes horizontal differencing; scattering copies
//! the decoded samples into band buffers.

use log::debug;

use crate::compression::CompressionHandler;
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{compression, planar_config, predictor, sample_format, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::validation;

use super::data::RasterData;
use super::data_type::DataType;

/// How samples are stored in one IFD
#[derive(Debug, Clone, PartialEq)]
pub struct SampleLayout {
    pub width: u32,
    pub height: u32,
    pub samples: u16,
    pub data_type: DataType,
    pub planar: u16,
    pub compression: u64,
    pub predictor: u16,
    pub byte_order: ByteOrder,
}

impl SampleLayout {
    /// Collects the layout tags of an IFD
    ///
    /// All samples must share one bit depth and sample format.
    pub fn from_ifd(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD
    ) -> TiffResult<Self> {
        let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        let samples = ifd.get_samples_per_pixel();
        validation::validate_dimensions(width, height, samples)?;

        let bits = Self::uniform_value(tiff_reader, reader, ifd, tags::BITS_PER_SAMPLE, 1)?;
        let format = Self::uniform_value(tiff_reader, reader, ifd, tags::SAMPLE_FORMAT, sample_format::UNSIGNED as u64)?;
        let data_type = DataType::from_tiff(bits as u16, format as u16).ok_or_else(|| {
            TiffError::UnsupportedSampleLayout(format!("{} bit samples of format {}", bits, format))
        })?;

        let predictor = ifd.get_tag_value(tags::PREDICTOR).unwrap_or(predictor::NONE as u64) as u16;
        match predictor {
            predictor::NONE => {},
            predictor::HORIZONTAL_DIFFERENCING if !data_type.is_float() => {},
            _ => return Err(TiffError::UnsupportedPredictor(predictor as u64)),
        }

        let compression = ifd.get_tag_value(tags::COMPRESSION).unwrap_or(compression::NONE as u64);
        let planar = ifd.get_tag_value(tags::PLANAR_CONFIGURATION).unwrap_or(planar_config::CHUNKY as u64) as u16;

        let layout = SampleLayout {
            width: width as u32,
            height: height as u32,
            samples: samples as u16,
            data_type,
            planar,
            compression,
            predictor,
            byte_order: tiff_reader.byte_order()?,
        };
        debug!("Sample layout: {:?}", layout);
        Ok(layout)
    }

    /// Reads a per-sample tag, requiring every sample to carry the same value
    fn uniform_value(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD,
        tag: u16,
        default: u64
    ) -> TiffResult<u64> {
        if !ifd.has_tag(tag) {
            return Ok(default);
        }
        let values = tiff_reader.read_tag_values(reader, ifd, tag)?;
        match values.split_first() {
            Some((first, rest)) if rest.iter().all(|v| v == first) => Ok(*first),
            Some(_) => Err(TiffError::UnsupportedSampleLayout(format!(
                "mixed values {:?} for tag {}", values, tag))),
            None => Ok(default),
        }
    }

    pub fn is_planar(&self) -> bool {
        self.planar == planar_config::PLANAR
    }

    /// Samples per pixel inside one chunk
    pub fn chunk_samples(&self) -> usize {
        if self.is_planar() { 1 } else { self.samples as usize }
    }

    /// Number of separately stored planes
    pub fn planes(&self) -> usize {
        if self.is_planar() { self.samples as usize } else { 1 }
    }

    /// Decodes a chunk of `chunk_width` by `rows` pixels
    ///
    /// Extra decompressed bytes are dropped; a short chunk is an error.
    pub fn decode_chunk(
        &self,
        handler: &dyn CompressionHandler,
        compressed: &[u8],
        chunk_width: usize,
        rows: usize
    ) -> TiffResult<Vec<u8>> {
        let size = self.data_type.size_bytes();
        let expected = chunk_width * rows * self.chunk_samples() * size;

        let mut data = handler.decompress(compressed)?;
        if data.len() < expected {
            return Err(TiffError::CorruptData(format!(
                "chunk decoded to {} bytes, expected {}", data.len(), expected)));
        }
        data.truncate(expected);

        self.byte_order.samples_to_little_endian(&mut data, size);
        if self.predictor == predictor::HORIZONTAL_DIFFERENCING {
            undo_horizontal_differencing(&mut data, chunk_width * self.chunk_samples(), self.chunk_samples(), size);
        }
        Ok(data)
    }

    /// Copies a decoded chunk whose top-left pixel is `(x0, y0)` into
    /// `raster`, clipping whatever hangs over the image edge
    ///
    /// `plane` is the band of a planar chunk, `None` for chunky data.
    #[allow(clippy::too_many_arguments)]
    pub fn scatter(
        &self,
        chunk: &[u8],
        chunk_width: usize,
        rows: usize,
        x0: usize,
        y0: usize,
        plane: Option<usize>,
        raster: &mut RasterData
    ) {
        let size = self.data_type.size_bytes();
        let width = self.width as usize;
        let copy_cols = chunk_width.min(width.saturating_sub(x0));
        let copy_rows = rows.min((self.height as usize).saturating_sub(y0));

        match plane {
            Some(band) => {
                let Some(target) = raster.bands.get_mut(band) else { return };
                for r in 0..copy_rows {
                    let src = r * chunk_width * size;
                    let dst = ((y0 + r) * width + x0) * size;
                    target[dst..dst + copy_cols * size].copy_from_slice(&chunk[src..src + copy_cols * size]);
                }
            },
            None => {
                let spp = self.samples as usize;
                for r in 0..copy_rows {
                    for c in 0..copy_cols {
                        let src_pixel = (r * chunk_width + c) * spp * size;
                        let dst = ((y0 + r) * width + x0 + c) * size;
                        for (s, band) in raster.bands.iter_mut().enumerate().take(spp) {
                            let src = src_pixel + s * size;
                            band[dst..dst + size].copy_from_slice(&chunk[src..src + size]);
                        }
                    }
                }
            },
        }
    }
}

/// Reverses TIFF predictor 2 on little-endian integer samples
///
/// Each sample is stored as the difference to the same channel of the
/// previous pixel in the row; accumulation wraps.
pub fn undo_horizontal_differencing(data: &mut [u8], row_samples: usize, stride: usize, size: usize) {
    if row_samples == 0 {
        return;
    }
    for row in data.chunks_exact_mut(row_samples * size) {
        for i in stride..row_samples {
            let (prev, cur) = ((i - stride) * size, i * size);
            match size {
                1 => row[cur] = row[cur].wrapping_add(row[prev]),
                2 => {
                    let v = u16::from_le_bytes([row[cur], row[cur + 1]])
                        .wrapping_add(u16::from_le_bytes([row[prev], row[prev + 1]]));
                    row[cur..cur + 2].copy_from_slice(&v.to_le_bytes());
                },
                4 => {
                    let mut a = [0u8; 4];
                    let mut b = [0u8; 4];
                    a.copy_from_slice(&row[cur..cur + 4]);
                    b.copy_from_slice(&row[prev..prev + 4]);
                    let v = u32::from_le_bytes(a).wrapping_add(u32::from_le_bytes(b));
                    row[cur..cur + 4].copy_from_slice(&v.to_le_bytes());
                },
                _ => {
                    let mut a = [0u8; 8];
                    let mut b = [0u8; 8];
                    a.copy_from_slice(&row[cur..cur + 8]);
                    b.copy_from_slice(&row[prev..prev + 8]);
                    let v = u64::from_le_bytes(a).wrapping_add(u64::from_le_bytes(b));
                    row[cur..cur + 8].copy_from_slice(&v.to_le_bytes());
                },
            }
        }
    }
}
