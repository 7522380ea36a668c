//! In-memory raster bands

use crate::error::{ConvertError, ConvertResult};
use super::data_type::DataType;

/// Pixel data of a raster, one little-endian buffer per band
#[derive(Debug, Clone, PartialEq)]
pub struct RasterData {
    pub width: u32,
    pub height: u32,
    pub data_type: DataType,
    pub bands: Vec<Vec<u8>>,
}

impl RasterData {
    /// Wraps band buffers, checking every band holds `width * height` samples
    pub fn new(width: u32, height: u32, data_type: DataType, bands: Vec<Vec<u8>>) -> ConvertResult<Self> {
        let expected = width as usize * height as usize * data_type.size_bytes();
        if bands.is_empty() {
            return Err(ConvertError::InvalidArgument("raster needs at least one band".to_string()));
        }
        if let Some((i, band)) = bands.iter().enumerate().find(|(_, b)| b.len() != expected) {
            return Err(ConvertError::InvalidArgument(format!(
                "band {} holds {} bytes, expected {}", i + 1, band.len(), expected)));
        }
        Ok(RasterData { width, height, data_type, bands })
    }

    /// Raster with `count` bands of zeros
    pub fn zeroed(width: u32, height: u32, data_type: DataType, count: usize) -> Self {
        let len = width as usize * height as usize * data_type.size_bytes();
        RasterData {
            width,
            height,
            data_type,
            bands: vec![vec![0u8; len]; count],
        }
    }

    /// Splits pixel-interleaved samples into bands
    pub fn from_interleaved(
        width: u32,
        height: u32,
        data_type: DataType,
        samples: usize,
        data: &[u8]
    ) -> ConvertResult<Self> {
        let size = data_type.size_bytes();
        let pixels = width as usize * height as usize;
        if samples == 0 || data.len() != pixels * samples * size {
            return Err(ConvertError::InvalidArgument(format!(
                "{} bytes do not form a {}x{}x{} {} raster", data.len(), width, height, samples, data_type)));
        }

        let mut bands = vec![Vec::with_capacity(pixels * size); samples];
        for pixel in data.chunks_exact(samples * size) {
            for (band, sample) in bands.iter_mut().zip(pixel.chunks_exact(size)) {
                band.extend_from_slice(sample);
            }
        }
        Ok(RasterData { width, height, data_type, bands })
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Band by zero-based index
    pub fn band(&self, index: usize) -> Option<&[u8]> {
        self.bands.get(index).map(Vec::as_slice)
    }

    /// New raster made of the given 1-based bands, in the given order
    pub fn select_bands(&self, bands: &[usize]) -> ConvertResult<RasterData> {
        let count = self.band_count();
        let selected = bands.iter()
            .map(|&band| {
                if (1..=count).contains(&band) {
                    Ok(self.bands[band - 1].clone())
                } else {
                    Err(ConvertError::BandOutOfRange { band, count })
                }
            })
            .collect::<ConvertResult<Vec<_>>>()?;
        Ok(RasterData {
            width: self.width,
            height: self.height,
            data_type: self.data_type,
            bands: selected,
        })
    }

    /// Pixel-interleaved little-endian samples
    pub fn interleaved(&self) -> Vec<u8> {
        let size = self.data_type.size_bytes();
        if self.bands.len() == 1 {
            return self.bands[0].clone();
        }

        let mut out = Vec::with_capacity(self.pixel_count() * size * self.bands.len());
        for pixel in 0..self.pixel_count() {
            let start = pixel * size;
            for band in &self.bands {
                out.extend_from_slice(&band[start..start + size]);
            }
        }
        out
    }

    /// Pixel-interleaved 16-bit samples
    pub fn interleaved_u16(&self) -> ConvertResult<Vec<u16>> {
        if self.data_type != DataType::Uint16 {
            return Err(ConvertError::UnsupportedDataType(format!(
                "expected uint16 samples, raster is {}", self.data_type)));
        }
        Ok(self.interleaved()
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect())
    }
}
