//! Tests for band buffers and sample helpers

use super::layout::undo_horizontal_differencing;
use super::writer::color_map_values;
use super::{DataType, RasterData};
use crate::error::ConvertError;
use crate::tiff::constants::sample_format;

#[test]
fn test_interleaved_samples_split_into_bands() {
    let raster = RasterData::from_interleaved(2, 1, DataType::Uint8, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(raster.bands, vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
    assert_eq!(raster.interleaved(), vec![1, 2, 3, 4, 5, 6]);
    assert!(RasterData::from_interleaved(2, 1, DataType::Uint8, 3, &[1, 2, 3]).is_err());
}

#[test]
fn test_band_selection_is_one_based() {
    let raster = RasterData::new(1, 1, DataType::Uint8, vec![vec![10], vec![20], vec![30]]).unwrap();
    assert_eq!(raster.select_bands(&[3, 1, 2]).unwrap().bands, vec![vec![30], vec![10], vec![20]]);
    assert!(matches!(raster.select_bands(&[0]), Err(ConvertError::BandOutOfRange { band: 0, count: 3 })));
    assert!(matches!(raster.select_bands(&[4]), Err(ConvertError::BandOutOfRange { band: 4, count: 3 })));
}

#[test]
fn test_band_length_is_checked() {
    assert!(RasterData::new(2, 2, DataType::Uint16, vec![vec![0; 8]]).is_ok());
    assert!(RasterData::new(2, 2, DataType::Uint16, vec![vec![0; 4]]).is_err());
    assert!(RasterData::new(2, 2, DataType::Uint8, Vec::new()).is_err());
}

#[test]
fn test_u16_view() {
    let raster = RasterData::new(2, 1, DataType::Uint16, vec![vec![0x34, 0x12, 0xff, 0x00]]).unwrap();
    assert_eq!(raster.interleaved_u16().unwrap(), vec![0x1234, 0x00ff]);
    assert!(RasterData::zeroed(1, 1, DataType::Uint8, 1).interleaved_u16().is_err());
}

#[test]
fn test_horizontal_differencing_wraps() {
    // Two rows of two-sample u16 pixels
    let diffs: Vec<u16> = vec![100, 200, 5, 65535, 1, 2, 3, 4];
    let mut bytes: Vec<u8> = diffs.iter().flat_map(|v| v.to_le_bytes()).collect();
    undo_horizontal_differencing(&mut bytes, 4, 2, 2);
    let values: Vec<u16> = bytes.chunks_exact(2).map(|b| u16::from_le_bytes([b[0], b[1]])).collect();
    assert_eq!(values, vec![100, 200, 105, 199, 1, 2, 4, 6]);
}

#[test]
fn test_data_type_tiff_mapping() {
    for data_type in [DataType::Uint8, DataType::Int16, DataType::Uint32, DataType::Float32, DataType::Float64] {
        assert_eq!(DataType::from_tiff(data_type.bits(), data_type.sample_format()), Some(data_type));
    }
    assert_eq!(DataType::from_tiff(12, sample_format::UNSIGNED), None);
    assert_eq!(DataType::from_tiff(16, sample_format::IEEEFP), None);
    assert_eq!(serde_json::to_string(&DataType::Float32).unwrap(), "\"float32\"");
}

#[test]
fn test_color_map_layout() {
    let values = color_map_values(&[[0, 0, 0], [255, 128, 1]]);
    assert_eq!(values.len(), 768);
    assert_eq!((values[1], values[257], values[513]), (65535, 128 * 257, 257));
    assert_eq!(values[2], 0);
}
