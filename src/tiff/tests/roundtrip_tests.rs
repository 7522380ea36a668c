//! Tests writing GeoTIFFs with the builder and reading them back

extern crate std;

use std::io::Cursor;

use crate::georef::{Crs, GeoReference, GeoTransform};
use crate::raster::{read_geotiff, write_geotiff, DataType, RasterData, WriteOptions};
use crate::tiff::builder::TiffBuilder;
use crate::tiff::constants::{compression, geo_keys, photometric, tags};
use crate::tiff::geo_key_parser::GeoKeyParser;
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

fn rgb_u16_raster() -> RasterData {
    let bands = (0..3u16)
        .map(|b| (0..12u16).flat_map(|i| (b * 1000 + i * 37).to_le_bytes()).collect())
        .collect();
    RasterData::new(4, 3, DataType::Uint16, bands).unwrap()
}

#[test]
fn test_multiband_round_trip_with_zstd() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rgb.tif");
    let data = rgb_u16_raster();
    let georef = GeoReference::new(
        GeoTransform::from_origin(11.25, 48.5, 0.001, 0.001), Some(Crs::Wgs84), Some(65535.0));
    let options = WriteOptions { compression: compression::ZSTD, colormap: None };

    write_geotiff(&path, &data, &georef, &options).unwrap();
    let raster = read_geotiff(&path).unwrap();

    std::assert_eq!(raster.data, data);
    std::assert_eq!(raster.georef, georef);
}

#[test]
fn test_rotated_transform_uses_model_transformation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rotated.tif");
    let data = RasterData::zeroed(2, 2, DataType::Float32, 1);
    let transform = GeoTransform::new(0.5, 0.1, 100.0, 0.1, -0.5, 200.0);
    let georef = GeoReference::new(transform, Some(Crs::from_epsg(3035)), None);

    write_geotiff(&path, &data, &georef, &WriteOptions::default()).unwrap();

    let mut reader = TiffReader::new();
    let tiff = reader.load(&path).unwrap();
    let ifd = tiff.main_ifd().unwrap();
    std::assert!(ifd.has_tag(tags::MODEL_TRANSFORMATION_TAG));
    std::assert!(!ifd.has_tag(tags::MODEL_TIEPOINT_TAG));

    let raster = read_geotiff(&path).unwrap();
    std::assert_eq!(raster.georef.transform, transform);
    std::assert_eq!(raster.georef.crs, Some(Crs::Epsg(3035)));
    std::assert_eq!(raster.georef.nodata, None);
}

#[test]
fn test_palette_label_raster() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.tif");
    let data = RasterData::new(3, 1, DataType::Uint8, vec![vec![0, 1, 2]]).unwrap();
    let georef = GeoReference::new(GeoTransform::identity(), None, Some(0.0));
    let options = WriteOptions {
        compression: compression::DEFLATE,
        colormap: Some(vec![[0, 0, 0], [255, 0, 0], [0, 128, 255]]),
    };

    write_geotiff(&path, &data, &georef, &options).unwrap();

    let mut reader = TiffReader::new();
    let tiff = reader.load(&path).unwrap();
    let ifd = tiff.main_ifd().unwrap();
    let mut file = reader.create_reader().unwrap();
    std::assert_eq!(ifd.get_tag_value(tags::PHOTOMETRIC_INTERPRETATION), Some(photometric::PALETTE as u64));

    let color_map = reader.read_tag_values(&mut file, ifd, tags::COLOR_MAP).unwrap();
    std::assert_eq!(color_map.len(), 768);
    std::assert_eq!(color_map[1], 65535);
    std::assert_eq!(color_map[256 + 2], 128 * 257);
    std::assert_eq!(color_map[512 + 2], 65535);

    // "0" plus terminator fits the value field and is stored inline
    std::assert!(ifd.get_entry(tags::GDAL_NODATA).unwrap().is_value_inline(false));
    std::assert_eq!(GeoKeyParser::read_nodata(&reader, &mut file, ifd).unwrap(), Some(0.0));

    let raster = read_geotiff(&path).unwrap();
    std::assert_eq!(raster.data.bands[0], vec![0, 1, 2]);
}

#[test]
fn test_big_tiff_layout_round_trip() {
    let mut builder = TiffBuilder::new(true);
    let index = builder.add_ifd(IFD::new(0, 0));
    builder.add_image_structure_tags(index, 2, 2, 1, DataType::Uint8, compression::NONE).unwrap();
    builder.setup_single_strip(index, vec![1, 2, 3, 4], 2).unwrap();
    builder.set_georeference(index, &GeoReference::new(
        GeoTransform::from_origin(0.0, 10.0, 5.0, 5.0), Some(Crs::WebMercator), None)).unwrap();

    let mut sink = Cursor::new(Vec::new());
    builder.write_to(&mut sink).unwrap();

    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut sink).unwrap();
    std::assert!(tiff.is_big_tiff);
    let ifd = tiff.main_ifd().unwrap();
    std::assert_eq!(ifd.get_dimensions(), Some((2, 2)));

    let georef = GeoKeyParser::read_georeference(&reader, &mut sink, ifd).unwrap();
    std::assert_eq!(georef.crs, Some(Crs::WebMercator));
    std::assert_eq!(georef.transform.apply(2.0, 2.0), (10.0, 0.0));
}

#[test]
fn test_builder_rejects_unknown_ifd() {
    let mut builder = TiffBuilder::new(false);
    std::assert!(builder.setup_single_strip(0, vec![0], 1).is_err());
}

/// Writes a 1x1 raster under `crs` and returns the (GeographicType, ProjectedCSType) key values
fn crs_keys_after_round_trip(crs: Crs) -> (Option<u16>, Option<u16>) {
    let mut builder = TiffBuilder::new(false);
    let index = builder.add_ifd(IFD::new(0, 0));
    builder.add_image_structure_tags(index, 1, 1, 1, DataType::Uint8, compression::NONE).unwrap();
    builder.setup_single_strip(index, vec![0], 1).unwrap();
    builder.set_georeference(index, &GeoReference::new(
        GeoTransform::from_origin(0.0, 1.0, 1.0, 1.0), Some(crs), None)).unwrap();

    let mut sink = Cursor::new(Vec::new());
    builder.write_to(&mut sink).unwrap();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut sink).unwrap();
    let keys = GeoKeyParser::parse_geo_key_directory(&reader, &mut sink, tiff.main_ifd().unwrap()).unwrap();
    let value = |id: u16| keys.iter().find(|k| k.key_id == id).and_then(|k| k.inline_value());
    (value(geo_keys::GEOGRAPHIC_TYPE), value(geo_keys::PROJECTED_CS_TYPE))
}

#[test]
fn test_geo_keys_follow_crs_kind() {
    // World Equidistant Cylindrical is projected despite its 40xx code
    std::assert_eq!(crs_keys_after_round_trip(Crs::from_epsg(4087)), (None, Some(4087)));
    // NAD83(2011) is geographic outside the 40xx block
    std::assert_eq!(crs_keys_after_round_trip(Crs::from_epsg(6318)), (Some(6318), None));
    std::assert_eq!(crs_keys_after_round_trip(Crs::Wgs84), (Some(4326), None));
    std::assert_eq!(crs_keys_after_round_trip(Crs::from_epsg(32633)), (None, Some(32633)));
}

#[test]
fn test_unstorable_epsg_code_is_an_error() {
    let mut builder = TiffBuilder::new(false);
    let index = builder.add_ifd(IFD::new(0, 0));
    let georef = GeoReference::new(
        GeoTransform::from_origin(0.0, 1.0, 1.0, 1.0), Some(Crs::from_epsg(100000)), None);
    std::assert!(builder.set_georeference(index, &georef).is_err());
}
