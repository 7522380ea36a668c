//! Integration tests for the GeoTIFF -> image -> GeoTIFF round trip

extern crate std;

use std::fs;
use std::path::Path;
use tempfile::tempdir;

use geocvat::convert::{run_export, run_import, ExportOptions, ImageFormat, ImportOptions};
use geocvat::georef::{Crs, GeoMetadata, GeoReference, GeoTransform};
use geocvat::raster::{read_geotiff, write_geotiff, DataType, RasterData, WriteOptions};
use geocvat::tiff::constants::compression;

fn gradient(width: u32, height: u32, bands: usize) -> RasterData {
    let band = |offset: u32| -> Vec<u8> {
        (0..height)
            .flat_map(|row| (0..width).map(move |col| ((col * 3 + row * 2 + offset) % 256) as u8))
            .collect()
    };
    let bands = (0..bands as u32).map(|b| band(b * 40)).collect();
    RasterData::new(width, height, DataType::Uint8, bands).unwrap()
}

fn utm_georef() -> GeoReference {
    GeoReference::new(
        GeoTransform::from_origin(500000.0, 4000000.0, 10.0, 10.0),
        Some(Crs::from_epsg(32633)),
        None,
    )
}

fn export_options(out: &Path, json: &Path, bands: Vec<usize>, format: ImageFormat, level: u8) -> ExportOptions {
    ExportOptions {
        bands,
        format,
        compression: level,
        output_dir: out.to_path_buf(),
        json_dir: Some(json.to_path_buf()),
        threads: 2,
    }
}

#[test]
fn test_png_round_trip_is_exact() {
    let dir = tempdir().unwrap();
    let (rasters, images, meta, back) = (dir.path().join("rasters"), dir.path().join("png"),
                                         dir.path().join("json"), dir.path().join("back"));
    fs::create_dir(&rasters).unwrap();

    let source = gradient(37, 23, 4);
    write_geotiff(&rasters.join("scene.tif"), &source, &utm_georef(), &WriteOptions::default()).unwrap();

    let summary = run_export(&rasters, &export_options(&images, &meta, vec![3, 2, 1], ImageFormat::Png, 9)).unwrap();
    std::assert_eq!(summary.processed, 1);
    std::assert!(images.join("scene.png").is_file());

    let sidecar = GeoMetadata::load(&meta.join("scene.json")).unwrap();
    std::assert_eq!(sidecar.count, 3);
    std::assert_eq!(sidecar.dtype, DataType::Uint8);
    std::assert_eq!((sidecar.width, sidecar.height), (37, 23));

    let import = ImportOptions { meta_dir: meta.clone(), output_dir: back.clone(), ..ImportOptions::default() };
    let summary = run_import(&images, &import).unwrap();
    std::assert_eq!(summary.processed, 1);

    let restored = read_geotiff(&back.join("scene.tif")).unwrap();
    std::assert_eq!(restored.georef.transform, utm_georef().transform);
    std::assert_eq!(restored.georef.crs, Some(Crs::Utm { zone: 33, north: true }));
    std::assert_eq!((restored.data.width, restored.data.height), (37, 23));
    std::assert_eq!(restored.data.bands, source.select_bands(&[3, 2, 1]).unwrap().bands);
}

#[test]
fn test_uint16_gray_png_round_trip() {
    let dir = tempdir().unwrap();
    let (rasters, images, meta, back) = (dir.path().join("rasters"), dir.path().join("png"),
                                         dir.path().join("json"), dir.path().join("back"));
    fs::create_dir(&rasters).unwrap();

    let samples: Vec<u8> = (0..64u16).flat_map(|v| (v * 1000 + 7).to_le_bytes()).collect();
    let source = RasterData::new(8, 8, DataType::Uint16, vec![samples]).unwrap();
    let georef = GeoReference::new(GeoTransform::from_origin(-10.0, 60.0, 0.25, 0.25), Some(Crs::Wgs84), Some(0.0));
    let options = WriteOptions { compression: compression::LZW, colormap: None };
    write_geotiff(&rasters.join("dem.TIFF"), &source, &georef, &options).unwrap();

    run_export(&rasters, &export_options(&images, &meta, vec![1], ImageFormat::Png, 0)).unwrap();
    let import = ImportOptions { meta_dir: meta, output_dir: back.clone(), ..ImportOptions::default() };
    run_import(&images.join("dem.png"), &import).unwrap();

    let restored = read_geotiff(&back.join("dem.tif")).unwrap();
    std::assert_eq!(restored.data.data_type, DataType::Uint16);
    std::assert_eq!(restored.data.bands, source.bands);
    std::assert_eq!(restored.georef, georef);
}

#[test]
fn test_jpeg_round_trip_is_close() {
    let dir = tempdir().unwrap();
    let (rasters, images, meta, back) = (dir.path().join("rasters"), dir.path().join("jpg"),
                                         dir.path().join("json"), dir.path().join("back"));
    fs::create_dir(&rasters).unwrap();

    let smooth: Vec<u8> = (0..32u32).flat_map(|row| (0..32u32).map(move |col| (60 + col * 2 + row) as u8)).collect();
    let source = RasterData::new(32, 32, DataType::Uint8, vec![smooth]).unwrap();
    write_geotiff(&rasters.join("a.tif"), &source, &utm_georef(), &WriteOptions::default()).unwrap();

    run_export(&rasters, &export_options(&images, &meta, vec![1], ImageFormat::Jpg, 0)).unwrap();
    std::assert!(images.join("a.jpg").is_file());

    let import = ImportOptions { meta_dir: meta, output_dir: back.clone(), ..ImportOptions::default() };
    std::assert_eq!(run_import(&images, &import).unwrap().processed, 1);

    let restored = read_geotiff(&back.join("a.tif")).unwrap();
    std::assert_eq!(restored.georef.transform, utm_georef().transform);
    let max_error = restored.data.bands[0].iter()
        .zip(&source.bands[0])
        .map(|(a, b)| (*a as i16 - *b as i16).abs())
        .max()
        .unwrap();
    std::assert!(max_error <= 5, "max error {}", max_error);
}

#[test]
fn test_per_file_failures_are_skipped() {
    let dir = tempdir().unwrap();
    let (rasters, images, meta) = (dir.path().join("rasters"), dir.path().join("png"), dir.path().join("json"));
    fs::create_dir(&rasters).unwrap();

    write_geotiff(&rasters.join("three.tif"), &gradient(4, 4, 3), &utm_georef(), &WriteOptions::default()).unwrap();
    write_geotiff(&rasters.join("one.tif"), &gradient(4, 4, 1), &utm_georef(), &WriteOptions::default()).unwrap();
    fs::write(rasters.join("broken.tif"), b"not a tiff").unwrap();

    let summary = run_export(&rasters, &export_options(&images, &meta, vec![1, 2, 3], ImageFormat::Png, 3)).unwrap();
    std::assert_eq!(summary.processed, 1);
    std::assert_eq!(summary.skipped.len(), 2);
    std::assert!(images.join("three.png").is_file());
    std::assert!(!images.join("one.png").exists());
}

#[test]
fn test_invalid_band_count_is_fatal() {
    let dir = tempdir().unwrap();
    let options = export_options(&dir.path().join("o"), &dir.path().join("j"), vec![1, 2], ImageFormat::Png, 3);
    std::assert!(run_export(dir.path(), &options).is_err());
}

#[test]
fn test_import_skips_missing_sidecar_and_channel_mismatch() {
    let dir = tempdir().unwrap();
    let (images, meta, back) = (dir.path().join("png"), dir.path().join("json"), dir.path().join("back"));
    fs::create_dir_all(&images).unwrap();
    fs::create_dir_all(&meta).unwrap();

    let gray = image::GrayImage::from_pixel(4, 4, image::Luma([9u8]));
    gray.save(images.join("gray.png")).unwrap();
    gray.save(images.join("orphan.png")).unwrap();
    GeoMetadata::new(DataType::Uint8, 4, 4, 3, &utm_georef()).save(&meta.join("gray.json")).unwrap();

    let import = ImportOptions { meta_dir: meta, output_dir: back.clone(), ..ImportOptions::default() };
    let summary = run_import(&images, &import).unwrap();
    std::assert_eq!(summary.processed, 0);
    std::assert_eq!(summary.skipped.len(), 2);
    std::assert!(summary.skipped.iter().any(|(_, reason)| reason.contains("channels")));
    std::assert!(summary.skipped.iter().any(|(_, reason)| reason.contains("Sidecar not found")));
}
