//! PNG/JPEG back to GeoTIFF
//!
//! The decoded image keeps its own channel layout and sample type; the
//! sidecar only contributes georeferencing and nodata.

use image::DynamicImage;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, ConvertResult};
use crate::georef::GeoMetadata;
use crate::raster::{write_geotiff, DataType, RasterData, WriteOptions};
use crate::tiff::constants::compression;

use super::batch::{file_stem, list_inputs, require_dir, run_batch, RunSummary};

/// Image extensions picked up from an input directory
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Settings of an image to GeoTIFF run
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    pub meta_dir: PathBuf,
    pub output_dir: PathBuf,
    pub threads: usize,
    /// Compression tag value of the written rasters
    pub compression: u16,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            meta_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            threads: 1,
            compression: compression::LZW,
        }
    }
}

fn to_le_bytes(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Splits a decoded image into bands
///
/// Gray, gray+alpha, RGB and RGBA at 8 or 16 bits are accepted.
pub fn image_to_raster(image: &DynamicImage) -> ConvertResult<RasterData> {
    let (width, height) = (image.width(), image.height());
    let (data_type, channels, bytes) = match image {
        DynamicImage::ImageLuma8(buf) => (DataType::Uint8, 1, buf.as_raw().clone()),
        DynamicImage::ImageLumaA8(buf) => (DataType::Uint8, 2, buf.as_raw().clone()),
        DynamicImage::ImageRgb8(buf) => (DataType::Uint8, 3, buf.as_raw().clone()),
        DynamicImage::ImageRgba8(buf) => (DataType::Uint8, 4, buf.as_raw().clone()),
        DynamicImage::ImageLuma16(buf) => (DataType::Uint16, 1, to_le_bytes(buf.as_raw())),
        DynamicImage::ImageLumaA16(buf) => (DataType::Uint16, 2, to_le_bytes(buf.as_raw())),
        DynamicImage::ImageRgb16(buf) => (DataType::Uint16, 3, to_le_bytes(buf.as_raw())),
        DynamicImage::ImageRgba16(buf) => (DataType::Uint16, 4, to_le_bytes(buf.as_raw())),
        other => {
            return Err(ConvertError::UnsupportedDataType(format!(
                "decoded colour type {:?}", other.color())));
        },
    };
    RasterData::from_interleaved(width, height, data_type, channels, &bytes)
}

/// Converts one image using the sidecar that shares its stem
///
/// # Arguments
/// * `path` - PNG or JPEG to read
/// * `options` - Sidecar and output directories, compression
///
/// # Returns
/// The path of the written GeoTIFF, or `ChannelMismatch` when the image
/// does not have the band count its sidecar records
pub fn import_file(path: &Path, options: &ImportOptions) -> ConvertResult<PathBuf> {
    let stem = file_stem(path)?;
    let metadata = GeoMetadata::load(&options.meta_dir.join(format!("{}.json", stem)))?;

    let image = image::open(path)?;
    let raster = image_to_raster(&image)?;

    let channels = raster.band_count() as u16;
    if channels != metadata.count {
        return Err(ConvertError::ChannelMismatch { expected: metadata.count, found: channels });
    }
    if raster.data_type != metadata.dtype {
        warn!("{}: decoded {} samples, sidecar says {}; writing {}",
              path.display(), raster.data_type, metadata.dtype, raster.data_type);
    }
    if (raster.width, raster.height) != (metadata.width, metadata.height) {
        warn!("{}: image is {}x{}, sidecar says {}x{}; writing the image size",
              path.display(), raster.width, raster.height, metadata.width, metadata.height);
    }

    let output = options.output_dir.join(format!("{}.tif", stem));
    let write_options = WriteOptions { compression: options.compression, colormap: None };
    write_geotiff(&output, &raster, &metadata.georeference(), &write_options)?;
    Ok(output)
}

/// Converts an image file or every image in a directory
///
/// # Arguments
/// * `input` - A single image or a directory of images
/// * `options` - Sidecar and output directories, threads, compression
///
/// # Returns
/// Processed and skipped counts of the run
pub fn run_import(input: &Path, options: &ImportOptions) -> ConvertResult<RunSummary> {
    require_dir(&options.meta_dir, "Metadata directory")?;

    let files = if input.is_dir() {
        list_inputs(input, &IMAGE_EXTENSIONS)?
    } else if input.is_file() {
        vec![input.to_path_buf()]
    } else {
        return Err(ConvertError::InvalidArgument(format!("Input {} does not exist", input.display())));
    };
    if files.is_empty() {
        warn!("No .png/.jpg/.jpeg files in {}", input.display());
    }

    fs::create_dir_all(&options.output_dir)?;
    info!("Importing {} image(s) to {} with {} thread(s)",
          files.len(), options.output_dir.display(), options.threads);

    let summary = run_batch(
        &files,
        options.threads,
        "Importing",
        |path| path.display().to_string(),
        |path| import_file(path, options).map(|_| ()),
    )?;
    summary.log("Import");
    Ok(summary)
}
