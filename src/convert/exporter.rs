//! GeoTIFF to PNG/JPEG export
//!
//! Each raster is reduced to one gray or three RGB bands and encoded with
//! the `image` crate. The georeferencing goes to a JSON sidecar so the
//! annotated image can be mapped back onto the raster grid.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageBuffer, Luma, Rgb};
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, ConvertResult};
use crate::georef::GeoMetadata;
use crate::raster::{read_geotiff, DataType, RasterData};

use super::batch::{file_stem, list_inputs, require_dir, run_batch, RunSummary};

/// Raster extensions picked up from the input directory
pub const RASTER_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

/// Output encoding of exported images
///
/// `Jpg` and `Jpeg` encode the same way and differ only in the file
/// extension they write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpg,
    Jpeg,
}

impl ImageFormat {
    /// Parses a `--format` value
    ///
    /// # Arguments
    /// * `name` - `png`, `jpg` or `jpeg` in any case
    ///
    /// # Returns
    /// The format, or `InvalidArgument` for anything else
    pub fn from_name(name: &str) -> ConvertResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" => Ok(ImageFormat::Jpg),
            "jpeg" => Ok(ImageFormat::Jpeg),
            other => Err(ConvertError::InvalidArgument(format!("unknown image format {:?}", other))),
        }
    }

    /// Extension of written files, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    pub fn is_jpeg(&self) -> bool {
        !matches!(self, ImageFormat::Png)
    }
}

/// Settings of a GeoTIFF to image run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// 1-based band indices, one for gray or three for RGB
    pub bands: Vec<usize>,
    pub format: ImageFormat,
    /// 0 (fastest / best quality) to 9 (smallest)
    pub compression: u8,
    pub output_dir: PathBuf,
    /// Sidecar directory, `None` to skip sidecars
    pub json_dir: Option<PathBuf>,
    pub threads: usize,
}

impl ExportOptions {
    /// Checks the options before any file is touched
    ///
    /// # Returns
    /// `InvalidArgument` unless there are 1 or 3 bands and the compression
    /// level is within 0..=9
    pub fn validate(&self) -> ConvertResult<()> {
        if self.bands.len() != 1 && self.bands.len() != 3 {
            return Err(ConvertError::InvalidArgument(format!(
                "expected 1 or 3 bands, got {}", self.bands.len())));
        }
        if self.compression > 9 {
            return Err(ConvertError::InvalidArgument(format!(
                "compression level {} outside 0..=9", self.compression)));
        }
        Ok(())
    }
}

/// PNG deflate effort for a 0-9 level
pub fn png_compression(level: u8) -> CompressionType {
    match level {
        0..=2 => CompressionType::Fast,
        3..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// JPEG quality for a 0-9 level; 0 is quality 100
pub fn jpeg_quality(level: u8) -> u8 {
    100 - 10 * level.min(9)
}

/// Wraps gray or RGB bands in an image the encoders accept
///
/// # Arguments
/// * `raster` - Already selected bands, one or three
/// * `format` - Target encoding; JPEG takes 8-bit samples only
///
/// # Returns
/// The image, or an error for band counts and sample types the format
/// cannot hold
pub fn to_image(raster: &RasterData, format: ImageFormat) -> ConvertResult<DynamicImage> {
    let (width, height) = (raster.width, raster.height);
    let bad_buffer = || ConvertError::InvalidArgument(format!("pixel buffer does not match {}x{}", width, height));

    let image = match (raster.data_type, raster.band_count()) {
        (DataType::Uint8, 1) => DynamicImage::ImageLuma8(
            ImageBuffer::<Luma<u8>, _>::from_raw(width, height, raster.interleaved()).ok_or_else(bad_buffer)?),
        (DataType::Uint8, 3) => DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, raster.interleaved()).ok_or_else(bad_buffer)?),
        (DataType::Uint16, _) if format.is_jpeg() => {
            return Err(ConvertError::UnsupportedDataType(
                "JPEG holds 8-bit samples only, raster is uint16".to_string()));
        },
        (DataType::Uint16, 1) => DynamicImage::ImageLuma16(
            ImageBuffer::<Luma<u16>, _>::from_raw(width, height, raster.interleaved_u16()?).ok_or_else(bad_buffer)?),
        (DataType::Uint16, 3) => DynamicImage::ImageRgb16(
            ImageBuffer::<Rgb<u16>, _>::from_raw(width, height, raster.interleaved_u16()?).ok_or_else(bad_buffer)?),
        (data_type, count) => {
            return Err(ConvertError::UnsupportedDataType(format!(
                "{} band(s) of {} cannot be written as {}", count, data_type, format.extension())));
        },
    };
    Ok(image)
}

/// Encodes `image` at `path`
pub fn encode_image(image: &DynamicImage, path: &Path, format: ImageFormat, level: u8) -> ConvertResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        ImageFormat::Png => {
            let encoder = PngEncoder::new_with_quality(&mut writer, png_compression(level), FilterType::Adaptive);
            image.write_with_encoder(encoder)?;
        },
        ImageFormat::Jpg | ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut writer, jpeg_quality(level));
            image.write_with_encoder(encoder)?;
        },
    }
    writer.flush()?;
    Ok(())
}

/// Exports one raster
///
/// # Arguments
/// * `path` - GeoTIFF to read
/// * `options` - Bands, format and output directories
///
/// # Returns
/// The path of the written image. The sidecar, when requested, lands in
/// `json_dir` under the same stem.
pub fn export_file(path: &Path, options: &ExportOptions) -> ConvertResult<PathBuf> {
    let raster = read_geotiff(path)?;
    let selected = raster.data.select_bands(&options.bands)?;
    let image = to_image(&selected, options.format)?;

    let stem = file_stem(path)?;
    let image_path = options.output_dir.join(format!("{}.{}", stem, options.format.extension()));
    encode_image(&image, &image_path, options.format, options.compression)?;
    debug!("Wrote {}", image_path.display());

    if let Some(json_dir) = &options.json_dir {
        let metadata = GeoMetadata::new(
            selected.data_type, selected.width, selected.height,
            selected.band_count() as u16, &raster.georef);
        metadata.save(&json_dir.join(format!("{}.json", stem)))?;
    }
    Ok(image_path)
}

/// Exports every raster in `input_dir`
///
/// Bad options or a missing input directory abort; a raster that fails is
/// skipped and recorded.
///
/// # Returns
/// Processed and skipped counts of the run
pub fn run_export(input_dir: &Path, options: &ExportOptions) -> ConvertResult<RunSummary> {
    options.validate()?;
    require_dir(input_dir, "Input directory")?;

    fs::create_dir_all(&options.output_dir)?;
    if let Some(json_dir) = &options.json_dir {
        fs::create_dir_all(json_dir)?;
    }

    let files = list_inputs(input_dir, &RASTER_EXTENSIONS)?;
    if files.is_empty() {
        warn!("No .tif/.tiff files in {}", input_dir.display());
    }
    info!("Exporting {} raster(s) to {} with {} thread(s)",
          files.len(), options.output_dir.display(), options.threads);

    let summary = run_batch(
        &files,
        options.threads,
        "Exporting",
        |path| path.display().to_string(),
        |path| export_file(path, options).map(|_| ()),
    )?;
    summary.log("Export");
    Ok(summary)
}
