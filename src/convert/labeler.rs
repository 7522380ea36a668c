//! CVAT annotations to label GeoTIFFs
//!
//! Every image of the export becomes a single-band uint8 raster on the grid
//! described by its sidecar: 0 is background, labels are numbered from 1.

use log::{debug, info, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::annotations::{parse_cvat_file, ImageAnnotations, LabelMap};
use crate::error::{ConvertError, ConvertResult};
use crate::georef::{GeoMetadata, GeoReference};
use crate::raster::{write_geotiff, WriteOptions};
use crate::rasterize::LabelCanvas;
use crate::tiff::constants::compression;

use super::batch::{require_dir, run_batch, RunSummary};

/// Value of unlabelled pixels
pub const BACKGROUND: f64 = 0.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RasterizeOptions {
    pub meta_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Compression tag value of the written rasters
    pub compression: u16,
}

impl RasterizeOptions {
    pub fn new(meta_dir: &Path, output_dir: &Path) -> Self {
        RasterizeOptions {
            meta_dir: meta_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            compression: compression::LZW,
        }
    }
}

/// Default output directory: `labels` next to the XML file
pub fn default_output_dir(xml_path: &Path) -> PathBuf {
    xml_path.parent().unwrap_or_else(|| Path::new(".")).join("labels")
}

fn validate_xml_path(xml_path: &Path) -> ConvertResult<()> {
    let is_xml = xml_path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("xml"))
        .unwrap_or(false);
    if !is_xml {
        return Err(ConvertError::InvalidArgument(format!("{} is not an .xml file", xml_path.display())));
    }
    if !xml_path.is_file() {
        return Err(ConvertError::InvalidArgument(format!("Input XML {} does not exist", xml_path.display())));
    }
    Ok(())
}

/// Checks that an image name stays below the directories it is joined onto
///
/// CVAT names may carry subdirectories, but never `..`, a root or a drive
/// prefix.
fn contained_image_path(name: &str) -> ConvertResult<&Path> {
    let path = Path::new(name);
    let escapes = path.components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes || path.file_name().is_none() {
        return Err(ConvertError::InvalidArgument(format!(
            "image name {} does not stay inside the output directory", name)));
    }
    Ok(path)
}

/// Rasterizes one image's shapes
///
/// # Arguments
/// * `image` - Parsed `<image>` element with its shapes
/// * `labels` - Label name to value mapping of the whole export
/// * `options` - Sidecar and output directories, compression
///
/// # Returns
/// The path of the written label raster, or an error that skips this image
pub fn rasterize_image(
    image: &ImageAnnotations,
    labels: &LabelMap,
    options: &RasterizeOptions
) -> ConvertResult<PathBuf> {
    let relative = contained_image_path(&image.name)?;
    let metadata = GeoMetadata::load(&GeoMetadata::sidecar_path(&options.meta_dir, &image.name))?;
    if image.width == 0 || image.height == 0 {
        return Err(ConvertError::InvalidArgument(format!(
            "image {} has an empty {}x{} grid", image.name, image.width, image.height)));
    }
    if (image.width, image.height) != (metadata.width, metadata.height) {
        warn!("{}: annotated as {}x{}, sidecar says {}x{}; using the annotation size",
              image.name, image.width, image.height, metadata.width, metadata.height);
    }

    let mut canvas = LabelCanvas::new(image.width, image.height);
    let drawn = canvas.draw_all(&image.annotations, labels);
    debug!("{}: drew {} of {} shape(s)", image.name, drawn, image.annotations.len());

    let output = options.output_dir.join(relative.with_extension("tif"));
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    let georef = GeoReference::new(metadata.transform, metadata.crs, Some(BACKGROUND));
    let write_options = WriteOptions {
        compression: options.compression,
        colormap: labels.palette(),
    };
    write_geotiff(&output, &canvas.into_raster(), &georef, &write_options)?;
    Ok(output)
}

/// Rasterizes every image of a CVAT export
///
/// XML problems abort the run; a missing or unreadable sidecar only skips
/// its image.
pub fn run_rasterize(xml_path: &Path, options: &RasterizeOptions) -> ConvertResult<RunSummary> {
    validate_xml_path(xml_path)?;
    require_dir(&options.meta_dir, "Metadata directory")?;

    let set = parse_cvat_file(xml_path)?;
    let labels = LabelMap::build(&set)?;
    info!("{} label(s) mapped to values 1..={}", labels.len(), labels.len());

    fs::create_dir_all(&options.output_dir)?;
    let summary = run_batch(
        &set.images,
        1,
        "Rasterizing",
        |image| image.name.clone(),
        |image| rasterize_image(image, &labels, options).map(|_| ()),
    )?;
    summary.log("Rasterize");
    Ok(summary)
}
