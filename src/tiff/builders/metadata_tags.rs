//! GDAL metadata tags
//!
//! GDAL keeps the nodata value as an ASCII tag of its own; other tools
//! (rasterio, QGIS) read it from there.

use log::debug;

use crate::tiff::builders::ExternalData;
use crate::tiff::constants::{tags, field_types};
use crate::tiff::ifd::IFD;
use crate::utils::tiff_utils;

/// Adds metadata tags
pub struct MetadataBuilder;

impl MetadataBuilder {
    /// Formats a nodata value the way GDAL writes it
    pub fn format_nodata(value: f64) -> String {
        if value.is_nan() {
            "nan".to_string()
        } else if value.is_infinite() {
            if value > 0.0 { "inf".to_string() } else { "-inf".to_string() }
        } else if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else {
            format!("{}", value)
        }
    }

    /// Adds the GDAL_NODATA tag
    pub fn add_nodata_tag(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        nodata_value: f64
    ) {
        let text = Self::format_nodata(nodata_value);
        debug!("Adding GDAL NoData tag: {}", text);

        let mut bytes = text.into_bytes();
        bytes.push(0);
        tiff_utils::create_external_tag(
            ifd, external_data, ifd_index,
            tags::GDAL_NODATA, field_types::ASCII, bytes);
    }

    /// Adds the Software tag
    pub fn add_software_tag(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        software: &str
    ) {
        let mut bytes = software.as_bytes().to_vec();
        bytes.push(0);
        tiff_utils::create_external_tag(
            ifd, external_data, ifd_index,
            tags::SOFTWARE, field_types::ASCII, bytes);
    }
}
