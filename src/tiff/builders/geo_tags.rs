//! GeoTIFF tags
//!
//! Writes the model tags that place the raster on the map and the GeoKey
//! directory that names its coordinate reference system.

use log::debug;

use crate::georef::{Crs, GeoTransform};
use crate::tiff::builders::ExternalData;
use crate::tiff::constants::{tags, field_types, geo_keys, model_type, raster_type};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::utils::tiff_utils;

/// Adds GeoTIFF georeferencing tags
pub struct GeoTagsBuilder;

impl GeoTagsBuilder {
    /// Adds the pixel-to-model transform
    ///
    /// Axis-aligned transforms are written as a tiepoint plus pixel scale,
    /// which every GeoTIFF reader understands; rotated or sheared ones need
    /// the full ModelTransformation matrix.
    pub fn add_transform(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        transform: &GeoTransform
    ) {
        debug!("Adding model transform {}", transform);

        if transform.is_rectilinear() {
            tiff_utils::create_external_tag(
                ifd, external_data, ifd_index,
                tags::MODEL_PIXEL_SCALE_TAG, field_types::DOUBLE,
                tiff_utils::doubles_to_le_bytes(&transform.pixel_scale()));
            tiff_utils::create_external_tag(
                ifd, external_data, ifd_index,
                tags::MODEL_TIEPOINT_TAG, field_types::DOUBLE,
                tiff_utils::doubles_to_le_bytes(&transform.tiepoint()));
        } else {
            tiff_utils::create_external_tag(
                ifd, external_data, ifd_index,
                tags::MODEL_TRANSFORMATION_TAG, field_types::DOUBLE,
                tiff_utils::doubles_to_le_bytes(&transform.model_transformation()));
        }
    }

    /// Adds the GeoKey directory
    ///
    /// Raster type is always PixelIsArea. Without a CRS only the raster type
    /// key is written.
    ///
    /// # Returns
    /// An error if the EPSG code does not fit the 16-bit key value
    pub fn add_geo_key_directory(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        crs: Option<&Crs>
    ) -> TiffResult<()> {
        // (key id, value), all stored inline in the directory
        let mut keys: Vec<(u16, u16)> = vec![(geo_keys::GT_RASTER_TYPE, raster_type::PIXEL_IS_AREA)];

        if let Some(crs) = crs {
            let code = u16::try_from(crs.epsg_code())
                .map_err(|_| TiffError::Other(format!("{} cannot be stored as a GeoKey", crs)))?;
            if crs.is_geographic() {
                keys.push((geo_keys::GT_MODEL_TYPE, model_type::GEOGRAPHIC));
                keys.push((geo_keys::GEOGRAPHIC_TYPE, code));
            } else {
                keys.push((geo_keys::GT_MODEL_TYPE, model_type::PROJECTED));
                keys.push((geo_keys::PROJECTED_CS_TYPE, code));
            }
        }
        keys.sort_by_key(|(id, _)| *id);

        let mut directory = vec![
            geo_keys::DIRECTORY_VERSION,
            geo_keys::KEY_REVISION,
            geo_keys::MINOR_REVISION,
            keys.len() as u16,
        ];
        for (id, value) in &keys {
            directory.extend_from_slice(&[*id, 0, 1, *value]);
        }
        debug!("GeoKey directory: {:?}", keys);

        tiff_utils::create_external_tag(
            ifd, external_data, ifd_index,
            tags::GEO_KEY_DIRECTORY_TAG, field_types::SHORT,
            tiff_utils::shorts_to_le_bytes(&directory));
        Ok(())
    }
}
