//! GeoTIFF georeferencing parser
//!
//! Turns the model tags, the GeoKey directory and GDAL's nodata tag of an
//! IFD into a `GeoReference`.

use log::{debug, warn};

use crate::georef::{Crs, GeoReference, GeoTransform};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{geo_keys, raster_type, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::geotags::GeoKeyEntry;
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// Parser for GeoTIFF georeferencing tags
pub struct GeoKeyParser;

impl GeoKeyParser {
    /// Parses the GeoKey directory of an IFD
    ///
    /// The directory is a header of four shorts (version, revision, minor
    /// revision, key count) followed by four shorts per key. An IFD without
    /// the tag yields no keys.
    pub fn parse_geo_key_directory(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD
    ) -> TiffResult<Vec<GeoKeyEntry>> {
        if !ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
            return Ok(Vec::new());
        }

        let values = tiff_reader.read_tag_values(reader, ifd, tags::GEO_KEY_DIRECTORY_TAG)?;
        if values.len() < 4 {
            return Err(TiffError::CorruptData("GeoKey directory header truncated".to_string()));
        }

        let num_keys = values[3] as usize;
        debug!("GeoKey directory: version={}, revision={}.{}, keys={}",
               values[0], values[1], values[2], num_keys);

        let keys: Vec<GeoKeyEntry> = values[4..]
            .chunks_exact(4)
            .take(num_keys)
            .map(|k| GeoKeyEntry::new(k[0] as u16, k[1] as u16, k[2] as u16, k[3] as u16))
            .collect();

        if keys.len() < num_keys {
            warn!("GeoKey directory declares {} keys but holds {}", num_keys, keys.len());
        }
        for key in &keys {
            debug!("GeoKey {}", key);
        }

        Ok(keys)
    }

    /// Reads the pixel-to-model transform
    ///
    /// ModelTransformation wins over tiepoint plus scale when both exist.
    pub fn read_transform(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD
    ) -> TiffResult<Option<GeoTransform>> {
        if ifd.has_tag(tags::MODEL_TRANSFORMATION_TAG) {
            let matrix = tiff_reader.read_tag_doubles(reader, ifd, tags::MODEL_TRANSFORMATION_TAG)?;
            return match GeoTransform::from_model_transformation(&matrix) {
                Some(transform) => Ok(Some(transform)),
                None => Err(TiffError::CorruptData(format!(
                    "ModelTransformation has {} values, expected 16", matrix.len()))),
            };
        }

        if ifd.has_tag(tags::MODEL_TIEPOINT_TAG) && ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG) {
            let tiepoint = tiff_reader.read_tag_doubles(reader, ifd, tags::MODEL_TIEPOINT_TAG)?;
            let scale = tiff_reader.read_tag_doubles(reader, ifd, tags::MODEL_PIXEL_SCALE_TAG)?;
            if tiepoint.len() > 6 {
                debug!("Using the first of {} tiepoints", tiepoint.len() / 6);
            }
            return match GeoTransform::from_tiepoint_and_scale(&tiepoint, &scale) {
                Some(transform) => Ok(Some(transform)),
                None => Err(TiffError::CorruptData(format!(
                    "tiepoint ({} values) or pixel scale ({} values) too short",
                    tiepoint.len(), scale.len()))),
            };
        }

        Ok(None)
    }

    /// Picks the CRS named by the GeoKeys
    ///
    /// ProjectedCSType is preferred, GeographicType is the fallback; a
    /// user-defined code in either is ignored.
    pub fn read_crs(keys: &[GeoKeyEntry]) -> Option<Crs> {
        let code_of = |key_id: u16| {
            keys.iter()
                .find(|k| k.key_id == key_id)
                .and_then(GeoKeyEntry::inline_value)
                .filter(|&v| v != 0 && v != geo_keys::USER_DEFINED)
        };

        match code_of(geo_keys::PROJECTED_CS_TYPE).or_else(|| code_of(geo_keys::GEOGRAPHIC_TYPE)) {
            Some(code) => Some(Crs::from_epsg(code as u32)),
            None => {
                if keys.iter().any(|k| k.key_id == geo_keys::PROJECTED_CS_TYPE || k.key_id == geo_keys::GEOGRAPHIC_TYPE) {
                    warn!("CRS is user-defined, it cannot be expressed as an EPSG code");
                }
                None
            }
        }
    }

    /// Whether the raster type key says PixelIsPoint
    pub fn is_pixel_is_point(keys: &[GeoKeyEntry]) -> bool {
        keys.iter()
            .find(|k| k.key_id == geo_keys::GT_RASTER_TYPE)
            .and_then(GeoKeyEntry::inline_value)
            == Some(raster_type::PIXEL_IS_POINT)
    }

    /// Reads GDAL's nodata tag
    ///
    /// An unparseable value is logged and treated as absent.
    pub fn read_nodata(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD
    ) -> TiffResult<Option<f64>> {
        if !ifd.has_tag(tags::GDAL_NODATA) {
            return Ok(None);
        }

        let text = tiff_reader.read_tag_ascii(reader, ifd, tags::GDAL_NODATA)?;
        match text.trim().parse::<f64>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                warn!("Ignoring unparseable GDAL_NODATA value {:?}", text);
                Ok(None)
            }
        }
    }

    /// Collects the full georeference of an IFD
    ///
    /// Rasters without model tags get the identity transform. PixelIsPoint
    /// rasters are shifted by half a pixel so the transform addresses pixel
    /// corners.
    pub fn read_georeference(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD
    ) -> TiffResult<GeoReference> {
        let keys = Self::parse_geo_key_directory(tiff_reader, reader, ifd)?;

        let transform = match Self::read_transform(tiff_reader, reader, ifd)? {
            Some(transform) if Self::is_pixel_is_point(&keys) => {
                debug!("PixelIsPoint raster, shifting origin by half a pixel");
                transform.translate_pixels(-0.5, -0.5)
            },
            Some(transform) => transform,
            None => {
                warn!("No georeferencing tags found, using identity transform");
                GeoTransform::identity()
            }
        };

        let crs = Self::read_crs(&keys);
        let nodata = Self::read_nodata(tiff_reader, reader, ifd)?;
        debug!("Georeference: transform {}, crs {:?}, nodata {:?}", transform, crs, nodata);

        Ok(GeoReference::new(transform, crs, nodata))
    }
}
