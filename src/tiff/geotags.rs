//! GeoKey directory entries and names

use std::fmt;

use crate::tiff::constants::geo_keys;

/// One entry of a GeoKey directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    /// 0 when the value is stored in `value_offset`, else the tag holding it
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

impl GeoKeyEntry {
    pub fn new(key_id: u16, tiff_tag_location: u16, count: u16, value_offset: u16) -> Self {
        GeoKeyEntry {
            key_id,
            tiff_tag_location,
            count,
            value_offset,
        }
    }

    /// Value of a key stored directly in the directory
    pub fn inline_value(&self) -> Option<u16> {
        (self.tiff_tag_location == 0).then_some(self.value_offset)
    }

    pub fn get_name(&self) -> &'static str {
        get_key_name(self.key_id)
    }
}

impl fmt::Display for GeoKeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inline_value() {
            Some(value) => write!(f, "{} ({}) = {}", self.get_name(), self.key_id, value),
            None => write!(f, "{} ({}) -> tag {}[{}..+{}]",
                           self.get_name(), self.key_id, self.tiff_tag_location,
                           self.value_offset, self.count),
        }
    }
}

/// Name of a GeoKey id
pub fn get_key_name(key: u16) -> &'static str {
    match key {
        geo_keys::GT_MODEL_TYPE => "GTModelTypeGeoKey",
        geo_keys::GT_RASTER_TYPE => "GTRasterTypeGeoKey",
        geo_keys::GT_CITATION => "GTCitationGeoKey",
        geo_keys::GEOGRAPHIC_TYPE => "GeographicTypeGeoKey",
        geo_keys::GEOG_CITATION => "GeogCitationGeoKey",
        geo_keys::GEOG_ANGULAR_UNITS => "GeogAngularUnitsGeoKey",
        geo_keys::PROJECTED_CS_TYPE => "ProjectedCSTypeGeoKey",
        geo_keys::PROJ_CITATION => "PCSCitationGeoKey",
        geo_keys::PROJECTION => "ProjectionGeoKey",
        geo_keys::PROJ_LINEAR_UNITS => "ProjLinearUnitsGeoKey",
        geo_keys::VERTICAL_CS_TYPE => "VerticalCSTypeGeoKey",
        _ => "UnknownGeoKey",
    }
}
