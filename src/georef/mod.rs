//! Georeferencing: affine transforms, CRS identifiers and the JSON sidecar
//! that carries them between rasters and plain images.

pub mod crs;
pub mod transform;
pub mod metadata;

#[cfg(test)]
mod tests;

pub use crs::Crs;
pub use transform::GeoTransform;
pub use metadata::GeoMetadata;

/// Spatial reference of one raster
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoReference {
    pub transform: GeoTransform,
    pub crs: Option<Crs>,
    pub nodata: Option<f64>,
}

impl GeoReference {
    pub fn new(transform: GeoTransform, crs: Option<Crs>, nodata: Option<f64>) -> Self {
        GeoReference { transform, crs, nodata }
    }
}
