//! JSON sidecar describing an exported image's georeferencing
//!
//! Field names follow the raster profile dictionaries GIS tooling already
//! produces, so sidecars written elsewhere load here and vice versa.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, ConvertResult};
use crate::georef::{Crs, GeoReference, GeoTransform};
use crate::raster::DataType;

fn default_driver() -> String {
    "GTiff".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMetadata {
    #[serde(default = "default_driver")]
    pub driver: String,
    pub dtype: DataType,
    #[serde(default)]
    pub nodata: Option<f64>,
    pub width: u32,
    pub height: u32,
    pub count: u16,
    #[serde(default)]
    pub crs: Option<Crs>,
    pub transform: GeoTransform,
}

impl GeoMetadata {
    pub fn new(
        data_type: DataType,
        width: u32,
        height: u32,
        count: u16,
        georef: &GeoReference,
    ) -> Self {
        GeoMetadata {
            driver: default_driver(),
            dtype: data_type,
            nodata: georef.nodata,
            width,
            height,
            count,
            crs: georef.crs,
            transform: georef.transform,
        }
    }

    /// Location of the sidecar for `image_name` inside `meta_dir`
    ///
    /// The image's extension is replaced by `.json`; any relative directory
    /// components of the name are kept.
    pub fn sidecar_path(meta_dir: &Path, image_name: &str) -> PathBuf {
        meta_dir.join(Path::new(image_name).with_extension("json"))
    }

    /// Reads a sidecar, reporting a missing file as `MissingSidecar`
    pub fn load(path: &Path) -> ConvertResult<Self> {
        if !path.is_file() {
            return Err(ConvertError::MissingSidecar(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        let metadata: GeoMetadata = serde_json::from_reader(reader)?;
        debug!("Loaded sidecar {}: {}x{}x{} {}", path.display(),
               metadata.width, metadata.height, metadata.count, metadata.dtype);
        Ok(metadata)
    }

    /// Writes the sidecar as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> ConvertResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn georeference(&self) -> GeoReference {
        GeoReference::new(self.transform, self.crs, self.nodata)
    }
}
