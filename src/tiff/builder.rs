//! TIFF file construction
//!
//! `TiffBuilder` collects IFDs with their tag payloads and strips, then
//! hands everything to the writer in one go.

use log::debug;
use std::io::{Seek, Write};
use std::path::Path;

use crate::georef::GeoReference;
use crate::raster::DataType;
use crate::tiff::builders::basic_tags::BasicTagsBuilder;
use crate::tiff::builders::geo_tags::GeoTagsBuilder;
use crate::tiff::builders::metadata_tags::MetadataBuilder;
use crate::tiff::builders::writer::WriterBuilder;
use crate::tiff::builders::{ExternalData, ImageData};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;

/// Builder for TIFF files
pub struct TiffBuilder {
    is_big_tiff: bool,
    pub ifds: Vec<IFD>,
    image_data: ImageData,
    external_data: ExternalData,
}

impl TiffBuilder {
    pub fn new(is_big_tiff: bool) -> Self {
        debug!("Creating new TiffBuilder (is_big_tiff: {})", is_big_tiff);
        TiffBuilder {
            is_big_tiff,
            ifds: Vec::new(),
            image_data: ImageData::new(),
            external_data: ExternalData::new(),
        }
    }

    /// Adds an empty IFD and returns its index
    pub fn add_ifd(&mut self, ifd: IFD) -> usize {
        let ifd_index = self.ifds.len();
        debug!("Adding IFD #{}", ifd_index);
        self.ifds.push(ifd);
        ifd_index
    }

    fn check_index(&self, ifd_index: usize) -> TiffResult<()> {
        if ifd_index >= self.ifds.len() {
            return Err(TiffError::Other(format!(
                "Invalid IFD index {}, only have {} IFDs", ifd_index, self.ifds.len())));
        }
        Ok(())
    }

    /// Adds dimension, sample and compression tags for a chunky raster
    pub fn add_image_structure_tags(
        &mut self,
        ifd_index: usize,
        width: u32,
        height: u32,
        samples: u16,
        data_type: DataType,
        compression: u16
    ) -> TiffResult<()> {
        self.check_index(ifd_index)?;
        BasicTagsBuilder::add_image_structure_tags(
            &mut self.ifds[ifd_index], &mut self.external_data, ifd_index,
            width, height, samples, data_type, compression);
        Ok(())
    }

    /// Stores already compressed pixel data as a single strip
    pub fn setup_single_strip(&mut self, ifd_index: usize, strip_data: Vec<u8>, rows: u32) -> TiffResult<()> {
        self.check_index(ifd_index)?;
        BasicTagsBuilder::setup_single_strip(
            &mut self.ifds[ifd_index], &mut self.image_data, ifd_index,
            strip_data, rows, self.is_big_tiff);
        Ok(())
    }

    /// Turns the IFD into a palette image
    pub fn add_color_map(&mut self, ifd_index: usize, color_map: &[u16]) -> TiffResult<()> {
        self.check_index(ifd_index)?;
        BasicTagsBuilder::add_color_map(
            &mut self.ifds[ifd_index], &mut self.external_data, ifd_index, color_map);
        Ok(())
    }

    /// Writes transform, GeoKeys and nodata of `georef`
    pub fn set_georeference(&mut self, ifd_index: usize, georef: &GeoReference) -> TiffResult<()> {
        self.check_index(ifd_index)?;
        let ifd = &mut self.ifds[ifd_index];
        GeoTagsBuilder::add_transform(ifd, &mut self.external_data, ifd_index, &georef.transform);
        GeoTagsBuilder::add_geo_key_directory(ifd, &mut self.external_data, ifd_index, georef.crs.as_ref())?;
        if let Some(nodata) = georef.nodata {
            MetadataBuilder::add_nodata_tag(ifd, &mut self.external_data, ifd_index, nodata);
        }
        Ok(())
    }

    pub fn add_software_tag(&mut self, ifd_index: usize, software: &str) -> TiffResult<()> {
        self.check_index(ifd_index)?;
        MetadataBuilder::add_software_tag(
            &mut self.ifds[ifd_index], &mut self.external_data, ifd_index, software);
        Ok(())
    }

    /// Writes the TIFF file to disk
    pub fn write(&self, output_path: &Path) -> TiffResult<()> {
        WriterBuilder::write(
            self.is_big_tiff, &self.ifds, &self.image_data, &self.external_data, output_path)
    }

    /// Writes the TIFF file to an in-memory or other seekable sink
    pub fn write_to(&self, sink: &mut (impl Write + Seek)) -> TiffResult<()> {
        WriterBuilder::write_to(
            sink, self.is_big_tiff, &self.ifds, &self.image_data, &self.external_data)
    }
}
