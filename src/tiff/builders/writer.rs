//! TIFF file layout and output
//!
//! Files are written little-endian in the order header, IFDs, external tag
//! payloads, image data. Every block starts on a word boundary.

use log::debug;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::tiff::builders::{ExternalData, ImageData};
use crate::tiff::constants::{header, tags};
use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::IFD;
use crate::utils::{ifd_utils, write_utils};

/// Tags whose value field points at the image data of their IFD
const DATA_OFFSET_TAGS: [u16; 2] = [tags::STRIP_OFFSETS, tags::TILE_OFFSETS];

/// Writes assembled IFDs and payloads
pub struct WriterBuilder;

/// Where every block of the file goes
struct FileLayout {
    ifd_offsets: Vec<u64>,
    /// Offsets of out-of-line payloads and image data, keyed like `ExternalData`
    payload_offsets: HashMap<(usize, u16), u64>,
}

impl FileLayout {
    fn plan(ifds: &[IFD], external_data: &ExternalData, image_data: &ImageData, is_big_tiff: bool) -> Self {
        let mut cursor = if is_big_tiff { 16 } else { 8 };
        let mut claim = |len: u64| {
            let start = cursor;
            cursor = write_utils::align_to_4_bytes(cursor + len);
            start
        };

        let ifd_offsets = ifds.iter()
            .map(|ifd| claim(ifd_utils::calculate_ifd_size(ifd.entry_count(), is_big_tiff)))
            .collect();

        let field_size = ifd_utils::value_field_size(is_big_tiff);
        let mut payload_offsets = HashMap::new();
        for (key, data) in external_data.iter().filter(|(_, data)| data.len() > field_size) {
            payload_offsets.insert(*key, claim(data.len() as u64));
        }

        for (&ifd_index, data) in image_data {
            let start = claim(data.len() as u64);
            if let Some(ifd) = ifds.get(ifd_index) {
                for tag in DATA_OFFSET_TAGS.into_iter().filter(|&tag| ifd.has_tag(tag)) {
                    payload_offsets.insert((ifd_index, tag), start);
                }
            }
        }

        FileLayout { ifd_offsets, payload_offsets }
    }

    fn image_offset(&self, ifd_index: usize) -> Option<u64> {
        DATA_OFFSET_TAGS.iter().find_map(|&tag| self.payload_offsets.get(&(ifd_index, tag)).copied())
    }
}

/// Little-endian sink with classic or BigTIFF word size
struct WordWriter<'a, W: Write + Seek> {
    inner: &'a mut W,
    is_big_tiff: bool,
}

impl<W: Write + Seek> WordWriter<'_, W> {
    fn word(&mut self, value: u64) -> TiffResult<()> {
        if self.is_big_tiff {
            self.inner.write_all(&value.to_le_bytes())?;
        } else {
            self.inner.write_all(&(value as u32).to_le_bytes())?;
        }
        Ok(())
    }

    fn block_at(&mut self, offset: u64, data: &[u8]) -> TiffResult<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.write_all(data)?;
        write_utils::write_padding(&mut *self.inner, data.len())
    }

    fn header(&mut self, first_ifd: u64) -> TiffResult<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.inner.write_all(&header::LITTLE_ENDIAN_MARKER)?;
        if self.is_big_tiff {
            self.inner.write_all(&header::BIG_TIFF_VERSION.to_le_bytes())?;
            self.inner.write_all(&header::BIGTIFF_OFFSET_SIZE.to_le_bytes())?;
            self.inner.write_all(&0u16.to_le_bytes())?;
        } else {
            self.inner.write_all(&header::TIFF_VERSION.to_le_bytes())?;
        }
        self.word(first_ifd)
    }

    /// Writes one IFD at its planned offset
    ///
    /// Payloads that fit the value field are packed inline, the rest get
    /// their planned offset.
    fn ifd(
        &mut self,
        ifd: &IFD,
        ifd_index: usize,
        layout: &FileLayout,
        external_data: &ExternalData
    ) -> TiffResult<()> {
        let field_size = ifd_utils::value_field_size(self.is_big_tiff);
        self.inner.seek(SeekFrom::Start(layout.ifd_offsets[ifd_index]))?;

        if self.is_big_tiff {
            self.inner.write_all(&(ifd.entry_count() as u64).to_le_bytes())?;
        } else {
            self.inner.write_all(&(ifd.entry_count() as u16).to_le_bytes())?;
        }

        for entry in ifd.entries() {
            self.inner.write_all(&entry.tag.to_le_bytes())?;
            self.inner.write_all(&entry.field_type.to_le_bytes())?;
            self.word(entry.count)?;

            let key = (ifd_index, entry.tag);
            if let Some(&offset) = layout.payload_offsets.get(&key) {
                self.word(offset)?;
            } else if let Some(data) = external_data.get(&key) {
                self.inner.write_all(&write_utils::pack_inline(data, field_size))?;
            } else {
                self.word(entry.value_offset)?;
            }
        }

        self.word(layout.ifd_offsets.get(ifd_index + 1).copied().unwrap_or(0))
    }
}

impl WriterBuilder {
    /// Writes a complete TIFF file to `output_path`
    pub fn write(
        is_big_tiff: bool,
        ifds: &[IFD],
        image_data: &ImageData,
        external_data: &ExternalData,
        output_path: &Path
    ) -> TiffResult<()> {
        debug!("Writing TIFF to {}", output_path.display());

        let mut writer = BufWriter::with_capacity(1024 * 1024, File::create(output_path)?);
        Self::write_to(&mut writer, is_big_tiff, ifds, image_data, external_data)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes a complete TIFF file to any seekable sink
    pub fn write_to(
        sink: &mut (impl Write + Seek),
        is_big_tiff: bool,
        ifds: &[IFD],
        image_data: &ImageData,
        external_data: &ExternalData
    ) -> TiffResult<()> {
        let layout = FileLayout::plan(ifds, external_data, image_data, is_big_tiff);
        let mut out = WordWriter { inner: sink, is_big_tiff };

        out.header(layout.ifd_offsets.first().copied().unwrap_or(0))?;
        for (ifd_index, ifd) in ifds.iter().enumerate() {
            out.ifd(ifd, ifd_index, &layout, external_data)?;
        }

        for (key, data) in external_data {
            if let Some(&offset) = layout.payload_offsets.get(key) {
                out.block_at(offset, data)?;
            }
        }
        for (&ifd_index, data) in image_data {
            if let Some(offset) = layout.image_offset(ifd_index) {
                out.block_at(offset, data)?;
            }
        }

        Ok(())
    }
}
