//! TIFF file reader implementation
//!
//! Parses the header and the IFD chain of classic TIFF and BigTIFF files in
//! either byte order, and decodes tag payloads on demand. Pixel data is read
//! by `raster::RasterReader` on top of this.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, SeekFrom};
use std::path::{Path, PathBuf};

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;
use crate::tiff::validation;
use crate::utils::{format_utils, ifd_utils, tag_utils};

/// Upper bound on the IFD chain length
const MAX_IFDS: usize = 1024;

/// Reads the structure of classic and BigTIFF files
///
/// The byte order and format of the last file read are remembered, so tag
/// payloads can be decoded afterwards without re-reading the header.
pub struct TiffReader {
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    current_file: Option<PathBuf>,
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            current_file: None,
            is_big_tiff: false,
        }
    }

    /// Opens a fresh buffered reader on the current file
    pub fn create_reader(&self) -> TiffResult<BufReader<File>> {
        match &self.current_file {
            Some(path) => Ok(BufReader::with_capacity(1024 * 1024, File::open(path)?)),
            None => Err(TiffError::Other("No file path specified".to_string())),
        }
    }

    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler.as_deref()
            .ok_or_else(|| TiffError::Other("Byte order not yet determined".to_string()))
    }

    /// Loads the structure of the TIFF file at `path`
    pub fn load(&mut self, path: &Path) -> TiffResult<TIFF> {
        info!("Loading TIFF file: {}", path.display());
        self.current_file = Some(path.to_path_buf());

        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file);
        self.read(&mut reader)
    }

    /// Reads header and IFD chain from any seekable source
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;
        let header = format_utils::read_header(reader)?;
        self.is_big_tiff = header.is_big_tiff;
        let byte_order = header.handler.byte_order();
        self.byte_order_handler = Some(header.handler);

        let first_ifd_offset = ifd_utils::read_ifd_offset(reader, self.is_big_tiff, self.handler()?)?;
        debug!("First IFD offset: {}", first_ifd_offset);

        let file_size = validation::get_file_size(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut tiff = TIFF::new(self.is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        if tiff.ifds.is_empty() {
            return Err(TiffError::CorruptData("no readable IFD".to_string()));
        }

        debug!("Read {} IFDs ({} overviews)", tiff.ifd_count(), tiff.overviews().len());
        Ok(tiff)
    }

    /// Follows the next-IFD pointers, stopping at the first broken link
    ///
    /// The first IFD must parse; later failures only truncate the chain.
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_ifd_offset: u64, file_size: u64) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut visited = HashSet::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            if !visited.insert(ifd_offset) {
                warn!("IFD chain loops back to offset {}, stopping", ifd_offset);
                break;
            }
            if ifd_offset >= file_size {
                warn!("IFD offset {} exceeds file size {}, stopping IFD chain", ifd_offset, file_size);
                break;
            }

            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok(ifd) => ifd,
                Err(e) if ifds.is_empty() => return Err(e),
                Err(e) => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
            };

            // read_ifd leaves the reader right after the last entry
            let next_ifd_offset = match ifd_utils::read_ifd_offset(reader, self.is_big_tiff, self.handler()?) {
                Ok(offset) => offset,
                Err(e) => {
                    warn!("Error reading next IFD offset: {}", e);
                    ifds.push(ifd);
                    break;
                }
            };

            ifds.push(ifd);
            ifd_offset = next_ifd_offset;
        }

        Ok(ifds)
    }

    /// Reads the IFD stored at `offset`
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;

        let handler = self.handler()?;
        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };
        debug!("IFD #{} at {} has {} entries", number, offset, entry_count);

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            ifd.add_entry(self.read_ifd_entry(reader)?);
        }

        Ok(ifd)
    }

    /// Reads one entry, keeping the raw value field for inline payloads
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> TiffResult<IFDEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let mut raw = vec![0u8; ifd_utils::value_field_size(self.is_big_tiff)];
        reader.read_exact(&mut raw)?;
        let value_offset = tag_utils::decode_value_field(&raw, field_type, count, self.is_big_tiff, handler)?;

        Ok(IFDEntry::with_inline_bytes(tag, field_type, count, value_offset, raw))
    }

    /// Loads the payload of `tag`, which must be present
    fn payload<'a>(&self, reader: &mut dyn SeekableReader, ifd: &'a IFD, tag: u16) -> TiffResult<(&'a IFDEntry, Vec<u8>)> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        Ok((entry, tag_utils::read_entry_payload(reader, entry, self.is_big_tiff)?))
    }

    /// Reads an integer-typed tag as u64 values
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let (entry, payload) = self.payload(reader, ifd, tag)?;
        tag_utils::read_tag_value_array(&payload, entry, self.handler()?)
    }

    /// Reads a numeric tag as f64 values
    pub fn read_tag_doubles(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<f64>> {
        let (entry, payload) = self.payload(reader, ifd, tag)?;
        tag_utils::read_tag_double_array(&payload, entry, self.handler()?)
    }

    pub fn read_tag_ascii(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<String> {
        let (entry, payload) = self.payload(reader, ifd, tag)?;
        tag_utils::read_tag_ascii(payload, entry)
    }

    /// Byte order of the current file
    pub fn byte_order(&self) -> TiffResult<ByteOrder> {
        Ok(self.handler()?.byte_order())
    }
}
