//! Image File Directories
//!
//! An IFD is the list of tagged entries describing one image of a TIFF file.
//! Entries are kept ordered by tag, which is the order the writer must emit
//! them in; adding a tag twice keeps the later entry.

use std::collections::BTreeMap;
use std::fmt;
use log::trace;

use crate::tiff::constants::tags;
use crate::utils::{tag_utils, tiff_utils};

#[derive(Debug, Clone)]
pub struct IFD {
    /// Position in the file's IFD chain
    pub number: usize,
    /// File offset, 0 for IFDs that have not been written yet
    pub offset: u64,
    entries: BTreeMap<u16, IFDEntry>,
}

/// One tagged entry
///
/// When the payload fits inside the entry, `value_offset` holds the first
/// value decoded in the file's byte order and `inline_bytes` keeps the raw
/// value field so multi-value inline arrays can still be decoded.
#[derive(Debug, Clone)]
pub struct IFDEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u64,
    pub value_offset: u64,
    /// Raw value field as read from the file, empty for built entries
    pub inline_bytes: Vec<u8>,
}

impl IFDEntry {
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64) -> Self {
        Self {
            tag,
            field_type,
            count,
            value_offset,
            inline_bytes: Vec::new(),
        }
    }

    /// Entry read from disk, keeping its raw value field
    pub fn with_inline_bytes(tag: u16, field_type: u16, count: u64, value_offset: u64, raw: Vec<u8>) -> Self {
        Self { inline_bytes: raw, ..Self::new(tag, field_type, count, value_offset) }
    }

    /// Total payload size in bytes
    pub fn data_size(&self) -> u64 {
        tiff_utils::get_field_type_size(self.field_type) as u64 * self.count
    }

    /// Whether the payload fits into the entry's value field
    pub fn is_value_inline(&self, is_big_tiff: bool) -> bool {
        self.data_size() <= if is_big_tiff { 8 } else { 4 }
    }

    /// One-line description for log output
    pub fn description(&self) -> String {
        let decoded = match self.tag {
            tags::COMPRESSION => Some(tag_utils::get_compression_name(self.value_offset)),
            tags::PHOTOMETRIC_INTERPRETATION => Some(tag_utils::get_photometric_name(self.value_offset)),
            _ => None,
        };
        let value = match decoded {
            Some(name) => format!("{} ({})", self.value_offset, name),
            None => self.value_offset.to_string(),
        };
        format!("{} [{}] {} x{} = {}",
                tag_utils::get_tag_name(self.tag), self.tag,
                tag_utils::get_field_type_name(self.field_type), self.count, value)
    }
}

impl IFD {
    pub fn new(number: usize, offset: u64) -> Self {
        Self {
            number,
            offset,
            entries: BTreeMap::new(),
        }
    }

    /// Adds an entry, replacing any earlier entry with the same tag
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("IFD #{}: {}", self.number, entry.description());
        self.entries.insert(entry.tag, entry);
    }

    pub fn remove_entry(&mut self, tag: u16) {
        self.entries.remove(&tag);
    }

    /// Entries in ascending tag order
    pub fn entries(&self) -> impl Iterator<Item = &IFDEntry> {
        self.entries.values()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.entries.get(&tag)
    }

    pub fn has_tag(&self, tag: u16) -> bool {
        self.entries.contains_key(&tag)
    }

    /// Value field of a tag, meaningful for single inline values
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.get_entry(tag).map(|entry| entry.value_offset)
    }

    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        Some((self.get_tag_value(tags::IMAGE_WIDTH)?, self.get_tag_value(tags::IMAGE_LENGTH)?))
    }

    pub fn get_samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    pub fn is_tiled(&self) -> bool {
        self.has_tag(tags::TILE_WIDTH) && self.has_tag(tags::TILE_OFFSETS)
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IFD #{} at offset {}", self.number, self.offset)?;
        if let Some((width, height)) = self.get_dimensions() {
            write!(f, ", {}x{} with {} samples", width, height, self.get_samples_per_pixel())?;
        }
        writeln!(f)?;
        for entry in self.entries() {
            writeln!(f, "  {}", entry.description())?;
        }
        Ok(())
    }
}
