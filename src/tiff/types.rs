//! Parsed TIFF container

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::tags;
use crate::tiff::ifd::IFD;

/// Directories of a TIFF file with the header facts needed to read them
#[derive(Debug)]
pub struct TIFF {
    /// IFDs in chain order
    pub ifds: Vec<IFD>,
    pub is_big_tiff: bool,
    pub byte_order: ByteOrder,
}

impl TIFF {
    pub fn new(is_big_tiff: bool, byte_order: ByteOrder) -> Self {
        TIFF { ifds: Vec::new(), is_big_tiff, byte_order }
    }

    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }

    /// First full-resolution IFD, or the first IFD when every one is
    /// flagged as an overview
    pub fn main_ifd(&self) -> Option<&IFD> {
        self.ifds.iter()
            .find(|ifd| !is_overview(ifd))
            .or_else(|| self.ifds.first())
    }

    /// IFDs flagged as reduced-resolution copies
    pub fn overviews(&self) -> Vec<&IFD> {
        self.ifds.iter().filter(|ifd| is_overview(ifd)).collect()
    }
}

/// NewSubfileType bit 0
fn is_overview(ifd: &IFD) -> bool {
    ifd.get_tag_value(tags::NEW_SUBFILE_TYPE).is_some_and(|kind| kind & 1 == 1)
}
