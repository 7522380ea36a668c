//! IFD layout helpers shared by the reader and the writer

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::TiffResult;

/// Reads an IFD offset word (4 bytes classic, 8 bytes BigTIFF)
///
/// Used both for the header's first-IFD pointer and the next-IFD pointer
/// that terminates every directory.
pub fn read_ifd_offset(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler
) -> TiffResult<u64> {
    if is_big_tiff {
        Ok(byte_order_handler.read_u64(reader)?)
    } else {
        Ok(byte_order_handler.read_u32(reader)? as u64)
    }
}

/// Size in bytes of an IFD with `entry_count` entries, including the entry
/// count word and the trailing next-IFD offset
pub fn calculate_ifd_size(entry_count: usize, is_big_tiff: bool) -> u64 {
    let entries = entry_count as u64;
    if is_big_tiff {
        8 + 20 * entries + 8
    } else {
        2 + 12 * entries + 4
    }
}

/// Size of the value/offset field of one entry
pub fn value_field_size(is_big_tiff: bool) -> usize {
    if is_big_tiff { 8 } else { 4 }
}
