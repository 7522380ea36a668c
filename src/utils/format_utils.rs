//! Header sniffing
//!
//! The first bytes of a TIFF give the byte order and tell classic TIFF from
//! BigTIFF; everything after is read relative to that.

use log::debug;
use crate::io::seekable::SeekableReader;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::constants::header;
use crate::tiff::validation;

/// Parsed fixed part of a TIFF header
pub struct Header {
    pub handler: Box<dyn ByteOrderHandler>,
    pub is_big_tiff: bool,
}

/// Reads the byte order marker and version word
///
/// A BigTIFF header also has its offset-size and reserved words checked.
/// On success the reader sits on the first IFD offset.
pub fn read_header(reader: &mut dyn SeekableReader) -> TiffResult<Header> {
    let byte_order = ByteOrder::detect(reader)?;
    let handler = byte_order.create_handler();

    let is_big_tiff = match handler.read_u16(reader)? {
        header::TIFF_VERSION => false,
        header::BIG_TIFF_VERSION => {
            validation::validate_bigtiff_header(reader, handler.as_ref())?;
            true
        },
        version => return Err(TiffError::UnsupportedVersion(version)),
    };

    debug!("{} {}", byte_order.name(), if is_big_tiff { "BigTIFF" } else { "classic TIFF" });
    Ok(Header { handler, is_big_tiff })
}
