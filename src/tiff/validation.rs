//! Sanity checks applied while parsing untrusted TIFF files

use log::{debug, error, warn};
use std::io::SeekFrom;

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::constants::header;

/// Largest image (in samples) the decoder will allocate for
const MAX_SAMPLES: u64 = 1 << 34;

/// Checks that an IFD offset points inside the file and past the header
pub fn validate_ifd_offset(offset: u64, file_size: u64) -> TiffResult<()> {
    if offset >= file_size || offset < 8 {
        return Err(TiffError::CorruptData(format!(
            "invalid IFD offset {} (file size {})", offset, file_size
        )));
    }
    Ok(())
}

/// Returns the size of the underlying stream, restoring the position
///
/// Falls back to `u64::MAX` when the stream cannot report its length.
pub fn get_file_size(reader: &mut dyn SeekableReader) -> TiffResult<u64> {
    let current_position = reader.stream_position()?;
    let file_size = match reader.seek(SeekFrom::End(0)) {
        Ok(size) => size,
        Err(e) => {
            warn!("Could not determine file size: {}", e);
            u64::MAX
        }
    };
    reader.seek(SeekFrom::Start(current_position))?;
    Ok(file_size)
}

/// Validates the two BigTIFF header words that follow the version
pub fn validate_bigtiff_header(
    reader: &mut dyn SeekableReader,
    byte_order_handler: &dyn ByteOrderHandler
) -> TiffResult<()> {
    let offset_size = byte_order_handler.read_u16(reader)?;
    let zeros = byte_order_handler.read_u16(reader)?;
    debug!("BigTIFF offset size: {}, reserved: {}", offset_size, zeros);

    if offset_size != header::BIGTIFF_OFFSET_SIZE || zeros != 0 {
        error!("Invalid BigTIFF header: offset_size={}, zeros={}", offset_size, zeros);
        return Err(TiffError::InvalidBigTiffHeader { offset_size, reserved: zeros });
    }
    Ok(())
}

/// Rejects dimensions that are zero or too large to decode in memory
pub fn validate_dimensions(width: u64, height: u64, samples: u64) -> TiffResult<()> {
    if width == 0 || height == 0 {
        return Err(TiffError::MissingDimensions);
    }
    let total = width.saturating_mul(height).saturating_mul(samples.max(1));
    if total > MAX_SAMPLES {
        return Err(TiffError::UnsupportedSampleLayout(format!(
            "{}x{}x{} samples exceed the in-memory limit", width, height, samples
        )));
    }
    Ok(())
}
