//! TIFF writing utilities

use crate::tiff::errors::TiffResult;
use std::io::Write;

/// Rounds an offset up to the next word boundary
pub fn align_to_4_bytes(offset: u64) -> u64 {
    (offset + 3) & !3
}

/// Pads after a block of `data_len` bytes so the next write is word aligned
pub fn write_padding(writer: &mut impl Write, data_len: usize) -> TiffResult<()> {
    let padding = calculate_padding(data_len);
    if padding > 0 {
        writer.write_all(&[0u8; 3][..padding])?;
    }
    Ok(())
}

pub fn calculate_padding(data_len: usize) -> usize {
    (4 - (data_len % 4)) % 4
}

/// Packs a payload into a value field of `field_size` bytes
pub fn pack_inline(data: &[u8], field_size: usize) -> Vec<u8> {
    let mut field = data.to_vec();
    field.resize(field_size, 0);
    field
}
