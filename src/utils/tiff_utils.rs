//! Helpers for attaching tag payloads while building an IFD

use crate::tiff::builders::ExternalData;
use crate::tiff::constants::field_types;
use crate::tiff::ifd::{IFD, IFDEntry};

/// Size in bytes of one value of a TIFF field type
pub fn get_field_type_size(field_type: u16) -> usize {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
        field_types::SHORT | field_types::SSHORT => 2,
        field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
        _ => 1,
    }
}

/// Adds a tag whose payload is kept outside the entry
///
/// The writer decides where the payload lands; small payloads are packed
/// back into the value field there.
pub fn create_external_tag(
    ifd: &mut IFD,
    external_data: &mut ExternalData,
    ifd_index: usize,
    tag: u16,
    field_type: u16,
    data: Vec<u8>
) {
    let count = (data.len() / get_field_type_size(field_type)) as u64;
    ifd.add_entry(IFDEntry::new(tag, field_type, count, 0));
    external_data.insert((ifd_index, tag), data);
}

/// Encodes doubles as a little-endian DOUBLE payload
pub fn doubles_to_le_bytes(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Encodes shorts as a little-endian SHORT payload
pub fn shorts_to_le_bytes(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
