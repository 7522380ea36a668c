//! TIFF tag utilities
//!
//! Decoding of tag payloads (inline or external) into numbers, doubles and
//! strings, plus display names used in log output.

use std::io::{Cursor, SeekFrom};
use byteorder::ReadBytesExt;

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFDEntry;
use crate::tiff::constants::{field_types, tags, compression, photometric};
use crate::utils::string_utils;

/// Largest tag payload we are willing to load into memory
const MAX_TAG_PAYLOAD: u64 = 512 * 1024 * 1024;

/// Decodes the value/offset field of an entry read from disk
///
/// When the payload fits inline the first value is decoded using the field
/// type, otherwise the field is an offset word.
pub fn decode_value_field(
    raw: &[u8],
    field_type: u16,
    count: u64,
    is_big_tiff: bool,
    handler: &dyn ByteOrderHandler
) -> TiffResult<u64> {
    let sized_entry = IFDEntry::new(0, field_type, count, 0);
    let mut cursor = Cursor::new(raw.to_vec());

    if !sized_entry.is_value_inline(is_big_tiff) {
        return Ok(if is_big_tiff {
            handler.read_u64(&mut cursor)?
        } else {
            handler.read_u32(&mut cursor)? as u64
        });
    }

    let value = match field_type {
        field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED | field_types::ASCII => raw[0] as u64,
        field_types::SHORT | field_types::SSHORT => handler.read_u16(&mut cursor)? as u64,
        field_types::LONG | field_types::SLONG | field_types::FLOAT => handler.read_u32(&mut cursor)? as u64,
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 |
        field_types::DOUBLE | field_types::RATIONAL | field_types::SRATIONAL => handler.read_u64(&mut cursor)?,
        _ => 0,
    };
    Ok(value)
}

/// Loads the raw payload bytes of an entry, from the value field when inline
/// or from the file otherwise
pub fn read_entry_payload(
    reader: &mut dyn SeekableReader,
    entry: &IFDEntry,
    is_big_tiff: bool
) -> TiffResult<Vec<u8>> {
    let size = entry.data_size();
    if size > MAX_TAG_PAYLOAD {
        return Err(TiffError::CorruptData(format!(
            "tag {} declares a {} byte payload", entry.tag, size)));
    }

    if entry.is_value_inline(is_big_tiff) {
        if entry.inline_bytes.len() < size as usize {
            return Err(TiffError::CorruptData(format!(
                "tag {} has no inline payload", entry.tag)));
        }
        return Ok(entry.inline_bytes[..size as usize].to_vec());
    }

    reader.seek(SeekFrom::Start(entry.value_offset))?;
    let mut payload = vec![0u8; size as usize];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

/// Decodes an integer-typed payload into u64 values
pub fn read_tag_value_array(
    payload: &[u8],
    entry: &IFDEntry,
    handler: &dyn ByteOrderHandler
) -> TiffResult<Vec<u64>> {
    let mut reader = Cursor::new(payload.to_vec());
    let mut values = Vec::with_capacity(entry.count as usize);

    for _ in 0..entry.count {
        let value = match entry.field_type {
            field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED => reader.read_u8()? as u64,
            field_types::SHORT | field_types::SSHORT => handler.read_u16(&mut reader)? as u64,
            field_types::LONG | field_types::SLONG => handler.read_u32(&mut reader)? as u64,
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => handler.read_u64(&mut reader)?,
            _ => return Err(TiffError::UnsupportedFieldType(entry.field_type)),
        };
        values.push(value);
    }

    Ok(values)
}

/// Decodes a numeric payload into f64 values
///
/// DOUBLE is the common case for GeoTIFF model tags, but FLOAT, RATIONAL and
/// integer payloads are accepted too.
pub fn read_tag_double_array(
    payload: &[u8],
    entry: &IFDEntry,
    handler: &dyn ByteOrderHandler
) -> TiffResult<Vec<f64>> {
    match entry.field_type {
        field_types::DOUBLE | field_types::FLOAT | field_types::RATIONAL | field_types::SRATIONAL => {},
        _ => {
            return read_tag_value_array(payload, entry, handler)
                .map(|values| values.into_iter().map(|v| v as f64).collect());
        }
    }

    let mut reader = Cursor::new(payload.to_vec());
    let mut values = Vec::with_capacity(entry.count as usize);
    for _ in 0..entry.count {
        let value = match entry.field_type {
            field_types::DOUBLE => handler.read_f64(&mut reader)?,
            field_types::FLOAT => handler.read_f32(&mut reader)? as f64,
            field_types::RATIONAL => {
                let (num, den) = handler.read_rational(&mut reader)?;
                if den == 0 { 0.0 } else { num as f64 / den as f64 }
            },
            _ => {
                let (num, den) = handler.read_srational(&mut reader)?;
                if den == 0 { 0.0 } else { num as f64 / den as f64 }
            },
        };
        values.push(value);
    }
    Ok(values)
}

/// Decodes an ASCII payload
pub fn read_tag_ascii(payload: Vec<u8>, entry: &IFDEntry) -> TiffResult<String> {
    if entry.field_type != field_types::ASCII {
        return Err(TiffError::UnsupportedFieldType(entry.field_type));
    }
    Ok(string_utils::ascii_payload_to_string(payload))
}

const TAG_NAMES: &[(u16, &str)] = &[
    (tags::NEW_SUBFILE_TYPE, "NewSubfileType"),
    (tags::IMAGE_WIDTH, "ImageWidth"),
    (tags::IMAGE_LENGTH, "ImageLength"),
    (tags::BITS_PER_SAMPLE, "BitsPerSample"),
    (tags::COMPRESSION, "Compression"),
    (tags::PHOTOMETRIC_INTERPRETATION, "PhotometricInterpretation"),
    (tags::STRIP_OFFSETS, "StripOffsets"),
    (tags::SAMPLES_PER_PIXEL, "SamplesPerPixel"),
    (tags::ROWS_PER_STRIP, "RowsPerStrip"),
    (tags::STRIP_BYTE_COUNTS, "StripByteCounts"),
    (tags::PLANAR_CONFIGURATION, "PlanarConfiguration"),
    (tags::SOFTWARE, "Software"),
    (tags::PREDICTOR, "Predictor"),
    (tags::COLOR_MAP, "ColorMap"),
    (tags::TILE_WIDTH, "TileWidth"),
    (tags::TILE_LENGTH, "TileLength"),
    (tags::TILE_OFFSETS, "TileOffsets"),
    (tags::TILE_BYTE_COUNTS, "TileByteCounts"),
    (tags::EXTRA_SAMPLES, "ExtraSamples"),
    (tags::SAMPLE_FORMAT, "SampleFormat"),
    (tags::MODEL_PIXEL_SCALE_TAG, "ModelPixelScale"),
    (tags::MODEL_TIEPOINT_TAG, "ModelTiepoint"),
    (tags::MODEL_TRANSFORMATION_TAG, "ModelTransformation"),
    (tags::GEO_KEY_DIRECTORY_TAG, "GeoKeyDirectory"),
    (tags::GEO_DOUBLE_PARAMS_TAG, "GeoDoubleParams"),
    (tags::GEO_ASCII_PARAMS_TAG, "GeoAsciiParams"),
    (tags::GDAL_METADATA, "GDALMetadata"),
    (tags::GDAL_NODATA, "GDALNoData"),
];

/// Field type names, indexed by type code
const FIELD_TYPE_NAMES: [&str; 19] = [
    "Unknown", "BYTE", "ASCII", "SHORT", "LONG", "RATIONAL", "SBYTE", "UNDEFINED", "SSHORT",
    "SLONG", "SRATIONAL", "FLOAT", "DOUBLE", "IFD", "Unknown", "Unknown", "LONG8", "SLONG8", "IFD8",
];

const COMPRESSION_NAMES: &[(u16, &str)] = &[
    (compression::NONE, "None"),
    (compression::LZW, "LZW"),
    (compression::JPEG, "JPEG"),
    (compression::DEFLATE, "Adobe Deflate"),
    (compression::DEFLATE_LEGACY, "Deflate"),
    (compression::ZSTD, "Zstandard"),
    (compression::PACKBITS, "PackBits"),
];

const PHOTOMETRIC_NAMES: &[(u16, &str)] = &[
    (photometric::WHITE_IS_ZERO, "WhiteIsZero"),
    (photometric::BLACK_IS_ZERO, "BlackIsZero"),
    (photometric::RGB, "RGB"),
    (photometric::PALETTE, "Palette"),
    (photometric::YCBCR, "YCbCr"),
];

fn lookup(table: &[(u16, &'static str)], code: u16) -> &'static str {
    table.iter()
        .find(|(c, _)| *c == code)
        .map_or("Unknown", |(_, name)| name)
}

pub fn get_tag_name(tag: u16) -> &'static str {
    lookup(TAG_NAMES, tag)
}

pub fn get_field_type_name(field_type: u16) -> &'static str {
    FIELD_TYPE_NAMES.get(field_type as usize).copied().unwrap_or("Unknown")
}

pub fn get_compression_name(code: u64) -> &'static str {
    u16::try_from(code).map_or("Unknown", |c| lookup(COMPRESSION_NAMES, c))
}

pub fn get_photometric_name(code: u64) -> &'static str {
    u16::try_from(code).map_or("Unknown", |c| lookup(PHOTOMETRIC_NAMES, c))
}
