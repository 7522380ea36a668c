//! Errors raised while reading or writing TIFF structure

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum TiffError {
    Io(io::Error),
    /// First two header bytes are neither `II` nor `MM`
    InvalidByteOrder(u16),
    /// BigTIFF offset size and reserved word
    InvalidBigTiffHeader { offset_size: u16, reserved: u16 },
    UnsupportedVersion(u16),
    TagNotFound(u16),
    UnsupportedFieldType(u16),
    UnsupportedCompression(u64),
    UnsupportedPredictor(u64),
    /// Bit depth, sample format or planar layout with no matching data type
    UnsupportedSampleLayout(String),
    /// Width or height absent or zero
    MissingDimensions,
    CorruptData(String),
    Other(String),
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::Io(e) => write!(f, "TIFF I/O error: {}", e),
            TiffError::InvalidByteOrder(marker) => write!(f, "Not a TIFF file (byte order marker {:#06x})", marker),
            TiffError::InvalidBigTiffHeader { offset_size, reserved } => write!(
                f, "Invalid BigTIFF header (offset size {}, reserved {})", offset_size, reserved),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version {}", v),
            TiffError::TagNotFound(tag) => write!(f, "Missing TIFF tag {}", tag),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported TIFF field type {}", ft),
            TiffError::UnsupportedCompression(c) => write!(f, "Unsupported TIFF compression {}", c),
            TiffError::UnsupportedPredictor(p) => write!(f, "Unsupported TIFF predictor {}", p),
            TiffError::UnsupportedSampleLayout(msg) => write!(f, "Unsupported sample layout: {}", msg),
            TiffError::MissingDimensions => write!(f, "TIFF image has no usable dimensions"),
            TiffError::CorruptData(msg) => write!(f, "Corrupt TIFF data: {}", msg),
            TiffError::Other(msg) => write!(f, "TIFF error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let TiffError::Io(e) = self {
            Some(e)
        } else {
            None
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::Io(error)
    }
}

pub type TiffResult<T> = Result<T, TiffError>;
