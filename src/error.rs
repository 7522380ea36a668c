//! Pipeline-level error type
//!
//! `TiffError` covers the codec; everything above it (sidecars, XML,
//! image encoding, argument validation) reports through `ConvertError`.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::tiff::errors::TiffError;

#[derive(Debug)]
pub enum ConvertError {
    /// I/O error
    Io(io::Error),
    /// TIFF decoding or encoding failed
    Tiff(TiffError),
    /// PNG/JPEG decoding or encoding failed
    Image(image::ImageError),
    /// Sidecar JSON could not be read or written
    Json(serde_json::Error),
    /// Annotation XML is malformed or missing required attributes
    Xml(String),
    /// CRS definition could not be interpreted
    InvalidCrs(String),
    /// Affine transform definition could not be interpreted
    InvalidTransform(String),
    /// Invalid command-line configuration
    InvalidArgument(String),
    /// No sidecar JSON next to an image
    MissingSidecar(PathBuf),
    /// Requested band index outside `1..=count`
    BandOutOfRange { band: usize, count: usize },
    /// Decoded channel count does not match the sidecar
    ChannelMismatch { expected: u16, found: u16 },
    /// Sample type the target format cannot carry
    UnsupportedDataType(String),
    /// More classes than fit in an 8-bit label raster
    TooManyLabels(usize),
    /// Worker pool could not be created
    ThreadPool(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Io(e) => write!(f, "I/O error: {}", e),
            ConvertError::Tiff(e) => write!(f, "{}", e),
            ConvertError::Image(e) => write!(f, "Image codec error: {}", e),
            ConvertError::Json(e) => write!(f, "Sidecar JSON error: {}", e),
            ConvertError::Xml(msg) => write!(f, "Annotation XML error: {}", msg),
            ConvertError::InvalidCrs(msg) => write!(f, "Invalid CRS: {}", msg),
            ConvertError::InvalidTransform(msg) => write!(f, "Invalid transform: {}", msg),
            ConvertError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            ConvertError::MissingSidecar(path) => write!(f, "Sidecar not found: {}", path.display()),
            ConvertError::BandOutOfRange { band, count } => {
                write!(f, "Band {} out of range (raster has {} bands)", band, count)
            },
            ConvertError::ChannelMismatch { expected, found } => {
                write!(f, "Image has {} channels but sidecar declares {}", found, expected)
            },
            ConvertError::UnsupportedDataType(msg) => write!(f, "Unsupported data type: {}", msg),
            ConvertError::TooManyLabels(n) => {
                write!(f, "{} labels do not fit in an 8-bit label raster (max 255)", n)
            },
            ConvertError::ThreadPool(msg) => write!(f, "Thread pool error: {}", msg),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io(e) => Some(e),
            ConvertError::Tiff(e) => Some(e),
            ConvertError::Image(e) => Some(e),
            ConvertError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConvertError {
    fn from(error: io::Error) -> Self {
        ConvertError::Io(error)
    }
}

impl From<TiffError> for ConvertError {
    fn from(error: TiffError) -> Self {
        match error {
            TiffError::Io(e) => ConvertError::Io(e),
            other => ConvertError::Tiff(other),
        }
    }
}

impl From<image::ImageError> for ConvertError {
    fn from(error: image::ImageError) -> Self {
        ConvertError::Image(error)
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(error: serde_json::Error) -> Self {
        ConvertError::Json(error)
    }
}

impl From<quick_xml::Error> for ConvertError {
    fn from(error: quick_xml::Error) -> Self {
        ConvertError::Xml(error.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for ConvertError {
    fn from(error: rayon::ThreadPoolBuildError) -> Self {
        ConvertError::ThreadPool(error.to_string())
    }
}

/// Result type for conversion pipelines
pub type ConvertResult<T> = Result<T, ConvertError>;
