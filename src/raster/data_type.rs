//! Raster sample types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tiff::constants::sample_format;

/// Sample type of a raster band, named the way sidecars spell it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Float32,
    Float64,
}

impl DataType {
    /// Bytes per sample
    pub fn size_bytes(&self) -> usize {
        match self {
            DataType::Uint8 | DataType::Int8 => 1,
            DataType::Uint16 | DataType::Int16 => 2,
            DataType::Uint32 | DataType::Int32 | DataType::Float32 => 4,
            DataType::Float64 => 8,
        }
    }

    /// BitsPerSample value
    pub fn bits(&self) -> u16 {
        (self.size_bytes() * 8) as u16
    }

    /// SampleFormat value
    pub fn sample_format(&self) -> u16 {
        match self {
            DataType::Uint8 | DataType::Uint16 | DataType::Uint32 => sample_format::UNSIGNED,
            DataType::Int8 | DataType::Int16 | DataType::Int32 => sample_format::SIGNED,
            DataType::Float32 | DataType::Float64 => sample_format::IEEEFP,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }

    /// Maps BitsPerSample and SampleFormat to a type
    pub fn from_tiff(bits: u16, format: u16) -> Option<Self> {
        match (format, bits) {
            (sample_format::UNSIGNED, 8) => Some(DataType::Uint8),
            (sample_format::UNSIGNED, 16) => Some(DataType::Uint16),
            (sample_format::UNSIGNED, 32) => Some(DataType::Uint32),
            (sample_format::SIGNED, 8) => Some(DataType::Int8),
            (sample_format::SIGNED, 16) => Some(DataType::Int16),
            (sample_format::SIGNED, 32) => Some(DataType::Int32),
            (sample_format::IEEEFP, 32) => Some(DataType::Float32),
            (sample_format::IEEEFP, 64) => Some(DataType::Float64),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Uint8 => "uint8",
            DataType::Int8 => "int8",
            DataType::Uint16 => "uint16",
            DataType::Int16 => "int16",
            DataType::Uint32 => "uint32",
            DataType::Int32 => "int32",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
