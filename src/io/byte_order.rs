//! Byte order handling for TIFF files
//!
//! TIFF files may be written in either byte order. Header and tag values are
//! read through a `ByteOrderHandler`; pixel samples are normalised to
//! little-endian right after decompression so the rest of the crate only
//! ever sees one layout.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::Result;

use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};

/// Represents the byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the TIFF header
    pub fn detect(reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        let marker = reader.read_u16::<LittleEndian>()?;
        match marker {
            0x4949 => Ok(ByteOrder::LittleEndian),
            0x4D4D => Ok(ByteOrder::BigEndian),
            _ => Err(TiffError::InvalidByteOrder(marker)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the matching handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }

    /// Rewrites a buffer of `sample_size`-byte samples from this byte order
    /// into little-endian, in place.
    ///
    /// Trailing bytes that do not form a whole sample are left untouched.
    pub fn samples_to_little_endian(&self, data: &mut [u8], sample_size: usize) {
        if *self == ByteOrder::LittleEndian || sample_size <= 1 {
            return;
        }
        for sample in data.chunks_exact_mut(sample_size) {
            sample.reverse();
        }
    }
}

/// Reads header and tag values in one byte order
pub trait ByteOrderHandler: Send + Sync {
    fn byte_order(&self) -> ByteOrder;

    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;

    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32>;

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64>;

    /// RATIONAL: numerator then denominator
    fn read_rational(&self, reader: &mut dyn SeekableReader) -> Result<(u32, u32)> {
        Ok((self.read_u32(reader)?, self.read_u32(reader)?))
    }

    /// SRATIONAL: signed numerator then denominator
    fn read_srational(&self, reader: &mut dyn SeekableReader) -> Result<(i32, i32)> {
        Ok((self.read_u32(reader)? as i32, self.read_u32(reader)? as i32))
    }
}

macro_rules! endian_handler {
    ($(#[$doc:meta])* $name:ident, $endian:ty, $order:expr) => {
        $(#[$doc])*
        pub struct $name;

        impl ByteOrderHandler for $name {
            fn byte_order(&self) -> ByteOrder {
                $order
            }

            fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
                reader.read_u16::<$endian>()
            }

            fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
                reader.read_u32::<$endian>()
            }

            fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
                reader.read_u64::<$endian>()
            }

            fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
                reader.read_f32::<$endian>()
            }

            fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
                reader.read_f64::<$endian>()
            }
        }
    };
}

endian_handler!(
    /// Handler for `II` files
    LittleEndianHandler, LittleEndian, ByteOrder::LittleEndian
);
endian_handler!(
    /// Handler for `MM` files
    BigEndianHandler, BigEndian, ByteOrder::BigEndian
);
