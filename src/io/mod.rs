//! Low-level I/O helpers for the TIFF codec

pub mod seekable;
pub mod byte_order;
