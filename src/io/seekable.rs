//! Reader abstraction shared by the TIFF decoder
//!
//! Tag and sample reads jump around the file, so every source handed to the
//! decoder must be seekable. Files, buffered files and in-memory cursors all
//! qualify through the blanket impl below.

use std::io::{Read, Seek};

/// Anything that can be read from and seeked within
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
