//! Utility modules for common functionality
//!
//! Helpers shared by the TIFF reader and writer, plus logging and progress
//! reporting for the command-line tools.

pub mod logger;
pub(crate) mod progress;
pub(crate) mod tiff_utils;
pub(crate) mod write_utils;
pub(crate) mod ifd_utils;
pub(crate) mod string_utils;
pub(crate) mod format_utils;
pub(crate) mod tag_utils;
