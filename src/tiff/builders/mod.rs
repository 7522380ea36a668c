//! TIFF builder strategy modules
//!
//! Each builder adds one family of tags to an IFD under construction;
//! `writer` lays the finished directories and payloads out on disk.

use std::collections::BTreeMap;

pub mod basic_tags;
pub mod geo_tags;
pub mod metadata_tags;
pub mod writer;

/// Out-of-entry tag payloads keyed by (IFD index, tag)
pub type ExternalData = BTreeMap<(usize, u16), Vec<u8>>;

/// Strip payloads keyed by IFD index
pub type ImageData = BTreeMap<usize, Vec<u8>>;
