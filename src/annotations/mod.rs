//! CVAT for images 1.1 annotations
//!
//! `parse_cvat_file` reads an export into an `AnnotationSet`; `LabelMap`
//! assigns the 8-bit class values written into label rasters.

pub mod types;
pub mod parser;
pub mod rle;
pub mod labels;

#[cfg(test)]
mod tests;

pub use types::{Annotation, AnnotationSet, ImageAnnotations, LabelDef, Shape};
pub use parser::{parse_cvat_file, parse_cvat_str};
pub use rle::{decode_rle, parse_rle};
pub use labels::LabelMap;
