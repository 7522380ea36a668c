//! Shape rasterization onto 8-bit label canvases

pub mod polygon;
pub mod canvas;

#[cfg(test)]
mod tests;

pub use canvas::LabelCanvas;
pub use polygon::{box_corners, scan_fill};
