//! Label canvas compositing

use log::{debug, warn};

use crate::annotations::{decode_rle, Annotation, LabelMap, Shape};
use crate::raster::{DataType, RasterData};

use super::polygon::{box_corners, scan_fill};

/// One image's label raster; 0 is background
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl LabelCanvas {
    /// Background-filled canvas of `width x height` pixels
    pub fn new(width: u32, height: u32) -> Self {
        LabelCanvas {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Value at a pixel
    ///
    /// # Arguments
    /// * `col` - Zero-based column
    /// * `row` - Zero-based row
    ///
    /// # Returns
    /// The label value, or `None` outside the canvas
    pub fn get(&self, col: u32, row: u32) -> Option<u8> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.pixels[row as usize * self.width as usize + col as usize])
    }

    /// Fills the pixels whose centres fall inside `points`
    ///
    /// # Arguments
    /// * `points` - Vertices in pixel coordinates, implicitly closed
    /// * `value` - Label value to write
    pub fn fill_polygon(&mut self, points: &[(f64, f64)], value: u8) {
        let width = self.width as usize;
        let pixels = &mut self.pixels;
        scan_fill(points, self.width, self.height, |row, start, end| {
            pixels[row * width + start..row * width + end].fill(value);
        });
    }

    /// Paints the set pixels of a `mask_width x mask_height` bitmap placed
    /// at `left, top`, dropping whatever falls outside the canvas
    pub fn paint_mask(&mut self, mask: &[bool], left: u32, top: u32, mask_width: u32, mask_height: u32, value: u8) {
        let visible_cols = (mask_width as usize).min((self.width as usize).saturating_sub(left as usize));
        let visible_rows = (mask_height as usize).min((self.height as usize).saturating_sub(top as usize));
        if visible_cols < mask_width as usize || visible_rows < mask_height as usize {
            debug!("Mask at ({}, {}) clipped to the {}x{} canvas", left, top, self.width, self.height);
        }

        for r in 0..visible_rows {
            let src = r * mask_width as usize;
            let dst = (top as usize + r) * self.width as usize + left as usize;
            for (c, &set) in mask[src..src + visible_cols].iter().enumerate() {
                if set {
                    self.pixels[dst + c] = value;
                }
            }
        }
    }

    /// Draws one annotation with the value of its label
    ///
    /// Returns false when the label has no value in `labels`.
    pub fn draw(&mut self, annotation: &Annotation, labels: &LabelMap) -> bool {
        let Some(value) = labels.value_of(&annotation.label) else {
            warn!("No value for label {:?}, skipping {}", annotation.label, annotation.shape.kind());
            return false;
        };

        match &annotation.shape {
            Shape::Polygon(points) => self.fill_polygon(points, value),
            Shape::Box { xtl, ytl, xbr, ybr, rotation } => {
                self.fill_polygon(&box_corners(*xtl, *ytl, *xbr, *ybr, *rotation), value)
            },
            Shape::Mask { rle, left, top, width, height } => {
                let mask = decode_rle(rle, *width, *height);
                self.paint_mask(&mask, *left, *top, *width, *height, value);
            },
        }
        true
    }

    /// Draws annotations in order, later ones over earlier ones
    ///
    /// # Returns
    /// How many annotations were drawn
    pub fn draw_all(&mut self, annotations: &[Annotation], labels: &LabelMap) -> usize {
        annotations.iter().filter(|a| self.draw(a, labels)).count()
    }

    /// Single uint8 band ready for the GeoTIFF writer
    pub fn into_raster(self) -> RasterData {
        RasterData {
            width: self.width,
            height: self.height,
            data_type: DataType::Uint8,
            bands: vec![self.pixels],
        }
    }
}
