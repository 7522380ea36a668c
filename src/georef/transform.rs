//! Affine pixel-to-map transform

use serde::{Deserialize, Serialize};
use std::fmt;

/// Affine transform from pixel (col, row) to map (x, y) coordinates:
///
/// ```text
/// x = a * col + b * row + c
/// y = d * col + e * row + f
/// ```
///
/// Serialized as the nine coefficients of the 3x3 matrix,
/// `[a, b, c, d, e, f, 0, 0, 1]`; six coefficients are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct GeoTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl GeoTransform {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        GeoTransform { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// North-up transform for a raster whose top-left corner is `(west, north)`
    pub fn from_origin(west: f64, north: f64, x_size: f64, y_size: f64) -> Self {
        Self::new(x_size, 0.0, west, 0.0, -y_size, north)
    }

    /// Builds the transform from ModelTiepoint and ModelPixelScale values
    ///
    /// Only the first tiepoint is used. Returns `None` when either array is
    /// too short.
    pub fn from_tiepoint_and_scale(tiepoint: &[f64], pixel_scale: &[f64]) -> Option<Self> {
        if tiepoint.len() < 6 || pixel_scale.len() < 2 {
            return None;
        }
        let (i, j) = (tiepoint[0], tiepoint[1]);
        let (x, y) = (tiepoint[3], tiepoint[4]);
        let (sx, sy) = (pixel_scale[0], pixel_scale[1]);

        Some(Self::new(sx, 0.0, x - i * sx, 0.0, -sy, y + j * sy))
    }

    /// Builds the transform from the 4x4 row-major ModelTransformation matrix
    pub fn from_model_transformation(matrix: &[f64]) -> Option<Self> {
        if matrix.len() < 16 {
            return None;
        }
        Some(Self::new(matrix[0], matrix[1], matrix[3], matrix[4], matrix[5], matrix[7]))
    }

    /// No rotation or shear terms
    pub fn is_rectilinear(&self) -> bool {
        self.b == 0.0 && self.d == 0.0
    }

    /// ModelPixelScale values for a rectilinear transform
    pub fn pixel_scale(&self) -> [f64; 3] {
        [self.a, -self.e, 0.0]
    }

    /// ModelTiepoint tying raster (0, 0) to the transform's origin
    pub fn tiepoint(&self) -> [f64; 6] {
        [0.0, 0.0, 0.0, self.c, self.f, 0.0]
    }

    /// ModelTransformation matrix, row-major 4x4
    pub fn model_transformation(&self) -> [f64; 16] {
        [
            self.a, self.b, 0.0, self.c,
            self.d, self.e, 0.0, self.f,
            0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]
    }

    /// Maps a pixel-space position to map coordinates
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// Shifts the origin by a fraction of a pixel along both axes
    pub fn translate_pixels(&self, cols: f64, rows: f64) -> Self {
        let (c, f) = self.apply(cols, rows);
        Self { c, f, ..*self }
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for GeoTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "| {}, {}, {} | {}, {}, {} |", self.a, self.b, self.c, self.d, self.e, self.f)
    }
}

impl From<GeoTransform> for Vec<f64> {
    fn from(t: GeoTransform) -> Self {
        vec![t.a, t.b, t.c, t.d, t.e, t.f, 0.0, 0.0, 1.0]
    }
}

impl TryFrom<Vec<f64>> for GeoTransform {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.len() {
            6 => {},
            9 => {
                if values[6] != 0.0 || values[7] != 0.0 || values[8] != 1.0 {
                    return Err(format!(
                        "last row of an affine transform must be [0, 0, 1], got {:?}", &values[6..]));
                }
            },
            n => return Err(format!("expected 6 or 9 transform coefficients, got {}", n)),
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err("transform coefficients must be finite".to_string());
        }
        Ok(Self::new(values[0], values[1], values[2], values[3], values[4], values[5]))
    }
}
