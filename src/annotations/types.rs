//! Annotation data model

/// A label declared in the task metadata
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelDef {
    pub name: String,
    pub color: Option<[u8; 3]>,
}

impl LabelDef {
    pub fn new(name: &str, color: Option<[u8; 3]>) -> Self {
        LabelDef { name: name.to_string(), color }
    }
}

/// Pixel geometry of one annotation
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Closed polygon through the given `(x, y)` vertices
    Polygon(Vec<(f64, f64)>),
    /// Axis-aligned box, optionally rotated clockwise about its center
    Box {
        xtl: f64,
        ytl: f64,
        xbr: f64,
        ybr: f64,
        rotation: f64,
    },
    /// Run-length encoded bitmap whose top-left pixel sits at `left, top`
    Mask {
        rle: Vec<u32>,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    },
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Polygon(_) => "polygon",
            Shape::Box { .. } => "box",
            Shape::Mask { .. } => "mask",
        }
    }
}

/// A labelled shape
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub label: String,
    pub shape: Shape,
}

/// Annotations of one `<image>`, in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageAnnotations {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub annotations: Vec<Annotation>,
}

/// Everything read from one export
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationSet {
    pub labels: Vec<LabelDef>,
    pub images: Vec<ImageAnnotations>,
}

impl AnnotationSet {
    pub fn annotation_count(&self) -> usize {
        self.images.iter().map(|image| image.annotations.len()).sum()
    }
}
