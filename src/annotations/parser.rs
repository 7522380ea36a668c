//! CVAT for images 1.1 XML parser
//!
//! A pull parser over the export: label definitions come from
//! `<meta>/.../<labels>/<label>`, shapes from the direct children of each
//! `<image>`. Shapes keep document order.

use log::{debug, info, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ConvertError, ConvertResult};

use super::rle::parse_rle;
use super::types::{Annotation, AnnotationSet, ImageAnnotations, LabelDef, Shape};

/// Reads and parses an export from disk
pub fn parse_cvat_file(path: &Path) -> ConvertResult<AnnotationSet> {
    let content = fs::read_to_string(path)?;
    let set = parse_cvat_str(&content)?;
    info!("Parsed {}: {} label(s), {} image(s), {} shape(s)", path.display(),
          set.labels.len(), set.images.len(), set.annotation_count());
    Ok(set)
}

/// Parses an export held in memory
pub fn parse_cvat_str(content: &str) -> ConvertResult<AnnotationSet> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut state = ParseState::default();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                state.open(&name, e)?;
                state.stack.push(name);
            },
            Ok(Event::Empty(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                state.open(&name, e)?;
                state.close(&name);
            },
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                state.stack.pop();
                state.close(&name);
            },
            Ok(Event::Text(ref e)) => {
                let text = e.unescape()
                    .map_err(|err| xml_error(&reader, err))?;
                state.text(&text);
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {},
        }
    }

    if !state.stack.is_empty() {
        return Err(ConvertError::Xml(format!("unexpected end of document inside <{}>",
                                             state.stack.join("/"))));
    }
    Ok(state.set)
}

fn xml_error(reader: &Reader<&[u8]>, error: impl std::fmt::Display) -> ConvertError {
    ConvertError::Xml(format!("{} at byte {}", error, reader.buffer_position()))
}

/// Parses `#rrggbb`
pub(crate) fn parse_hex_color(text: &str) -> Option<[u8; 3]> {
    let hex = text.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Parses `x1,y1;x2,y2;...`
pub(crate) fn parse_points(text: &str) -> ConvertResult<Vec<(f64, f64)>> {
    text.split(';')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| {
            let (x, y) = pair.split_once(',').ok_or_else(|| {
                ConvertError::Xml(format!("invalid point {:?}", pair))
            })?;
            match (x.trim().parse::<f64>(), y.trim().parse::<f64>()) {
                (Ok(x), Ok(y)) if x.is_finite() && y.is_finite() => Ok((x, y)),
                _ => Err(ConvertError::Xml(format!("invalid point {:?}", pair))),
            }
        })
        .collect()
}

/// Attributes of one element
struct Attributes<'a> {
    element: &'a str,
    values: HashMap<String, String>,
}

impl<'a> Attributes<'a> {
    fn read(element: &'a str, start: &BytesStart) -> ConvertResult<Self> {
        let mut values = HashMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ConvertError::Xml(format!("<{}>: {}", element, e)))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value()
                .map_err(|e| ConvertError::Xml(format!("<{}> {}: {}", element, key, e)))?;
            values.insert(key, value.to_string());
        }
        Ok(Attributes { element, values })
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn required(&self, key: &str) -> ConvertResult<&str> {
        self.get(key).ok_or_else(|| {
            ConvertError::Xml(format!("<{}> is missing attribute {:?}", self.element, key))
        })
    }

    fn number<T: FromStr>(&self, key: &str) -> ConvertResult<T> {
        let text = self.required(key)?;
        text.trim().parse::<T>().map_err(|_| {
            ConvertError::Xml(format!("<{}> attribute {}={:?} is not a number", self.element, key, text))
        })
    }

    fn coordinate(&self, key: &str) -> ConvertResult<f64> {
        let value: f64 = self.number(key)?;
        if !value.is_finite() {
            return Err(ConvertError::Xml(format!("<{}> attribute {} is not finite", self.element, key)));
        }
        Ok(value)
    }

    /// Non-negative integer, tolerating a `.0` suffix
    fn pixel_count(&self, key: &str) -> ConvertResult<u32> {
        let value = self.coordinate(key)?;
        if value < 0.0 || value > u32::MAX as f64 || value.fract() != 0.0 {
            return Err(ConvertError::Xml(format!(
                "<{}> attribute {}={} is not a pixel count", self.element, key, value)));
        }
        Ok(value as u32)
    }
}

#[derive(Default)]
struct ParseState {
    set: AnnotationSet,
    stack: Vec<String>,
    label: Option<LabelDef>,
    image: Option<ImageAnnotations>,
}

impl ParseState {
    fn parent(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    fn in_meta(&self) -> bool {
        self.stack.iter().any(|name| name == "meta")
    }

    fn open(&mut self, name: &str, start: &BytesStart) -> ConvertResult<()> {
        let parent = self.parent().map(str::to_string);
        match (name, parent.as_deref()) {
            ("label", Some("labels")) if self.in_meta() => {
                self.label = Some(LabelDef::default());
            },
            ("image", _) => {
                let attrs = Attributes::read(name, start)?;
                self.image = Some(ImageAnnotations {
                    name: attrs.required("name")?.to_string(),
                    width: attrs.pixel_count("width")?,
                    height: attrs.pixel_count("height")?,
                    annotations: Vec::new(),
                });
            },
            ("track", _) => {
                let id = Attributes::read(name, start)?.get("id").unwrap_or("?").to_string();
                warn!("Ignoring <track id={}>: only per-image annotations are rasterized", id);
            },
            (_, Some("image")) => {
                if let Some(annotation) = Self::read_shape(name, start)? {
                    if let Some(image) = self.image.as_mut() {
                        image.annotations.push(annotation);
                    }
                }
            },
            _ => {},
        }
        Ok(())
    }

    fn read_shape(name: &str, start: &BytesStart) -> ConvertResult<Option<Annotation>> {
        let shape = match name {
            "polygon" | "box" | "mask" => {
                let attrs = Attributes::read(name, start)?;
                let shape = match name {
                    "polygon" => Shape::Polygon(parse_points(attrs.required("points")?)?),
                    "box" => Shape::Box {
                        xtl: attrs.coordinate("xtl")?,
                        ytl: attrs.coordinate("ytl")?,
                        xbr: attrs.coordinate("xbr")?,
                        ybr: attrs.coordinate("ybr")?,
                        rotation: match attrs.get("rotation") {
                            Some(_) => attrs.coordinate("rotation")?,
                            None => 0.0,
                        },
                    },
                    _ => Shape::Mask {
                        rle: parse_rle(attrs.required("rle")?)?,
                        left: attrs.pixel_count("left")?,
                        top: attrs.pixel_count("top")?,
                        width: attrs.pixel_count("width")?,
                        height: attrs.pixel_count("height")?,
                    },
                };
                Some(Annotation {
                    label: attrs.required("label")?.to_string(),
                    shape,
                })
            },
            other => {
                debug!("Ignoring unsupported <{}> annotation", other);
                None
            },
        };
        Ok(shape)
    }

    fn close(&mut self, name: &str) {
        match name {
            "label" => {
                if let Some(label) = self.label.take() {
                    if label.name.is_empty() {
                        warn!("Ignoring <label> without a name");
                    } else {
                        self.set.labels.push(label);
                    }
                }
            },
            "image" => {
                if let Some(image) = self.image.take() {
                    debug!("Image {} ({}x{}): {} shape(s)",
                           image.name, image.width, image.height, image.annotations.len());
                    self.set.images.push(image);
                }
            },
            _ => {},
        }
    }

    fn text(&mut self, text: &str) {
        let len = self.stack.len();
        if len < 2 || self.stack[len - 2] != "label" {
            return;
        }
        let Some(label) = self.label.as_mut() else { return };
        match self.stack[len - 1].as_str() {
            "name" => label.name = text.trim().to_string(),
            "color" => {
                label.color = parse_hex_color(text);
                if label.color.is_none() {
                    warn!("Ignoring invalid colour {:?} of label {:?}", text, label.name);
                }
            },
            _ => {},
        }
    }
}
