//! Label name to class value mapping

use log::{debug, warn};
use std::collections::HashMap;

use crate::error::{ConvertError, ConvertResult};

use super::types::{AnnotationSet, LabelDef};

/// Largest class value of an 8-bit label raster; 0 is background
pub const MAX_LABELS: usize = 255;

/// Class values `1..=N` for the labels of an export
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelMap {
    labels: Vec<LabelDef>,
    index: HashMap<String, u8>,
}

impl LabelMap {
    /// Numbers declared labels in declaration order, then appends labels
    /// that shapes use without declaring them
    pub fn build(set: &AnnotationSet) -> ConvertResult<Self> {
        let mut labels: Vec<LabelDef> = Vec::new();
        for label in &set.labels {
            if labels.iter().any(|l| l.name == label.name) {
                warn!("Label {:?} declared twice, keeping the first", label.name);
                continue;
            }
            labels.push(label.clone());
        }

        for annotation in set.images.iter().flat_map(|image| &image.annotations) {
            if !labels.iter().any(|l| l.name == annotation.label) {
                warn!("Label {:?} is used but not declared, assigning value {}",
                      annotation.label, labels.len() + 1);
                labels.push(LabelDef::new(&annotation.label, None));
            }
        }

        if labels.len() > MAX_LABELS {
            return Err(ConvertError::TooManyLabels(labels.len()));
        }

        let index = labels.iter()
            .enumerate()
            .map(|(i, label)| (label.name.clone(), (i + 1) as u8))
            .collect();
        for (i, label) in labels.iter().enumerate() {
            debug!("Label {} = {:?}", i + 1, label.name);
        }
        Ok(LabelMap { labels, index })
    }

    pub fn value_of(&self, name: &str) -> Option<u8> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Colour table indexed by class value, `None` when no label has a colour
    ///
    /// Background and labels without a colour are black.
    pub fn palette(&self) -> Option<Vec<[u8; 3]>> {
        if self.labels.iter().all(|l| l.color.is_none()) {
            return None;
        }
        let mut palette = vec![[0u8; 3]; self.labels.len() + 1];
        for (i, label) in self.labels.iter().enumerate() {
            if let Some(color) = label.color {
                palette[i + 1] = color;
            }
        }
        Some(palette)
    }
}
