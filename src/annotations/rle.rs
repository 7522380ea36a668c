//! CVAT mask run-length encoding
//!
//! Runs alternate background and foreground, starting with background, and
//! cover the mask row by row.

use log::warn;

use crate::error::{ConvertError, ConvertResult};

/// Parses the comma separated run lengths of an `rle` attribute
///
/// An empty attribute is an empty mask.
pub fn parse_rle(text: &str) -> ConvertResult<Vec<u32>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|run| {
            run.trim().parse::<u32>().map_err(|_| {
                ConvertError::Xml(format!("invalid run length {:?} in mask rle", run.trim()))
            })
        })
        .collect()
}

/// Expands runs into a row-major `width * height` bitmap
///
/// Runs past the end of the mask are dropped with a warning; a short
/// encoding leaves the remainder as background.
pub fn decode_rle(runs: &[u32], width: u32, height: u32) -> Vec<bool> {
    let len = width as usize * height as usize;
    let mut mask = vec![false; len];
    let mut pos = 0usize;

    for (i, &run) in runs.iter().enumerate() {
        let end = pos.saturating_add(run as usize);
        if end > len {
            warn!("Mask rle covers {} pixels, mask holds {}; clipping", runs.iter().map(|&r| r as u64).sum::<u64>(), len);
            if i % 2 == 1 {
                mask[pos.min(len)..].fill(true);
            }
            break;
        }
        if i % 2 == 1 {
            mask[pos..end].fill(true);
        }
        pos = end;
    }
    mask
}
