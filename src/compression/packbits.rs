//! Handler for PackBits run-length encoded data

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Longest literal or replicate run one header byte can describe
const MAX_RUN: usize = 128;

/// PackBits handler
pub struct PackBitsHandler;

impl CompressionHandler for PackBitsHandler {
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 2);
        let mut i = 0;

        while i < data.len() {
            let header = data[i] as i8;
            i += 1;
            match header {
                0..=127 => {
                    let len = header as usize + 1;
                    let literal = data.get(i..i + len).ok_or_else(|| TiffError::CorruptData(
                        "PackBits literal run past end of data".to_string()))?;
                    out.extend_from_slice(literal);
                    i += len;
                },
                -127..=-1 => {
                    let byte = *data.get(i).ok_or_else(|| TiffError::CorruptData(
                        "PackBits replicate run past end of data".to_string()))?;
                    out.resize(out.len() + (1 - header as isize) as usize, byte);
                    i += 1;
                },
                // -128 is a no-op
                _ => {}
            }
        }

        Ok(out)
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() + data.len() / MAX_RUN + 1);
        let mut literal_start = 0;
        let mut i = 0;

        let flush_literal = |out: &mut Vec<u8>, literal: &[u8]| {
            for chunk in literal.chunks(MAX_RUN) {
                out.push((chunk.len() - 1) as u8);
                out.extend_from_slice(chunk);
            }
        };

        while i < data.len() {
            let byte = data[i];
            let run = data[i..].iter().take(MAX_RUN).take_while(|&&b| b == byte).count();

            if run >= 3 {
                flush_literal(&mut out, &data[literal_start..i]);
                out.push((1 - run as isize) as i8 as u8);
                out.push(byte);
                i += run;
                literal_start = i;
            } else {
                i += 1;
            }
        }
        flush_literal(&mut out, &data[literal_start..]);

        Ok(out)
    }

    fn name(&self) -> &'static str {
        "PackBits"
    }

    fn code(&self) -> u16 {
        compression::PACKBITS
    }
}
