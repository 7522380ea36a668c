//! Handler for TIFF LZW compressed data
//!
//! TIFF LZW packs codes MSB-first, starts at 9 bits, and widens one code
//! early (at 511, 1023, 2047) compared to GIF-style LZW.

use std::collections::HashMap;
use log::debug;

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

const CLEAR_CODE: u16 = 256;
const EOI_CODE: u16 = 257;
const FIRST_CODE: usize = 258;
const MAX_CODE_WIDTH: u32 = 12;
/// The encoder emits a clear before the decoder's table could overflow
const RESET_AT: usize = 4094;

/// Code width in effect once `next_code` table slots are assigned
fn code_width(next_code: usize) -> u32 {
    match next_code {
        0..=511 => 9,
        512..=1023 => 10,
        1024..=2047 => 11,
        _ => MAX_CODE_WIDTH,
    }
}

struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
    acc: u32,
    bits: u32,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        BitReader { data, position: 0, acc: 0, bits: 0 }
    }

    fn read(&mut self, width: u32) -> Option<u16> {
        while self.bits < width {
            let byte = *self.data.get(self.position)?;
            self.position += 1;
            self.acc = (self.acc << 8) | byte as u32;
            self.bits += 8;
        }
        self.bits -= width;
        let code = (self.acc >> self.bits) & ((1 << width) - 1);
        self.acc &= (1 << self.bits) - 1;
        Some(code as u16)
    }
}

struct BitWriter {
    out: Vec<u8>,
    acc: u32,
    bits: u32,
}

impl BitWriter {
    fn new(capacity: usize) -> Self {
        BitWriter { out: Vec::with_capacity(capacity), acc: 0, bits: 0 }
    }

    fn write(&mut self, code: u16, width: u32) {
        self.acc = (self.acc << width) | code as u32;
        self.bits += width;
        while self.bits >= 8 {
            self.bits -= 8;
            self.out.push((self.acc >> self.bits) as u8);
        }
        self.acc &= (1 << self.bits) - 1;
    }

    fn finish(mut self) -> Vec<u8> {
        if self.bits > 0 {
            self.out.push((self.acc << (8 - self.bits)) as u8);
        }
        self.out
    }
}

/// LZW handler
pub struct LzwHandler;

impl CompressionHandler for LzwHandler {
    /// Decodes into the output buffer directly; table entries are spans of
    /// already decoded output, since every new string is the previous string
    /// plus the byte that follows it.
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut reader = BitReader::new(data);
        let mut out: Vec<u8> = Vec::with_capacity(data.len() * 3);
        let mut table: Vec<(usize, usize)> = Vec::with_capacity(4096 - FIRST_CODE);
        let mut previous: Option<(usize, usize)> = None;
        let mut width = code_width(FIRST_CODE);

        while let Some(code) = reader.read(width) {
            if code == CLEAR_CODE {
                table.clear();
                previous = None;
                width = code_width(FIRST_CODE);
                continue;
            }
            if code == EOI_CODE {
                break;
            }

            let next_code = FIRST_CODE + table.len();
            let start = out.len();
            let code = code as usize;
            let current = if code < CLEAR_CODE as usize {
                out.push(code as u8);
                (start, 1)
            } else if code < next_code {
                let (s, len) = table[code - FIRST_CODE];
                out.extend_from_within(s..s + len);
                (start, len)
            } else if code == next_code {
                let (s, len) = previous.ok_or_else(|| TiffError::CorruptData(
                    format!("LZW code {} before any string", code)))?;
                out.extend_from_within(s..s + len);
                out.push(out[s]);
                (start, len + 1)
            } else {
                return Err(TiffError::CorruptData(format!(
                    "LZW code {} beyond table size {}", code, next_code)));
            };

            if let Some((s, len)) = previous {
                if next_code < 1 << MAX_CODE_WIDTH {
                    table.push((s, len + 1));
                }
            }
            previous = Some(current);
            width = code_width(FIRST_CODE + table.len() + 1);
        }

        Ok(out)
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut writer = BitWriter::new(data.len() / 2 + 16);
        let mut dictionary: HashMap<(u16, u8), u16> = HashMap::new();
        let mut next_code = FIRST_CODE;

        writer.write(CLEAR_CODE, code_width(next_code));

        let mut current: Option<u16> = None;
        for &byte in data {
            let prefix = match current {
                None => {
                    current = Some(byte as u16);
                    continue;
                },
                Some(prefix) => prefix,
            };
            if let Some(&code) = dictionary.get(&(prefix, byte)) {
                current = Some(code);
                continue;
            }

            writer.write(prefix, code_width(next_code));
            dictionary.insert((prefix, byte), next_code as u16);
            next_code += 1;
            if next_code == RESET_AT {
                writer.write(CLEAR_CODE, code_width(next_code));
                dictionary.clear();
                next_code = FIRST_CODE;
            }
            current = Some(byte as u16);
        }

        if let Some(prefix) = current {
            writer.write(prefix, code_width(next_code));
            next_code += 1;
        }
        writer.write(EOI_CODE, code_width(next_code));

        let compressed = writer.finish();
        debug!("LZW compressed {} bytes to {}", data.len(), compressed.len());
        Ok(compressed)
    }

    fn name(&self) -> &'static str {
        "LZW"
    }

    fn code(&self) -> u16 {
        compression::LZW
    }
}
