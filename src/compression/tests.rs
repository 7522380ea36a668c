//! Tests for the compression handlers

extern crate std;

use super::{CompressionFactory, CompressionHandler, DeflateHandler, LzwHandler, PackBitsHandler, ZstdHandler};

/// Bytes with long runs and a slowly changing pattern, enough to push LZW
/// through every code width and a table reset
fn patterned_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i / 7) % 251) as u8 ^ ((i % 13) as u8)).collect()
}

#[test]
fn test_lzw_decodes_known_stream() {
    // Clear, 7, 258 (7 7), 7, EOI at 9 bits
    let encoded = [0x80, 0x01, 0xe0, 0x40, 0x78, 0x08];
    let decoded = LzwHandler.decompress(&encoded).unwrap();
    std::assert_eq!(decoded, vec![7, 7, 7, 7]);
}

#[test]
fn test_lzw_round_trip_crosses_code_widths() {
    let data = patterned_bytes(200_000);
    let encoded = LzwHandler.compress(&data).unwrap();
    std::assert_eq!(LzwHandler.decompress(&encoded).unwrap(), data);
}

#[test]
fn test_lzw_rejects_code_beyond_table() {
    // Clear, then code 300 with an empty table
    let encoded = [0x80, 0x4b, 0x00];
    std::assert!(LzwHandler.decompress(&encoded).is_err());
}

#[test]
fn test_packbits_decodes_apple_example() {
    let encoded = [
        0xFE, 0xAA, 0x02, 0x80, 0x00, 0x2A, 0xFD, 0xAA, 0x03, 0x80, 0x00, 0x2A, 0x22, 0xF7, 0xAA,
    ];
    let expected = [
        0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0xAA, 0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0x22,
        0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
    ];
    std::assert_eq!(PackBitsHandler.decompress(&encoded).unwrap(), expected.to_vec());
}

#[test]
fn test_packbits_truncated_literal_is_error() {
    std::assert!(PackBitsHandler.decompress(&[0x05, 0x01, 0x02]).is_err());
}

#[test]
fn test_packbits_compresses_long_runs() {
    let mut data = vec![9u8; 300];
    data.extend_from_slice(&[1, 2, 3]);
    let encoded = PackBitsHandler.compress(&data).unwrap();
    std::assert!(encoded.len() < 12);
    std::assert_eq!(PackBitsHandler.decompress(&encoded).unwrap(), data);
}

#[test]
fn test_factory_maps_tiff_codes() {
    for (code, name) in [(1, "None"), (5, "LZW"), (8, "Deflate"), (32946, "Deflate"), (14, "ZSTD"), (32773, "PackBits")] {
        let handler = CompressionFactory::create_handler(code).unwrap();
        std::assert_eq!(handler.name(), name);
    }
    std::assert!(CompressionFactory::create_handler(7).is_err());
    std::assert!(CompressionFactory::create_handler(70_000).is_err());
}

#[test]
fn test_deflate_and_zstd_by_name() {
    let data = patterned_bytes(10_000);
    for name in ["deflate", "zstd", "none"] {
        let handler = CompressionFactory::get_handler_by_name(name).unwrap();
        let encoded = handler.compress(&data).unwrap();
        std::assert_eq!(handler.decompress(&encoded).unwrap(), data);
    }
    std::assert!(CompressionFactory::get_handler_by_name("jpeg").is_err());
}

#[test]
fn test_compression_levels_round_trip() {
    let data = patterned_bytes(50_000);
    for level in [0, 1, 9, 42] {
        let encoded = DeflateHandler::with_level(level).compress(&data).unwrap();
        std::assert_eq!(DeflateHandler::new().decompress(&encoded).unwrap(), data);
    }

    let zstd = ZstdHandler::with_level(19);
    std::assert_eq!(zstd.decompress(&zstd.compress(&data).unwrap()).unwrap(), data);
}
