//! Tests for the byte order module

extern crate std;

use std::io::Cursor;
use byteorder::{LittleEndian, BigEndian, WriteBytesExt};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler, LittleEndianHandler, BigEndianHandler};

#[test]
fn test_byte_order_detection() {
    let mut cursor = Cursor::new(vec![0x49, 0x49]);
    std::assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::LittleEndian);

    let mut cursor = Cursor::new(vec![0x4D, 0x4D]);
    std::assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::BigEndian);
}

#[test]
fn test_byte_order_detection_invalid() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    let mut cursor = Cursor::new(buffer);

    std::assert!(ByteOrder::detect(&mut cursor).is_err());
}

#[test]
fn test_handlers_read_their_own_order() {
    let mut buffer = Vec::new();
    buffer.write_u32::<BigEndian>(0xDEADBEEF).unwrap();
    buffer.write_f64::<BigEndian>(-12.5).unwrap();
    let mut cursor = Cursor::new(buffer);
    std::assert_eq!(BigEndianHandler.read_u32(&mut cursor).unwrap(), 0xDEADBEEF);
    std::assert_eq!(BigEndianHandler.read_f64(&mut cursor).unwrap(), -12.5);

    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0xABCD).unwrap();
    buffer.write_u32::<LittleEndian>(3).unwrap();
    buffer.write_u32::<LittleEndian>(4).unwrap();
    let mut cursor = Cursor::new(buffer);
    std::assert_eq!(LittleEndianHandler.read_u16(&mut cursor).unwrap(), 0xABCD);
    std::assert_eq!(LittleEndianHandler.read_rational(&mut cursor).unwrap(), (3, 4));
}

#[test]
fn test_samples_to_little_endian() {
    let mut data = vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0xFF];
    ByteOrder::BigEndian.samples_to_little_endian(&mut data, 4);
    std::assert_eq!(data, vec![0x04, 0x03, 0x02, 0x01, 0x08, 0x07, 0x06, 0x05, 0xFF]);

    let mut data = vec![0x01, 0x02];
    ByteOrder::LittleEndian.samples_to_little_endian(&mut data, 2);
    std::assert_eq!(data, vec![0x01, 0x02]);
}
