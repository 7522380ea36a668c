//! String helpers for ASCII tag payloads

/// Trims trailing NUL terminators from a byte buffer
pub fn trim_trailing_nulls(buffer: &mut Vec<u8>) {
    while buffer.last() == Some(&0) {
        buffer.pop();
    }
}

/// Decodes an ASCII tag payload, dropping NUL terminators and surrounding
/// whitespace. Invalid UTF-8 is replaced rather than rejected.
pub fn ascii_payload_to_string(mut buffer: Vec<u8>) -> String {
    trim_trailing_nulls(&mut buffer);
    String::from_utf8_lossy(&buffer).trim().to_string()
}
