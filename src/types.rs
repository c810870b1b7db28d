// ABOUTME: Defines the wire tag bytes and the fixed format limits.
// ABOUTME: Tag values map directly to the byte that opens every encoded value.

/// Tag bytes for encoded values.
pub mod tag {
    /// Null, no payload.
    pub const NULL: u8 = 0x00;
    /// Mapping: 1 count byte, then `count` key/value pairs.
    pub const MAPPING: u8 = 0x03;
    /// Opaque byte sequence: 1 length byte, then that many raw bytes.
    pub const BYTES: u8 = 0x04;
    /// UTF-8 string: 1 length byte, then that many bytes of UTF-8.
    pub const STRING: u8 = 0x06;
    /// Unsigned 64-bit integer: 8 bytes little-endian.
    pub const INTEGER: u8 = 0x07;
}

/// Limits of the wire format and default decoder limits.
pub mod limits {
    /// Largest mapping item count (single count byte).
    pub const MAX_COUNT: usize = u8::MAX as usize;

    /// Largest string or byte-sequence payload (single length byte).
    pub const MAX_LENGTH: usize = u8::MAX as usize;

    /// Default maximum mapping nesting depth.
    pub const MAX_DEPTH: usize = 128;

    /// Payload size of an integer.
    pub const INTEGER_SIZE: usize = 8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_distinct() {
        let tags = [tag::NULL, tag::MAPPING, tag::BYTES, tag::STRING, tag::INTEGER];
        for (i, a) in tags.iter().enumerate() {
            for b in &tags[i + 1..] {
                assert_ne!(a, b);
            }
        }
        // Bytes must never share the string tag
        assert_ne!(tag::BYTES, tag::STRING);
    }

    #[test]
    fn test_limits_follow_single_byte_fields() {
        assert_eq!(limits::MAX_COUNT, 255);
        assert_eq!(limits::MAX_LENGTH, 255);
    }
}
