// ABOUTME: Error types for encoding and decoding.
// ABOUTME: Each variant carries the offset or size that made the input unrepresentable.

use std::fmt;

/// The result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during encoding or decoding.
///
/// All errors are terminal for the call that raised them: no partially
/// decoded value is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Tag byte is not one of the known tags.
    UnknownTag {
        /// The offending byte.
        tag: u8,
        /// Offset of the tag byte in the input.
        position: usize,
    },

    /// Input ended before a tag or declared payload could be read.
    ///
    /// Also known as `TruncatedInput(needed, available, position)`; the fields
    /// keep that order. Its [`Error::error_type`] is `"truncated"`.
    Truncated {
        /// Bytes required at `position`.
        needed: usize,
        /// Bytes actually left at `position`.
        available: usize,
        /// Offset where the read was attempted.
        position: usize,
    },

    /// String payload is not valid UTF-8.
    InvalidUtf8 {
        /// Offset of the first payload byte.
        position: usize,
    },

    /// Mapping has more pairs than the count byte can hold.
    CountOverflow {
        /// Number of pairs in the mapping.
        count: usize,
    },

    /// String or byte-sequence payload is longer than the length byte can hold.
    LengthOverflow {
        /// Payload length in bytes.
        length: usize,
    },

    /// Mapping nesting exceeded the configured limit, on decode or encode.
    NestingTooDeep {
        /// The configured limit.
        max_depth: usize,
    },

    /// Bytes remain after a complete top-level value and
    /// `DecoderConfig::allow_trailing_bytes` is off.
    TrailingBytes {
        /// Offset of the first unconsumed byte.
        position: usize,
    },

    /// Negative integer, which has no wire representation.
    ValueOutOfRange,

    /// Rust type with no wire representation (floats, bools, sequences).
    Unsupported(&'static str),

    /// IO error during encoding.
    Io(String),

    /// Custom error message (for serde integration).
    Custom(String),
}

impl Error {
    /// Returns a stable snake_case name for the error kind.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::UnknownTag { .. } => "unknown_tag",
            Error::Truncated { .. } => "truncated",
            Error::InvalidUtf8 { .. } => "invalid_utf8",
            Error::CountOverflow { .. } => "count_overflow",
            Error::LengthOverflow { .. } => "length_overflow",
            Error::NestingTooDeep { .. } => "nesting_too_deep",
            Error::TrailingBytes { .. } => "trailing_bytes",
            Error::ValueOutOfRange => "value_out_of_range",
            Error::Unsupported(_) => "unsupported",
            Error::Io(_) => "io_error",
            Error::Custom(_) => "custom",
        }
    }

    /// Input offset the error refers to, for decode errors.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::UnknownTag { position, .. }
            | Error::Truncated { position, .. }
            | Error::InvalidUtf8 { position }
            | Error::TrailingBytes { position } => Some(*position),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownTag { tag, position } => {
                write!(f, "unknown tag 0x{tag:02x} at offset {position}")
            }
            Error::Truncated {
                needed,
                available,
                position,
            } => write!(
                f,
                "truncated input at offset {position}: need {needed} bytes, {available} available"
            ),
            Error::InvalidUtf8 { position } => {
                write!(f, "invalid UTF-8 in string at offset {position}")
            }
            Error::CountOverflow { count } => {
                write!(f, "mapping has {count} pairs, at most 255 are encodable")
            }
            Error::LengthOverflow { length } => {
                write!(f, "payload is {length} bytes, at most 255 are encodable")
            }
            Error::NestingTooDeep { max_depth } => {
                write!(f, "mapping nesting exceeds maximum depth {max_depth}")
            }
            Error::TrailingBytes { position } => {
                write!(f, "trailing bytes after value at offset {position}")
            }
            Error::ValueOutOfRange => write!(f, "value out of range"),
            Error::Unsupported(what) => write!(f, "{what} has no wire representation"),
            Error::Io(msg) => write!(f, "I/O error: {msg}"),
            Error::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
