// ABOUTME: Binary encoder writing tag-prefixed values to any io::Write.
// ABOUTME: Rejects counts, lengths and nesting the decoder would not accept.

use crate::error::{Error, Result};
use crate::types::{limits, tag};
use crate::value::Value;
use std::io::Write;

/// An encoder that writes values to a byte sink.
///
/// Mapping pairs are written by the caller after [`Encoder::begin_mapping`];
/// the count declared there is what a decoder will read back.
pub struct Encoder<W: Write> {
    writer: W,
    max_depth: usize,
}

impl<W: Write> Encoder<W> {
    /// Create a new encoder that writes to the given writer.
    pub fn new(writer: W) -> Self {
        Self::with_max_depth(writer, limits::MAX_DEPTH)
    }

    /// Create an encoder that accepts mappings nested up to `max_depth` deep.
    pub fn with_max_depth(writer: W, max_depth: usize) -> Self {
        Self { writer, max_depth }
    }

    /// Consume the encoder and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Get a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Write a single byte.
    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.writer.write_all(&[byte])?;
        Ok(())
    }

    /// Write a tag, a length byte and the payload.
    #[allow(clippy::cast_possible_truncation)] // Length checked before cast
    fn write_length_prefixed(&mut self, tc: u8, payload: &[u8]) -> Result<()> {
        if payload.len() > limits::MAX_LENGTH {
            return Err(Error::LengthOverflow {
                length: payload.len(),
            });
        }
        self.writer.write_all(&[tc, payload.len() as u8])?;
        self.writer.write_all(payload)?;
        Ok(())
    }

    /// Encode a null value.
    pub fn write_null(&mut self) -> Result<()> {
        self.write_byte(tag::NULL)
    }

    /// Encode an integer as 8 little-endian bytes.
    pub fn write_integer(&mut self, value: u64) -> Result<()> {
        let mut buf = [0u8; 1 + limits::INTEGER_SIZE];
        buf[0] = tag::INTEGER;
        buf[1..].copy_from_slice(&value.to_le_bytes());
        self.writer.write_all(&buf)?;
        Ok(())
    }

    /// Encode a string. Fails if it is longer than 255 bytes.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_length_prefixed(tag::STRING, value.as_bytes())
    }

    /// Encode an opaque byte sequence. Fails if it is longer than 255 bytes.
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.write_length_prefixed(tag::BYTES, value)
    }

    /// Write a mapping header announcing `count` pairs.
    #[allow(clippy::cast_possible_truncation)] // Count checked before cast
    pub fn begin_mapping(&mut self, count: usize) -> Result<()> {
        if count > limits::MAX_COUNT {
            return Err(Error::CountOverflow { count });
        }
        self.writer.write_all(&[tag::MAPPING, count as u8])?;
        Ok(())
    }

    /// Encode a complete value, recursing into mappings.
    ///
    /// The whole value is checked before the first byte is written, so a
    /// value that cannot be encoded leaves the writer untouched.
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        self.check_value(value, 0)?;
        self.write_checked(value)
    }

    /// Walk `value` looking for anything the format or the decoder rejects.
    fn check_value(&self, value: &Value, depth: usize) -> Result<()> {
        match value {
            Value::Null | Value::Integer(_) => Ok(()),
            Value::String(s) if s.len() > limits::MAX_LENGTH => {
                Err(Error::LengthOverflow { length: s.len() })
            }
            Value::Bytes(b) if b.len() > limits::MAX_LENGTH => {
                Err(Error::LengthOverflow { length: b.len() })
            }
            Value::String(_) | Value::Bytes(_) => Ok(()),
            Value::Mapping(m) => {
                if depth >= self.max_depth {
                    return Err(Error::NestingTooDeep {
                        max_depth: self.max_depth,
                    });
                }
                if m.len() > limits::MAX_COUNT {
                    return Err(Error::CountOverflow { count: m.len() });
                }
                for (key, val) in m {
                    self.check_value(key, depth + 1)?;
                    self.check_value(val, depth + 1)?;
                }
                Ok(())
            }
        }
    }

    fn write_checked(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.write_null(),
            Value::Integer(n) => self.write_integer(*n),
            Value::String(s) => self.write_str(s),
            Value::Bytes(b) => self.write_bytes(b),
            Value::Mapping(m) => {
                self.begin_mapping(m.len())?;
                for (key, val) in m {
                    self.write_checked(key)?;
                    self.write_checked(val)?;
                }
                Ok(())
            }
        }
    }

    /// Flush the underlying writer.
    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
