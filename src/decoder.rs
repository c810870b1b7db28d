// ABOUTME: Binary decoder over a borrowed byte slice.
// ABOUTME: Dispatches on the tag byte and tracks the read offset across nested mappings.

#![allow(clippy::missing_errors_doc)]

use crate::error::{Error, Result};
use crate::types::{limits, tag};
use crate::value::{Mapping, Value};

/// Validate and convert bytes to a UTF-8 string.
/// Uses simdutf8 for SIMD-accelerated validation when the feature is enabled.
#[cfg(feature = "simd-utf8")]
#[inline]
fn validate_utf8(bytes: &[u8]) -> Option<&str> {
    simdutf8::basic::from_utf8(bytes).ok()
}

#[cfg(not(feature = "simd-utf8"))]
#[inline]
fn validate_utf8(bytes: &[u8]) -> Option<&str> {
    std::str::from_utf8(bytes).ok()
}

/// Configuration options for the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Maximum mapping nesting depth
    pub max_depth: usize,
    /// Allow bytes after the top-level value (default: true).
    /// When false, [`Decoder::finish`] fails with `TrailingBytes`.
    pub allow_trailing_bytes: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: limits::MAX_DEPTH,
            allow_trailing_bytes: true,
        }
    }
}

/// A decoder that reads values from a byte slice.
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    /// Number of mappings currently open
    depth: usize,
    config: DecoderConfig,
}

/// One decoded tag and its payload.
///
/// Scalars borrow from the input. A mapping only yields its pair count; the
/// caller reads `2 * count` values and then calls [`Decoder::end_mapping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue<'a> {
    Null,
    Integer(u64),
    String(&'a str),
    Bytes(&'a [u8]),
    MappingStart(usize),
}

impl<'a> Decoder<'a> {
    /// Create a new decoder for the given data.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, DecoderConfig::default())
    }

    /// Create a new decoder with custom configuration.
    #[must_use]
    pub fn with_config(data: &'a [u8], config: DecoderConfig) -> Self {
        Self {
            data,
            pos: 0,
            depth: 0,
            config,
        }
    }

    /// Create a decoder that starts reading at `pos` instead of 0.
    ///
    /// `pos` may be past the end; the first read then fails with `Truncated`.
    #[must_use]
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        let mut decoder = Self::new(data);
        decoder.pos = pos;
        decoder
    }

    /// Get the current position in the input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the remaining bytes.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }

    /// Check if we've reached the end of input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Move the read offset to `pos`, keeping the current depth.
    pub(crate) fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// The input bytes between two offsets already read.
    pub(crate) fn span(&self, start: usize, end: usize) -> &'a [u8] {
        self.data.get(start..end).unwrap_or_default()
    }

    /// Number of mappings currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Get the decoder configuration.
    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    #[inline]
    fn available(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Read exactly n bytes.
    #[inline]
    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.available();
        if n > available {
            return Err(Error::Truncated {
                needed: n,
                available,
                position: self.pos,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Read a single byte, advancing position.
    #[inline]
    fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Peek at the next tag byte without consuming it.
    #[inline]
    pub fn peek_tag(&self) -> Result<u8> {
        self.data.get(self.pos).copied().ok_or(Error::Truncated {
            needed: 1,
            available: 0,
            position: self.pos,
        })
    }

    /// Read a length byte and then that many payload bytes.
    fn read_length_prefixed(&mut self) -> Result<&'a [u8]> {
        let len = self.read_byte()?;
        self.read_bytes(usize::from(len))
    }

    fn read_integer(&mut self) -> Result<u64> {
        let bytes = self.read_bytes(limits::INTEGER_SIZE)?;
        let mut buf = [0u8; limits::INTEGER_SIZE];
        buf.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }

    fn read_string(&mut self) -> Result<&'a str> {
        let bytes = self.read_length_prefixed()?;
        let position = self.pos - bytes.len();
        validate_utf8(bytes).ok_or(Error::InvalidUtf8 { position })
    }

    fn begin_mapping(&mut self) -> Result<usize> {
        if self.depth >= self.config.max_depth {
            log::debug!(
                "rejecting mapping at offset {}: depth limit {} reached",
                self.pos,
                self.config.max_depth
            );
            return Err(Error::NestingTooDeep {
                max_depth: self.config.max_depth,
            });
        }
        let count = usize::from(self.read_byte()?);
        self.depth += 1;
        Ok(count)
    }

    /// Close the innermost mapping opened by [`DecodedValue::MappingStart`].
    pub fn end_mapping(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Decode one tag and its scalar payload.
    pub fn decode_value(&mut self) -> Result<DecodedValue<'a>> {
        let position = self.pos;
        let tc = self.read_byte()?;
        match tc {
            tag::NULL => Ok(DecodedValue::Null),
            tag::INTEGER => self.read_integer().map(DecodedValue::Integer),
            tag::STRING => self.read_string().map(DecodedValue::String),
            tag::BYTES => self.read_length_prefixed().map(DecodedValue::Bytes),
            tag::MAPPING => self.begin_mapping().map(DecodedValue::MappingStart),
            _ => Err(Error::UnknownTag { tag: tc, position }),
        }
    }

    /// Decode one complete value, recursing into mappings.
    pub fn read_value(&mut self) -> Result<Value> {
        match self.decode_value()? {
            DecodedValue::Null => Ok(Value::Null),
            DecodedValue::Integer(n) => Ok(Value::Integer(n)),
            DecodedValue::String(s) => Ok(Value::String(s.to_owned())),
            DecodedValue::Bytes(b) => Ok(Value::Bytes(b.to_vec())),
            DecodedValue::MappingStart(count) => {
                let mut mapping = Mapping::with_capacity(count);
                for _ in 0..count {
                    let key = self.read_value()?;
                    let value = self.read_value()?;
                    mapping.push(key, value);
                }
                self.end_mapping();
                Ok(Value::Mapping(mapping))
            }
        }
    }

    /// Validate and step over one complete value without building it.
    pub fn skip_value(&mut self) -> Result<()> {
        if let DecodedValue::MappingStart(count) = self.decode_value()? {
            for _ in 0..count * 2 {
                self.skip_value()?;
            }
            self.end_mapping();
        }
        Ok(())
    }

    /// Finish decoding and check for errors.
    pub fn finish(&self) -> Result<()> {
        if !self.config.allow_trailing_bytes && self.pos < self.data.len() {
            log::debug!(
                "rejecting {} trailing bytes at offset {}",
                self.data.len() - self.pos,
                self.pos
            );
            return Err(Error::TrailingBytes { position: self.pos });
        }
        Ok(())
    }
}
