// ABOUTME: Decoder and encoder for a compact tag-prefixed binary format.
// ABOUTME: Provides a Value-based codec plus serde integration with a serde_json-like API.

//! # serde_octets
//!
//! A strict decoder and encoder for a small, self-describing binary format.
//! Every encoded value is a one-byte tag followed by its payload:
//!
//! | Tag    | Value   | Payload                                           |
//! |--------|---------|---------------------------------------------------|
//! | `0x00` | Null    | none                                              |
//! | `0x03` | Mapping | count byte `n`, then `n` key/value pairs          |
//! | `0x04` | Bytes   | length byte `L`, then `L` opaque bytes            |
//! | `0x06` | String  | length byte `L`, then `L` bytes of UTF-8          |
//! | `0x07` | Integer | 8 bytes, little-endian unsigned                   |
//!
//! Counts and lengths are single bytes, so mappings hold at most 255 pairs
//! and strings or byte sequences at most 255 bytes.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_octets::{decode, encode, octets};
//!
//! let value = octets!({
//!     "null": null,
//!     "octets": b"\x01\x02\x03",
//!     "integer": 12345u64
//! });
//!
//! let bytes = encode(&value).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```
//!
//! ## Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_octets::{from_slice, to_vec};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Peer {
//!     name: String,
//!     port: u16,
//!     token: Option<u64>,
//! }
//!
//! let peer = Peer { name: "alpha".into(), port: 6881, token: None };
//! let bytes = to_vec(&peer).unwrap();
//! assert_eq!(from_slice::<Peer>(&bytes).unwrap(), peer);
//! ```
//!
//! ## Strictness
//!
//! - Invalid UTF-8 in a string is an error, never replaced.
//! - Unknown tags and truncated payloads are errors. Bytes after the first
//!   top-level value are ignored unless
//!   [`DecoderConfig::allow_trailing_bytes`] is turned off.
//! - Mapping nesting is bounded by [`DecoderConfig::max_depth`].
//! - Mappings keep wire order and duplicate keys; key lookups take the last pair.

pub mod de;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod ser;
pub mod types;
pub mod value;

// Re-export commonly used items at the crate root
pub use de::{from_slice, from_slice_with_config, Deserializer};
pub use decoder::{DecodedValue, Decoder, DecoderConfig};
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use ser::{to_value, Serializer};
pub use types::{limits, tag};
pub use value::{Mapping, Value};

// The octets! macro is automatically exported at crate root via #[macro_export]

use serde::{Deserialize, Serialize};
use std::io::Write;

/// Decode one complete value. An empty slice decodes to [`Value::Null`].
///
/// # Example
///
/// ```rust
/// use serde_octets::{decode, Value};
///
/// let bytes = [0x07, 0x2a, 0, 0, 0, 0, 0, 0, 0];
/// assert_eq!(decode(&bytes).unwrap(), Value::Integer(42));
/// assert_eq!(decode(&[]).unwrap(), Value::Null);
/// ```
pub fn decode(data: &[u8]) -> Result<Value> {
    decode_with_config(data, DecoderConfig::default())
}

/// Decode one complete value with custom configuration.
pub fn decode_with_config(data: &[u8], config: DecoderConfig) -> Result<Value> {
    log::trace!("decoding {} bytes", data.len());
    if data.is_empty() {
        return Ok(Value::Null);
    }
    let mut decoder = Decoder::with_config(data, config);
    let value = decoder.read_value()?;
    decoder.finish()?;
    Ok(value)
}

/// Decode the value starting at `pos`, returning it with the offset just past it.
///
/// The difference between the returned offset and `pos` is exactly the number
/// of bytes the value occupies, nested values included. Bytes after the value
/// are left alone, and `pos == data.len()` is an error rather than null.
///
/// # Example
///
/// ```rust
/// use serde_octets::{decode_one, Value};
///
/// let bytes = [0x00, 0x06, 0x01, b'x', 0x00];
/// let (value, next) = decode_one(&bytes, 1).unwrap();
/// assert_eq!(value, Value::from("x"));
/// assert_eq!(next, 4);
/// ```
pub fn decode_one(data: &[u8], pos: usize) -> Result<(Value, usize)> {
    let mut decoder = Decoder::at(data, pos);
    let value = decoder.read_value()?;
    Ok((value, decoder.position()))
}

/// Encode a `Value` to bytes.
///
/// Fails without producing output if a count or length exceeds 255, or if
/// mappings nest deeper than [`limits::MAX_DEPTH`], which the default decoder
/// would refuse.
///
/// # Example
///
/// ```rust
/// use serde_octets::{encode, Value};
///
/// let bytes = encode(&Value::from("hi")).unwrap();
/// assert_eq!(bytes, vec![0x06, 0x02, b'h', b'i']);
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(value.encoded_len());
    encode_to_writer(&mut buf, value)?;
    Ok(buf)
}

/// Encode a `Value` to a writer.
///
/// The value is checked in full first; on an encoding error nothing has been
/// written. An I/O error can still leave a partial value behind.
pub fn encode_to_writer<W: Write>(writer: W, value: &Value) -> Result<()> {
    log::trace!("encoding {} value", value.type_name());
    let mut encoder = Encoder::new(writer);
    encoder.write_value(value)?;
    encoder.finish()
}

/// Serialize a value to a byte vector.
///
/// # Example
///
/// ```rust
/// use serde_octets::to_vec;
///
/// let bytes = to_vec(&"hi").unwrap();
/// assert_eq!(bytes, vec![0x06, 0x02, b'h', b'i']);
/// ```
pub fn to_vec<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>> {
    encode(&to_value(value)?)
}

/// Serialize a value to a writer.
pub fn to_writer<W: Write, T: ?Sized + Serialize>(writer: W, value: &T) -> Result<()> {
    encode_to_writer(writer, &to_value(value)?)
}

// Implement Serialize for Value
impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Integer(n) => serializer.serialize_u64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Mapping(m) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (key, val) in m {
                    map.serialize_entry(key, val)?;
                }
                map.end()
            }
        }
    }
}

// Implement Deserialize for Value
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> serde::de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "null, a mapping, a string, bytes or an unsigned integer")
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Value, E> {
                Ok(Value::Integer(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<Value, E> {
                u64::try_from(v)
                    .map(Value::Integer)
                    .map_err(|_| E::custom(Error::ValueOutOfRange))
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Value, E> {
                Ok(Value::String(v.to_owned()))
            }

            fn visit_string<E>(self, v: String) -> std::result::Result<Value, E> {
                Ok(Value::String(v))
            }

            fn visit_bytes<E>(self, v: &[u8]) -> std::result::Result<Value, E> {
                Ok(Value::Bytes(v.to_vec()))
            }

            fn visit_byte_buf<E>(self, v: Vec<u8>) -> std::result::Result<Value, E> {
                Ok(Value::Bytes(v))
            }

            fn visit_unit<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D: serde::Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> std::result::Result<Value, D::Error> {
                Deserialize::deserialize(deserializer)
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Value, A::Error> {
                let mut mapping = Mapping::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, val)) = map.next_entry::<Value, Value>()? {
                    mapping.push(key, val);
                }
                Ok(Value::Mapping(mapping))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::octets;

    #[test]
    fn test_roundtrip_primitives() {
        let bytes = to_vec(&42u32).unwrap();
        let decoded: u32 = from_slice(&bytes).unwrap();
        assert_eq!(decoded, 42);

        let bytes = to_vec(&"hello").unwrap();
        let decoded: String = from_slice(&bytes).unwrap();
        assert_eq!(decoded, "hello");

        let bytes = to_vec(&None::<u64>).unwrap();
        assert_eq!(bytes, vec![0x00]);
    }

    #[test]
    fn test_roundtrip_struct() {
        #[derive(Debug, Serialize, Deserialize, PartialEq)]
        struct Person {
            name: String,
            age: u32,
            nickname: Option<String>,
        }

        let original = Person {
            name: "Alice".to_string(),
            age: 30,
            nickname: Some("Al".to_string()),
        };

        let bytes = to_vec(&original).unwrap();
        let decoded: Person = from_slice(&bytes).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_value_roundtrip() {
        let value = octets!({
            "name": "test",
            "raw": b"\x00\xff",
            "nested": {
                "n": 7u64,
                "none": null
            }
        });

        let bytes = encode(&value).unwrap();
        assert_eq!(bytes.len(), value.encoded_len());
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_value_through_serde() {
        let value = octets!({ "k": b"\x01", 3u64: "three", "z": null });
        let bytes = to_vec(&value).unwrap();
        assert_eq!(bytes, encode(&value).unwrap());
        let back: Value = from_slice(&bytes).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_value_to_json() {
        let value = octets!({ "name": "x", "n": 5u64, "z": null });
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "x", "n": 5, "z": null }));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        // The first value wins, the rest is ignored
        assert_eq!(decode(&[0x00, 0x00]).unwrap(), Value::Null);
        assert_eq!(
            decode(&[0x07, 1, 0, 0, 0, 0, 0, 0, 0, 0xab]).unwrap(),
            Value::Integer(1)
        );

        let config = DecoderConfig {
            allow_trailing_bytes: false,
            ..DecoderConfig::default()
        };
        assert_eq!(
            decode_with_config(&[0x00, 0x00], config),
            Err(Error::TrailingBytes { position: 1 })
        );
    }

    #[test]
    fn test_encode_to_writer_leaves_sink_empty_on_error() {
        let value = octets!({ "a": null, "b": (vec![0u8; 300]) });
        let mut sink = Vec::new();
        assert_eq!(
            encode_to_writer(&mut sink, &value),
            Err(Error::LengthOverflow { length: 300 })
        );
        assert!(sink.is_empty());

        #[derive(Serialize)]
        struct Note {
            title: String,
            body: String,
        }
        let note = Note {
            title: "t".to_string(),
            body: "b".repeat(256),
        };
        assert_eq!(
            to_writer(&mut sink, &note),
            Err(Error::LengthOverflow { length: 256 })
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_decode_one_past_end() {
        assert_eq!(
            decode_one(&[], 0),
            Err(Error::Truncated {
                needed: 1,
                available: 0,
                position: 0
            })
        );
    }

    #[test]
    fn test_to_writer() {
        let mut buf = Vec::new();
        to_writer(&mut buf, &7u8).unwrap();
        assert_eq!(buf, vec![0x07, 7, 0, 0, 0, 0, 0, 0, 0]);
    }
}
