// ABOUTME: Dynamic value type covering the five wire types.
// ABOUTME: Mappings keep wire order and duplicates so decode/encode is byte-exact.

use crate::types::limits;
use std::fmt;

/// A decoded value.
///
/// The variant is fixed by the tag byte that opened it on the wire. Values own
/// their children; there is no sharing between siblings.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub enum Value {
    /// Null (tag 0x00)
    #[default]
    Null,
    /// Ordered key/value pairs (tag 0x03)
    Mapping(Mapping),
    /// UTF-8 text of at most 255 bytes (tag 0x06)
    String(String),
    /// Opaque bytes, at most 255 of them (tag 0x04)
    Bytes(Vec<u8>),
    /// Unsigned 64-bit integer (tag 0x07)
    Integer(u64),
}

impl Value {
    /// Returns true if this value is null.
    #[must_use] pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value is a mapping.
    #[must_use] pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Returns true if this value is a string.
    #[must_use] pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this value is a byte sequence.
    #[must_use] pub fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    /// Returns true if this value is an integer.
    #[must_use] pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// If this is a string, returns a reference to it.
    #[must_use] pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If this is a byte sequence, returns a reference to it.
    #[must_use] pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// If this is an integer, returns it.
    #[must_use] pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// If this is a mapping, returns a reference to it.
    #[must_use] pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// If this is a mapping, returns a mutable reference to it.
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a string key in a mapping. The last matching pair wins.
    #[must_use] pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get_key(key))
    }

    /// Name of the variant, as used in error messages.
    #[must_use] pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Mapping(_) => "mapping",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Integer(_) => "integer",
        }
    }

    /// Number of bytes this value occupies on the wire, tag included.
    ///
    /// For values within the wire limits this equals `encode(self)?.len()`
    /// and the position advance `decode_one` reports for the same bytes.
    #[must_use] pub fn encoded_len(&self) -> usize {
        match self {
            Value::Null => 1,
            Value::Integer(_) => 1 + limits::INTEGER_SIZE,
            Value::String(s) => 2 + s.len(),
            Value::Bytes(b) => 2 + b.len(),
            Value::Mapping(m) => {
                2 + m
                    .iter()
                    .map(|(k, v)| k.encoded_len() + v.encoded_len())
                    .sum::<usize>()
            }
        }
    }
}

/// An ordered sequence of key/value pairs.
///
/// Order and duplicates are preserved exactly as they appear on the wire.
/// Lookups that need a single answer per key return the last pair.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Mapping {
    entries: Vec<(Value, Value)>,
}

impl Mapping {
    /// Create an empty mapping.
    #[must_use] pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mapping with room for `capacity` pairs.
    #[must_use] pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Number of pairs, duplicates included.
    #[must_use] pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use] pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a pair. Existing pairs with the same key are kept.
    pub fn push(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Iterate pairs in wire order.
    pub fn iter(&self) -> std::slice::Iter<'_, (Value, Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Value of the last pair whose key equals `key`.
    #[must_use] pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Value of the last pair whose key is the string `key`.
    #[must_use] pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Consume the mapping, returning its pairs in wire order.
    #[must_use] pub fn into_inner(self) -> Vec<(Value, Value)> {
        self.entries
    }
}

impl From<Vec<(Value, Value)>> for Mapping {
    fn from(entries: Vec<(Value, Value)>) -> Self {
        Self { entries }
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl IntoIterator for Mapping {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a (Value, Value);
    type IntoIter = std::slice::Iter<'a, (Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Integer(n) => write!(f, "Integer({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Bytes(b) => write!(f, "Bytes({b:?})"),
            Value::Mapping(m) => f.debug_tuple("Mapping").field(m).finish(),
        }
    }
}

// Human-readable output (JSON-like, bytes as hex)
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "\"{}\"", s.escape_default()),
            Value::Bytes(b) => {
                write!(f, "<")?;
                for (i, byte) in b.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{byte:02x}")?;
                }
                write!(f, ">")
            }
            Value::Mapping(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

impl From<u8> for Value {
    fn from(n: u8) -> Self {
        Value::Integer(u64::from(n))
    }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self {
        Value::Integer(u64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(u64::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Integer(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(b: &[u8; N]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Mapping(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Macro for building values.
///
/// Mapping pairs keep the order they are written in. Integer literals need a
/// suffix (`42u64`) since only unsigned types convert into a value.
///
/// # Examples
///
/// ```rust
/// use serde_octets::octets;
///
/// let value = octets!({
///     "null": null,
///     "octets": b"\x01\x02\x03",
///     "integer": 12345u64
/// });
/// assert_eq!(value.get_key("integer").and_then(|v| v.as_u64()), Some(12345));
/// ```
#[macro_export]
macro_rules! octets {
    // null
    (null) => {
        $crate::Value::Null
    };

    // mapping
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            #[allow(unused_mut)]
            let mut mapping = $crate::Mapping::new();
            $(
                mapping.push($crate::octets!($key), $crate::octets!($value));
            )*
            $crate::Value::Mapping(mapping)
        }
    };

    // other expressions (integers, strings, bytes)
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::octets;

    #[test]
    fn test_value_types() {
        assert!(Value::Null.is_null());
        assert!(Value::Integer(7).is_integer());
        assert!(Value::String("hello".into()).is_string());
        assert!(Value::Bytes(vec![1]).is_bytes());
        assert!(Value::Mapping(Mapping::new()).is_mapping());
        assert_eq!(Value::default(), Value::Null);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(42).as_u64(), Some(42));
        assert_eq!(Value::String("hi".into()).as_str(), Some("hi"));
        assert_eq!(Value::Bytes(vec![1, 2]).as_bytes(), Some(&[1u8, 2][..]));
        assert_eq!(Value::Integer(42).as_str(), None);
        assert_eq!(Value::Null.type_name(), "null");
    }

    #[test]
    fn test_mapping_preserves_order_and_duplicates() {
        let mut m = Mapping::new();
        m.push("b", 1u64);
        m.push("a", 2u64);
        m.push("b", 3u64);

        assert_eq!(m.len(), 3);
        let keys: Vec<_> = m.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, ["b", "a", "b"]);
        // Last pair wins for key-unique lookups
        assert_eq!(m.get_key("b"), Some(&Value::Integer(3)));
        assert_eq!(m.get(&Value::from("a")), Some(&Value::Integer(2)));
        assert_eq!(m.get_key("missing"), None);
    }

    #[test]
    fn test_mapping_non_string_keys() {
        let m: Mapping = vec![(Value::Integer(1), Value::from("one"))].into();
        assert_eq!(m.get(&Value::Integer(1)).and_then(Value::as_str), Some("one"));
        assert_eq!(m.get_key("1"), None);
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(Value::Null.encoded_len(), 1);
        assert_eq!(Value::Integer(0).encoded_len(), 9);
        assert_eq!(Value::from("null").encoded_len(), 6);
        assert_eq!(Value::Bytes(vec![]).encoded_len(), 2);

        let v = octets!({ "a": null, "b": 1u64 });
        // tag + count + ("a" 3 + null 1) + ("b" 3 + integer 9)
        assert_eq!(v.encoded_len(), 2 + 4 + 12);
    }

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from(5u8), Value::Integer(5));
        assert_eq!(Value::from(u64::MAX), Value::Integer(u64::MAX));
        assert_eq!(Value::from(b"\x01\x02"), Value::Bytes(vec![1, 2]));
        assert_eq!(Value::from(None::<u64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::String("x".into()));
        assert_eq!(Value::from(()), Value::Null);
    }

    #[test]
    fn test_octets_macro() {
        let v = octets!(null);
        assert!(v.is_null());

        let v = octets!({
            "outer": {
                "inner": b"\x01\x02\x03",
                "value": 42u64
            }
        });
        let outer = v.get_key("outer").unwrap();
        assert_eq!(outer.get_key("value").and_then(Value::as_u64), Some(42));
        assert_eq!(outer.get_key("inner").and_then(Value::as_bytes), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_display() {
        let v = octets!({ "name": "x", "raw": b"\x0a\xff", "n": 3u64, "z": null });
        assert_eq!(v.to_string(), r#"{"name": "x", "raw": <0a ff>, "n": 3, "z": null}"#);
    }
}
