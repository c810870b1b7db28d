// ABOUTME: Serde Deserializer that reads straight from the binary decoder.
// ABOUTME: Mapping counts are known up front, so map access yields exactly that many pairs.

use crate::decoder::{DecodedValue, Decoder, DecoderConfig};
use crate::error::{Error, Result};
use crate::types::tag;
use serde::de::{self, DeserializeSeed, IntoDeserializer, MapAccess, Visitor};
use serde::Deserialize;

/// A serde Deserializer over encoded bytes.
pub struct Deserializer<'de> {
    decoder: Decoder<'de>,
}

impl<'de> Deserializer<'de> {
    /// Create a new Deserializer from a byte slice.
    #[must_use] pub fn from_slice(data: &'de [u8]) -> Self {
        Self {
            decoder: Decoder::new(data),
        }
    }

    /// Create a new Deserializer with custom configuration.
    #[must_use] pub fn from_slice_with_config(data: &'de [u8], config: DecoderConfig) -> Self {
        Self {
            decoder: Decoder::with_config(data, config),
        }
    }

    /// Get the underlying decoder (consumes self).
    #[must_use] pub fn into_decoder(self) -> Decoder<'de> {
        self.decoder
    }

    /// Hand a freshly opened mapping's pairs to the visitor.
    fn visit_mapping<V: Visitor<'de>>(&mut self, count: usize, visitor: V) -> Result<V::Value> {
        let mut access = MappingAccess {
            de: self,
            remaining: count,
        };
        let value = visitor.visit_map(&mut access)?;
        if access.remaining > 0 {
            return Err(Error::Custom(format!(
                "{} mapping pairs left unread",
                access.remaining
            )));
        }
        self.decoder.end_mapping();
        Ok(value)
    }

    /// Hand a mapping's pairs to a struct visitor, one pair per distinct key.
    ///
    /// A first pass validates every pair and keeps the offsets of the last
    /// pair seen for each key. Keys compare by their encoded bytes.
    fn visit_struct_mapping<V: Visitor<'de>>(
        &mut self,
        count: usize,
        visitor: V,
    ) -> Result<V::Value> {
        // (key offset, value offset) per distinct key, in first-seen order
        let mut pairs: Vec<(usize, usize)> = Vec::with_capacity(count);
        for _ in 0..count {
            let key_pos = self.decoder.position();
            self.decoder.skip_value()?;
            let value_pos = self.decoder.position();
            self.decoder.skip_value()?;

            let key = self.decoder.span(key_pos, value_pos);
            let decoder = &self.decoder;
            match pairs
                .iter_mut()
                .find(|(k, v)| decoder.span(*k, *v) == key)
            {
                Some(pair) => *pair = (key_pos, value_pos),
                None => pairs.push((key_pos, value_pos)),
            }
        }
        let end = self.decoder.position();

        let value = visitor.visit_map(StructAccess {
            de: &mut *self,
            pairs: pairs.into_iter(),
            value_pos: end,
        })?;
        self.decoder.seek(end);
        self.decoder.end_mapping();
        Ok(value)
    }

    fn visit_decoded<V: Visitor<'de>>(
        &mut self,
        decoded: DecodedValue<'de>,
        visitor: V,
    ) -> Result<V::Value> {
        match decoded {
            DecodedValue::Null => visitor.visit_unit(),
            DecodedValue::Integer(n) => visitor.visit_u64(n),
            DecodedValue::String(s) => visitor.visit_borrowed_str(s),
            DecodedValue::Bytes(b) => visitor.visit_borrowed_bytes(b),
            DecodedValue::MappingStart(count) => self.visit_mapping(count, visitor),
        }
    }
}

/// Deserialize a value from a byte slice.
///
/// An empty slice deserializes as null, so it yields `None` or `()`.
///
/// # Errors
///
/// Returns an error if:
/// - The data is malformed or truncated
/// - Mappings nest deeper than the default limit
/// - The data doesn't match the expected type `T`
/// - There are trailing bytes and the config disallows them
pub fn from_slice<'de, T: Deserialize<'de>>(data: &'de [u8]) -> Result<T> {
    from_slice_with_config(data, DecoderConfig::default())
}

/// Deserialize a value from a byte slice with custom configuration.
///
/// # Errors
///
/// As [`from_slice`], with the limits taken from `config`.
pub fn from_slice_with_config<'de, T: Deserialize<'de>>(
    data: &'de [u8],
    config: DecoderConfig,
) -> Result<T> {
    if data.is_empty() {
        return T::deserialize(<() as IntoDeserializer<'de, Error>>::into_deserializer(()));
    }
    let mut de = Deserializer::from_slice_with_config(data, config);
    let value = T::deserialize(&mut de)?;
    de.decoder.finish()?;
    Ok(value)
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let decoded = self.decoder.decode_value()?;
        self.visit_decoded(decoded, visitor)
    }

    /// Repeated fields resolve to the last pair instead of a duplicate-field error.
    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.decoder.decode_value()? {
            DecodedValue::MappingStart(count) => self.visit_struct_mapping(count, visitor),
            other => self.visit_decoded(other, visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.decoder.peek_tag()? == tag::NULL {
            self.decoder.decode_value()?;
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.decoder.decode_value()? {
            DecodedValue::String(s) => {
                let variant: de::value::StrDeserializer<'_, Error> = s.into_deserializer();
                visitor.visit_enum(variant)
            }
            DecodedValue::MappingStart(1) => {
                let value = visitor.visit_enum(EnumAccess { de: &mut *self })?;
                self.decoder.end_mapping();
                Ok(value)
            }
            DecodedValue::MappingStart(count) => Err(Error::Custom(format!(
                "expected enum mapping with one pair, found {count}"
            ))),
            _ => Err(Error::Custom(
                "expected string or mapping for enum".to_string(),
            )),
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map
        identifier ignored_any
    }
}

/// Yields the pairs of one mapping, counting down from its declared size.
struct MappingAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    remaining: usize,
}

impl<'de> MapAccess<'de> for MappingAccess<'_, 'de> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        seed.deserialize(&mut *self.de)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Replays the deduplicated pairs of a struct mapping by seeking to each one.
struct StructAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    pairs: std::vec::IntoIter<(usize, usize)>,
    value_pos: usize,
}

impl<'de> MapAccess<'de> for StructAccess<'_, 'de> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        let Some((key_pos, value_pos)) = self.pairs.next() else {
            return Ok(None);
        };
        self.de.decoder.seek(key_pos);
        self.value_pos = value_pos;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        self.de.decoder.seek(self.value_pos);
        seed.deserialize(&mut *self.de)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.pairs.len())
    }
}

/// Reads a `{variant: content}` mapping.
struct EnumAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
}

impl<'de> de::EnumAccess<'de> for EnumAccess<'_, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self)> {
        let variant = seed.deserialize(&mut *self.de)?;
        Ok((variant, self))
    }
}

impl<'de> de::VariantAccess<'de> for EnumAccess<'_, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        <()>::deserialize(&mut *self.de)
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported("tuple variant"))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_struct(&mut *self.de, "", fields, visitor)
    }
}
