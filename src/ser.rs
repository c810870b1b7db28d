// ABOUTME: Serde Serializer that builds a Value from any serializable Rust type.
// ABOUTME: Mapping counts must precede their pairs, so serialization goes through a Value tree.

use crate::error::{Error, Result};
use crate::value::{Mapping, Value};
use serde::ser::{self, Impossible, Serialize};

/// A serde Serializer whose output is a [`Value`].
///
/// Types without a wire form (bools, floats, sequences) are rejected with
/// [`Error::Unsupported`]; negative integers with [`Error::ValueOutOfRange`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer;

/// Convert any serializable type into a [`Value`].
pub fn to_value<T: ?Sized + Serialize>(value: &T) -> Result<Value> {
    value.serialize(Serializer)
}

fn from_signed(v: i64) -> Result<Value> {
    u64::try_from(v)
        .map(Value::Integer)
        .map_err(|_| Error::ValueOutOfRange)
}

impl ser::Serializer for Serializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = Impossible<Value, Error>;
    type SerializeTuple = Impossible<Value, Error>;
    type SerializeTupleStruct = Impossible<Value, Error>;
    type SerializeTupleVariant = Impossible<Value, Error>;
    type SerializeMap = SerializeMapping;
    type SerializeStruct = SerializeMapping;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, _v: bool) -> Result<Value> {
        Err(Error::Unsupported("bool"))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        from_signed(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        from_signed(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        from_signed(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        from_signed(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(u64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(u64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(u64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_f32(self, _v: f32) -> Result<Value> {
        Err(Error::Unsupported("floating point"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Value> {
        Err(Error::Unsupported("floating point"))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value> {
        let mut mapping = Mapping::with_capacity(1);
        mapping.push(variant, value.serialize(self)?);
        Ok(Value::Mapping(mapping))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::Unsupported("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::Unsupported("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::Unsupported("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::Unsupported("tuple variant"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(SerializeMapping {
            mapping: Mapping::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            mapping: Mapping::with_capacity(len),
        })
    }
}

/// Collects map entries or struct fields into a [`Mapping`].
pub struct SerializeMapping {
    mapping: Mapping,
    next_key: Option<Value>,
}

impl ser::SerializeMap for SerializeMapping {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.next_key = Some(key.serialize(Serializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::Custom("map value serialized before its key".into()))?;
        self.mapping.push(key, value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Mapping(self.mapping))
    }
}

impl ser::SerializeStruct for SerializeMapping {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.mapping.push(key, value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Mapping(self.mapping))
    }
}

/// Collects struct-variant fields, then wraps them as `{variant: {fields}}`.
pub struct SerializeStructVariant {
    variant: &'static str,
    mapping: Mapping,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.mapping.push(key, value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut outer = Mapping::with_capacity(1);
        outer.push(self.variant, Value::Mapping(self.mapping));
        Ok(Value::Mapping(outer))
    }
}
