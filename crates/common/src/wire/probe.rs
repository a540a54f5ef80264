//! Top-level shape check for wire conversion
//!
//! Drives a record's `Serialize` impl far enough to learn which kind of value
//! it produces, without serializing any field. Only named-field structs are
//! accepted; `Option::Some` and newtype wrappers are looked through.

use std::fmt;

use serde::ser::{self, Impossible, Serialize};

/// Outcome of probing a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Record,
}

#[derive(Debug)]
pub(crate) enum ProbeError {
    Unsupported(&'static str),
    Custom(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(kind) => write!(f, "unsupported input kind: {kind}"),
            Self::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ProbeError {}

impl ser::Error for ProbeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Probe `value` and report whether it is a record
pub(crate) fn probe<T: Serialize + ?Sized>(value: &T) -> Result<Shape, ProbeError> {
    value.serialize(ShapeProbe)
}

struct ShapeProbe;

/// Accepts struct fields without looking at them
pub(crate) struct RecordFields;

impl ser::SerializeStruct for RecordFields {
    type Ok = Shape;
    type Error = ProbeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        _value: &T,
    ) -> Result<(), ProbeError> {
        Ok(())
    }

    fn skip_field(&mut self, _key: &'static str) -> Result<(), ProbeError> {
        Ok(())
    }

    fn end(self) -> Result<Shape, ProbeError> {
        Ok(Shape::Record)
    }
}

macro_rules! reject_scalar {
    ($($method:ident($ty:ty) => $kind:literal),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Result<Shape, ProbeError> {
                Err(ProbeError::Unsupported($kind))
            }
        )*
    };
}

impl ser::Serializer for ShapeProbe {
    type Ok = Shape;
    type Error = ProbeError;
    type SerializeSeq = Impossible<Shape, ProbeError>;
    type SerializeTuple = Impossible<Shape, ProbeError>;
    type SerializeTupleStruct = Impossible<Shape, ProbeError>;
    type SerializeTupleVariant = Impossible<Shape, ProbeError>;
    type SerializeMap = Impossible<Shape, ProbeError>;
    type SerializeStruct = RecordFields;
    type SerializeStructVariant = Impossible<Shape, ProbeError>;

    reject_scalar! {
        serialize_bool(bool) => "boolean",
        serialize_i8(i8) => "integer",
        serialize_i16(i16) => "integer",
        serialize_i32(i32) => "integer",
        serialize_i64(i64) => "integer",
        serialize_i128(i128) => "integer",
        serialize_u8(u8) => "integer",
        serialize_u16(u16) => "integer",
        serialize_u32(u32) => "integer",
        serialize_u64(u64) => "integer",
        serialize_u128(u128) => "integer",
        serialize_f32(f32) => "float",
        serialize_f64(f64) => "float",
        serialize_char(char) => "string",
        serialize_str(&str) => "string",
        serialize_bytes(&[u8]) => "bytes",
    }

    fn serialize_none(self) -> Result<Shape, ProbeError> {
        Err(ProbeError::Unsupported("null"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Shape, ProbeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Shape, ProbeError> {
        Err(ProbeError::Unsupported("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Shape, ProbeError> {
        Err(ProbeError::Unsupported("unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Shape, ProbeError> {
        Err(ProbeError::Unsupported("enum"))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Shape, ProbeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Shape, ProbeError> {
        Err(ProbeError::Unsupported("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, ProbeError> {
        Err(ProbeError::Unsupported("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, ProbeError> {
        Err(ProbeError::Unsupported("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, ProbeError> {
        Err(ProbeError::Unsupported("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, ProbeError> {
        Err(ProbeError::Unsupported("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, ProbeError> {
        Err(ProbeError::Unsupported("map"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, ProbeError> {
        Ok(RecordFields)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, ProbeError> {
        Err(ProbeError::Unsupported("enum"))
    }
}
