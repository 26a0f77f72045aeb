// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in type kinds.

use super::registry::KindDecoder;
use super::{required_field, DataType, Requirements, TypeDescriptor};
use crate::error::TypeError;
use crate::value::DynamicValue;
use serde_json::{json, Map, Number, Value as Json};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Library required to interpret numeric array kinds.
const NUMERIC_LIBRARY: &str = "ndarray";

pub(crate) fn builtin_kinds() -> Vec<(&'static str, KindDecoder)> {
    vec![
        (PrimitiveType::TAG, Arc::new(PrimitiveType::decode) as KindDecoder),
        (ListType::TAG, Arc::new(ListType::decode) as KindDecoder),
        (DictType::TAG, Arc::new(DictType::decode) as KindDecoder),
        (NumberType::TAG, Arc::new(NumberType::decode) as KindDecoder),
        (NdarrayType::TAG, Arc::new(NdarrayType::decode) as KindDecoder),
    ]
}

impl TypeDescriptor {
    /// Create a primitive type descriptor.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(PrimitiveType::new(kind))
    }

    /// Create a variable-length list descriptor.
    pub fn list(dtype: TypeDescriptor) -> Self {
        Self::new(ListType::new(dtype, None))
    }

    /// Create a numeric scalar descriptor.
    pub fn number(kind: NumberKind) -> Self {
        Self::new(NumberType::new(kind))
    }
}

// ---------------------------------------------------------------------------
// primitive
// ---------------------------------------------------------------------------

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Int,
    Float,
    Str,
    Bool,
    /// The unit/absent value, spelled `"none"` on the wire.
    Null,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bool => "bool",
            Self::Null => "none",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "str" => Some(Self::Str),
            "bool" => Some(Self::Bool),
            "none" => Some(Self::Null),
            _ => None,
        }
    }
}

/// Scalar of a [`PrimitiveKind`]. Wire: `{"type": "primitive", "ptype": "int"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveType {
    ptype: PrimitiveKind,
}

impl PrimitiveType {
    pub const TAG: &'static str = "primitive";

    pub fn new(ptype: PrimitiveKind) -> Self {
        Self { ptype }
    }

    pub fn ptype(&self) -> PrimitiveKind {
        self.ptype
    }

    fn decode(fields: &Map<String, Json>) -> Result<TypeDescriptor, TypeError> {
        let raw = required_field(Self::TAG, fields, "ptype")?;
        let ptype = raw
            .as_str()
            .and_then(PrimitiveKind::parse)
            .ok_or_else(|| TypeError::invalid(Self::TAG, format!("unknown ptype {}", raw)))?;
        Ok(TypeDescriptor::new(Self::new(ptype)))
    }

    fn mismatch(&self, got: &str) -> String {
        format!("expected {}, got {}", self.ptype.as_str(), got)
    }
}

impl DataType for PrimitiveType {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn fields(&self) -> Map<String, Json> {
        let mut map = Map::new();
        map.insert("ptype".to_string(), json!(self.ptype.as_str()));
        map
    }

    fn serialize(&self, value: &DynamicValue) -> Result<Json, TypeError> {
        let err = || TypeError::serialization(Self::TAG, self.mismatch(value.kind_name()));
        match self.ptype {
            PrimitiveKind::Int => match value {
                DynamicValue::I64(v) => Ok(Json::from(*v)),
                DynamicValue::U64(v) => Ok(Json::from(*v)),
                _ => Err(err()),
            },
            PrimitiveKind::Float => {
                let v = value.as_f64().ok_or_else(err)?;
                Number::from_f64(v)
                    .map(Json::Number)
                    .ok_or_else(|| TypeError::serialization(Self::TAG, "float is not finite"))
            }
            PrimitiveKind::Str => value.as_str().map(Json::from).ok_or_else(err),
            PrimitiveKind::Bool => value.as_bool().map(Json::Bool).ok_or_else(err),
            PrimitiveKind::Null if value.is_null() => Ok(Json::Null),
            PrimitiveKind::Null => Err(err()),
        }
    }

    fn deserialize(&self, wire: &Json) -> Result<DynamicValue, TypeError> {
        let err = || TypeError::deserialization(Self::TAG, self.mismatch(&wire.to_string()));
        match self.ptype {
            PrimitiveKind::Int => wire
                .as_i64()
                .map(DynamicValue::I64)
                .or_else(|| wire.as_u64().map(DynamicValue::U64))
                .ok_or_else(err),
            PrimitiveKind::Float => wire.as_f64().map(DynamicValue::F64).ok_or_else(err),
            PrimitiveKind::Str => wire.as_str().map(DynamicValue::from).ok_or_else(err),
            PrimitiveKind::Bool => wire.as_bool().map(DynamicValue::Bool).ok_or_else(err),
            PrimitiveKind::Null if wire.is_null() => Ok(DynamicValue::Null),
            PrimitiveKind::Null => Err(err()),
        }
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

/// Homogeneous sequence. Wire: `{"type": "list", "dtype": {...}, "size": 3 | null}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListType {
    dtype: TypeDescriptor,
    size: Option<usize>,
}

impl ListType {
    pub const TAG: &'static str = "list";

    /// Create a list type; `size` fixes the length when present.
    pub fn new(dtype: TypeDescriptor, size: Option<usize>) -> Self {
        Self { dtype, size }
    }

    pub fn dtype(&self) -> &TypeDescriptor {
        &self.dtype
    }

    pub fn size(&self) -> Option<usize> {
        self.size
    }

    fn decode(fields: &Map<String, Json>) -> Result<TypeDescriptor, TypeError> {
        let dtype = TypeDescriptor::from_wire(required_field(Self::TAG, fields, "dtype")?)?;
        let size = match fields.get("size") {
            None | Some(Json::Null) => None,
            Some(raw) => {
                let n = raw
                    .as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| {
                        TypeError::invalid(Self::TAG, format!("invalid size {}", raw))
                    })?;
                Some(n)
            }
        };
        Ok(TypeDescriptor::new(Self::new(dtype, size)))
    }

    fn check_len(&self, len: usize) -> Result<(), String> {
        match self.size {
            Some(expected) if expected != len => {
                Err(format!("expected {} items, got {}", expected, len))
            }
            _ => Ok(()),
        }
    }
}

impl DataType for ListType {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn fields(&self) -> Map<String, Json> {
        let mut map = Map::new();
        map.insert("dtype".to_string(), self.dtype.to_wire());
        map.insert("size".to_string(), self.size.map_or(Json::Null, Json::from));
        map
    }

    fn serialize(&self, value: &DynamicValue) -> Result<Json, TypeError> {
        let items = value.as_sequence().ok_or_else(|| {
            TypeError::serialization(
                Self::TAG,
                format!("expected sequence, got {}", value.kind_name()),
            )
        })?;
        self.check_len(items.len())
            .map_err(|reason| TypeError::serialization(Self::TAG, reason))?;
        items
            .iter()
            .map(|item| self.dtype.serialize_value(item))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array)
    }

    fn deserialize(&self, wire: &Json) -> Result<DynamicValue, TypeError> {
        let items = wire.as_array().ok_or_else(|| {
            TypeError::deserialization(Self::TAG, format!("expected array, got {}", wire))
        })?;
        self.check_len(items.len())
            .map_err(|reason| TypeError::deserialization(Self::TAG, reason))?;
        items
            .iter()
            .map(|item| self.dtype.deserialize_value(item))
            .collect::<Result<Vec<_>, _>>()
            .map(DynamicValue::Sequence)
    }

    fn requirements(&self) -> Requirements {
        self.dtype.requirements()
    }
}

// ---------------------------------------------------------------------------
// dict
// ---------------------------------------------------------------------------

/// Structured record with named fields.
///
/// Wire: `{"type": "dict", "item_types": {"name": {...}}}`. Values must
/// carry exactly the declared fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DictType {
    item_types: BTreeMap<String, TypeDescriptor>,
}

impl DictType {
    pub const TAG: &'static str = "dict";

    pub fn new(item_types: BTreeMap<String, TypeDescriptor>) -> Self {
        Self { item_types }
    }

    pub fn builder() -> DictTypeBuilder {
        DictTypeBuilder::default()
    }

    pub fn item_types(&self) -> &BTreeMap<String, TypeDescriptor> {
        &self.item_types
    }

    fn decode(fields: &Map<String, Json>) -> Result<TypeDescriptor, TypeError> {
        let raw = required_field(Self::TAG, fields, "item_types")?;
        let items = raw
            .as_object()
            .ok_or_else(|| TypeError::invalid(Self::TAG, "item_types must be an object"))?;
        let item_types = items
            .iter()
            .map(|(name, wire)| TypeDescriptor::from_wire(wire).map(|ty| (name.clone(), ty)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(TypeDescriptor::new(Self::new(item_types)))
    }

    fn check_keys(&self, present: &[&str]) -> Result<(), String> {
        let missing: Vec<&str> = self
            .item_types
            .keys()
            .map(String::as_str)
            .filter(|k| !present.contains(k))
            .collect();
        let extra: Vec<&str> = present
            .iter()
            .copied()
            .filter(|p| !self.item_types.contains_key(*p))
            .collect();

        if !missing.is_empty() {
            return Err(format!("missing fields {}", missing.join(", ")));
        }
        if !extra.is_empty() {
            return Err(format!("unexpected fields {}", extra.join(", ")));
        }
        Ok(())
    }
}

impl DataType for DictType {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn fields(&self) -> Map<String, Json> {
        let items: Map<String, Json> = self
            .item_types
            .iter()
            .map(|(name, ty)| (name.clone(), ty.to_wire()))
            .collect();
        let mut map = Map::new();
        map.insert("item_types".to_string(), Json::Object(items));
        map
    }

    fn serialize(&self, value: &DynamicValue) -> Result<Json, TypeError> {
        let fields = value.as_struct().ok_or_else(|| {
            TypeError::serialization(
                Self::TAG,
                format!("expected struct, got {}", value.kind_name()),
            )
        })?;
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        self.check_keys(&keys)
            .map_err(|reason| TypeError::serialization(Self::TAG, reason))?;

        let mut out = Map::new();
        for (name, ty) in &self.item_types {
            if let Some(item) = fields.get(name) {
                out.insert(name.clone(), ty.serialize_value(item)?);
            }
        }
        Ok(Json::Object(out))
    }

    fn deserialize(&self, wire: &Json) -> Result<DynamicValue, TypeError> {
        let fields = wire.as_object().ok_or_else(|| {
            TypeError::deserialization(Self::TAG, format!("expected object, got {}", wire))
        })?;
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        self.check_keys(&keys)
            .map_err(|reason| TypeError::deserialization(Self::TAG, reason))?;

        let mut out = BTreeMap::new();
        for (name, ty) in &self.item_types {
            if let Some(item) = fields.get(name) {
                out.insert(name.clone(), ty.deserialize_value(item)?);
            }
        }
        Ok(DynamicValue::Struct(out))
    }

    fn requirements(&self) -> Requirements {
        self.item_types.values().map(TypeDescriptor::requirements).collect()
    }
}

/// Builder for [`DictType`].
#[derive(Debug, Default)]
pub struct DictTypeBuilder {
    item_types: BTreeMap<String, TypeDescriptor>,
}

impl DictTypeBuilder {
    /// Add a field. A repeated name replaces the earlier type.
    pub fn item(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.item_types.insert(name.into(), ty);
        self
    }

    pub fn build(self) -> DictType {
        DictType::new(self.item_types)
    }
}

// ---------------------------------------------------------------------------
// number
// ---------------------------------------------------------------------------

/// Fixed-width numeric element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl NumberKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
            Self::F32 => "float32",
            Self::F64 => "float64",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "int8" => Some(Self::I8),
            "int16" => Some(Self::I16),
            "int32" => Some(Self::I32),
            "int64" => Some(Self::I64),
            "uint8" => Some(Self::U8),
            "uint16" => Some(Self::U16),
            "uint32" => Some(Self::U32),
            "uint64" => Some(Self::U64),
            "float32" => Some(Self::F32),
            "float64" => Some(Self::F64),
            _ => None,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    fn int_bounds(self) -> (i128, i128) {
        match self {
            Self::I8 => (i8::MIN.into(), i8::MAX.into()),
            Self::I16 => (i16::MIN.into(), i16::MAX.into()),
            Self::I32 => (i32::MIN.into(), i32::MAX.into()),
            Self::I64 => (i64::MIN.into(), i64::MAX.into()),
            Self::U8 => (0, u8::MAX.into()),
            Self::U16 => (0, u16::MAX.into()),
            Self::U32 => (0, u32::MAX.into()),
            Self::U64 => (0, u64::MAX.into()),
            Self::F32 | Self::F64 => (0, 0),
        }
    }

    /// Check `value` against this kind and normalize it
    /// (signed to `I64`, unsigned to `U64`, floats to `F64`).
    pub(crate) fn coerce(self, value: &DynamicValue) -> Result<DynamicValue, String> {
        if self.is_float() {
            let v = value
                .as_f64()
                .ok_or_else(|| format!("expected a number, got {}", value.kind_name()))?;
            if !v.is_finite() {
                return Err(format!("{} is not finite", v));
            }
            if self == Self::F32 && v.abs() > f64::from(f32::MAX) {
                return Err(format!("{} out of range for float32", v));
            }
            return Ok(DynamicValue::F64(v));
        }

        let v = match value {
            DynamicValue::I64(v) => i128::from(*v),
            DynamicValue::U64(v) => i128::from(*v),
            other => return Err(format!("expected an integer, got {}", other.kind_name())),
        };
        let (min, max) = self.int_bounds();
        if v < min || v > max {
            return Err(format!("{} out of range for {}", v, self.as_str()));
        }
        // Bounds were checked above, so the narrowing casts are exact.
        if self.is_signed() {
            Ok(DynamicValue::I64(v as i64))
        } else {
            Ok(DynamicValue::U64(v as u64))
        }
    }

    fn decode_field(kind: &str, fields: &Map<String, Json>) -> Result<Self, TypeError> {
        let raw = required_field(kind, fields, "dtype")?;
        raw.as_str()
            .and_then(Self::parse)
            .ok_or_else(|| TypeError::invalid(kind, format!("unknown dtype {}", raw)))
    }
}

/// Numeric scalar with range checking. Wire: `{"type": "number", "dtype": "int32"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberType {
    dtype: NumberKind,
}

impl NumberType {
    pub const TAG: &'static str = "number";

    pub fn new(dtype: NumberKind) -> Self {
        Self { dtype }
    }

    pub fn dtype(&self) -> NumberKind {
        self.dtype
    }

    fn decode(fields: &Map<String, Json>) -> Result<TypeDescriptor, TypeError> {
        let dtype = NumberKind::decode_field(Self::TAG, fields)?;
        Ok(TypeDescriptor::new(Self::new(dtype)))
    }
}

impl DataType for NumberType {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn fields(&self) -> Map<String, Json> {
        let mut map = Map::new();
        map.insert("dtype".to_string(), json!(self.dtype.as_str()));
        map
    }

    fn serialize(&self, value: &DynamicValue) -> Result<Json, TypeError> {
        self.dtype
            .coerce(value)
            .map(|v| v.to_json())
            .map_err(|reason| TypeError::serialization(Self::TAG, reason))
    }

    fn deserialize(&self, wire: &Json) -> Result<DynamicValue, TypeError> {
        if !wire.is_number() {
            return Err(TypeError::deserialization(
                Self::TAG,
                format!("expected a number, got {}", wire),
            ));
        }
        self.dtype
            .coerce(&DynamicValue::from_json(wire))
            .map_err(|reason| TypeError::deserialization(Self::TAG, reason))
    }

    fn requirements(&self) -> Requirements {
        Requirements::library(NUMERIC_LIBRARY)
    }
}

// ---------------------------------------------------------------------------
// ndarray
// ---------------------------------------------------------------------------

/// Nested numeric array.
///
/// Wire: `{"type": "ndarray", "shape": [null, 3], "dtype": "float64"}`.
/// A `null` dimension accepts any length (conventionally the batch
/// dimension); sibling sequences must have equal lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdarrayType {
    shape: Vec<Option<usize>>,
    dtype: NumberKind,
}

impl NdarrayType {
    pub const TAG: &'static str = "ndarray";

    pub fn new(shape: Vec<Option<usize>>, dtype: NumberKind) -> Self {
        Self { shape, dtype }
    }

    /// Shape with a free leading batch dimension followed by `dims`.
    pub fn batched(dims: &[usize], dtype: NumberKind) -> Self {
        let shape = std::iter::once(None)
            .chain(dims.iter().copied().map(Some))
            .collect();
        Self::new(shape, dtype)
    }

    pub fn shape(&self) -> &[Option<usize>] {
        &self.shape
    }

    pub fn dtype(&self) -> NumberKind {
        self.dtype
    }

    fn decode(fields: &Map<String, Json>) -> Result<TypeDescriptor, TypeError> {
        let raw = required_field(Self::TAG, fields, "shape")?;
        let dims = raw
            .as_array()
            .ok_or_else(|| TypeError::invalid(Self::TAG, "shape must be an array"))?;
        let shape = dims
            .iter()
            .map(|dim| match dim {
                Json::Null => Ok(None),
                other => other
                    .as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .map(Some)
                    .ok_or_else(|| {
                        TypeError::invalid(Self::TAG, format!("invalid dimension {}", other))
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let dtype = NumberKind::decode_field(Self::TAG, fields)?;
        Ok(TypeDescriptor::new(Self::new(shape, dtype)))
    }

    fn walk(
        &self,
        value: &DynamicValue,
        depth: usize,
        observed: &mut [Option<usize>],
    ) -> Result<DynamicValue, String> {
        if depth == self.shape.len() {
            return self.dtype.coerce(value);
        }

        let items = value.as_sequence().ok_or_else(|| {
            format!("expected a sequence at dimension {}, got {}", depth, value.kind_name())
        })?;
        if let Some(expected) = self.shape[depth] {
            if items.len() != expected {
                return Err(format!(
                    "dimension {} has length {}, expected {}",
                    depth,
                    items.len(),
                    expected
                ));
            }
        }
        match observed[depth] {
            Some(seen) if seen != items.len() => {
                return Err(format!("ragged array at dimension {}", depth));
            }
            _ => observed[depth] = Some(items.len()),
        }

        items
            .iter()
            .map(|item| self.walk(item, depth + 1, observed))
            .collect::<Result<Vec<_>, _>>()
            .map(DynamicValue::Sequence)
    }

    fn check(&self, value: &DynamicValue) -> Result<DynamicValue, String> {
        let mut observed = vec![None; self.shape.len()];
        self.walk(value, 0, &mut observed)
    }
}

impl DataType for NdarrayType {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn fields(&self) -> Map<String, Json> {
        let shape: Vec<Json> = self
            .shape
            .iter()
            .map(|dim| dim.map_or(Json::Null, Json::from))
            .collect();
        let mut map = Map::new();
        map.insert("shape".to_string(), Json::Array(shape));
        map.insert("dtype".to_string(), json!(self.dtype.as_str()));
        map
    }

    fn serialize(&self, value: &DynamicValue) -> Result<Json, TypeError> {
        self.check(value)
            .map(|v| v.to_json())
            .map_err(|reason| TypeError::serialization(Self::TAG, reason))
    }

    fn deserialize(&self, wire: &Json) -> Result<DynamicValue, TypeError> {
        self.check(&DynamicValue::from_json(wire))
            .map_err(|reason| TypeError::deserialization(Self::TAG, reason))
    }

    fn requirements(&self) -> Requirements {
        Requirements::library(NUMERIC_LIBRARY)
    }
}
