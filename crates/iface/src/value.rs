// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value types.

use serde_json::{Map, Number, Value as Json};
use std::collections::BTreeMap;

/// A dynamic value passed to and returned from method executors.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DynamicValue {
    #[default]
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),

    // Composites
    Sequence(Vec<DynamicValue>),
    Struct(BTreeMap<String, DynamicValue>),
}

impl DynamicValue {
    /// Build a struct value from `(name, value)` pairs.
    pub fn structure<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, DynamicValue)>,
    {
        Self::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Short name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I64(_) | Self::U64(_) => "integer",
            Self::F64(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Struct(_) => "struct",
        }
    }

    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64 (unsigned values that fit are accepted).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            Self::U64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to get as u64 (non-negative signed values are accepted).
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            Self::I64(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to get as f64. Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            Self::I64(v) => Some(*v as f64),
            Self::U64(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as sequence.
    pub fn as_sequence(&self) -> Option<&[DynamicValue]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get struct fields.
    pub fn as_struct(&self) -> Option<&BTreeMap<String, DynamicValue>> {
        match self {
            Self::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Try to get struct field.
    pub fn get_field(&self, name: &str) -> Option<&DynamicValue> {
        self.as_struct()?.get(name)
    }

    /// Set struct field. Returns false if this is not a struct.
    pub fn set_field(&mut self, name: impl Into<String>, value: DynamicValue) -> bool {
        match self {
            Self::Struct(fields) => {
                fields.insert(name.into(), value);
                true
            }
            _ => false,
        }
    }

    /// Untyped conversion from JSON.
    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(*b),
            Json::Number(n) => number_to_value(n),
            Json::String(s) => Self::String(s.clone()),
            Json::Array(items) => Self::Sequence(items.iter().map(Self::from_json).collect()),
            Json::Object(map) => Self::Struct(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Untyped conversion to JSON. Non-finite floats become `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Self::Null => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::I64(v) => Json::from(*v),
            Self::U64(v) => Json::from(*v),
            Self::F64(v) => Number::from_f64(*v).map_or(Json::Null, Json::Number),
            Self::String(s) => Json::String(s.clone()),
            Self::Sequence(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Struct(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Json>>(),
            ),
        }
    }
}

pub(crate) fn number_to_value(n: &Number) -> DynamicValue {
    if let Some(v) = n.as_i64() {
        DynamicValue::I64(v)
    } else if let Some(v) = n.as_u64() {
        DynamicValue::U64(v)
    } else {
        DynamicValue::F64(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<bool> for DynamicValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for DynamicValue {
    fn from(v: i32) -> Self {
        Self::I64(i64::from(v))
    }
}

impl From<i64> for DynamicValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u32> for DynamicValue {
    fn from(v: u32) -> Self {
        Self::U64(u64::from(v))
    }
}

impl From<u64> for DynamicValue {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f32> for DynamicValue {
    fn from(v: f32) -> Self {
        Self::F64(f64::from(v))
    }
}

impl From<f64> for DynamicValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<&str> for DynamicValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for DynamicValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<DynamicValue>> for DynamicValue {
    fn from(v: Vec<DynamicValue>) -> Self {
        Self::Sequence(v)
    }
}

impl From<BTreeMap<String, DynamicValue>> for DynamicValue {
    fn from(v: BTreeMap<String, DynamicValue>) -> Self {
        Self::Struct(v)
    }
}

impl From<&Json> for DynamicValue {
    fn from(v: &Json) -> Self {
        Self::from_json(v)
    }
}
