// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for argument and return data.
//!
//! A [`TypeDescriptor`] is a tagged, structurally comparable description
//! of a data shape. Each concrete kind implements [`DataType`] and is
//! registered under a unique tag in the process-wide kind registry, so
//! descriptors can be rebuilt from their wire form.
//!
//! # Wire form
//!
//! ```text
//! { "type": <tag>, ...kind-specific fields }
//! ```
//!
//! # Example
//!
//! ```rust
//! use iface::types::{DictType, PrimitiveKind, TypeDescriptor};
//! use serde_json::json;
//!
//! let float = TypeDescriptor::primitive(PrimitiveKind::Float);
//! let point = TypeDescriptor::new(
//!     DictType::builder()
//!         .item("x", float.clone())
//!         .item("y", float)
//!         .build(),
//! );
//!
//! let wire = point.to_wire();
//! assert_eq!(wire["type"], json!("dict"));
//! assert_eq!(TypeDescriptor::from_wire(&wire).unwrap(), point);
//! ```

mod builtin;
mod infer;
mod registry;
mod requirements;

pub use builtin::{
    DictType, DictTypeBuilder, ListType, NdarrayType, NumberKind, NumberType, PrimitiveKind,
    PrimitiveType,
};
pub use infer::infer_type;
pub use registry::{is_registered, register_kind, registered_kinds, KindDecoder};
pub use requirements::Requirements;

use crate::error::TypeError;
use crate::value::DynamicValue;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json};
use std::fmt;
use std::sync::Arc;

/// Name of the discriminant field in the wire form.
pub const TAG_FIELD: &str = "type";

/// A concrete kind of data shape.
///
/// Implementations must be immutable. `fields` must not contain the
/// reserved `"type"` key.
pub trait DataType: fmt::Debug + Send + Sync + 'static {
    /// Registry tag of this kind.
    fn tag(&self) -> &str;

    /// Kind-specific wire fields. Nested descriptors appear in wire form.
    fn fields(&self) -> Map<String, Json>;

    /// Convert a runtime value into its wire representation.
    fn serialize(&self, value: &DynamicValue) -> Result<Json, TypeError>;

    /// Convert a wire representation into a runtime value.
    fn deserialize(&self, wire: &Json) -> Result<DynamicValue, TypeError>;

    /// External libraries a client needs to interpret this type.
    fn requirements(&self) -> Requirements {
        Requirements::new()
    }
}

/// Shared, immutable handle over a [`DataType`].
#[derive(Clone)]
pub struct TypeDescriptor {
    inner: Arc<dyn DataType>,
}

impl TypeDescriptor {
    /// Wrap a concrete kind.
    pub fn new<T: DataType>(kind: T) -> Self {
        Self {
            inner: Arc::new(kind),
        }
    }

    /// Registry tag of the underlying kind.
    pub fn tag(&self) -> &str {
        self.inner.tag()
    }

    /// Kind-specific wire fields.
    pub fn fields(&self) -> Map<String, Json> {
        self.inner.fields()
    }

    /// Access the underlying kind.
    pub fn kind(&self) -> &dyn DataType {
        self.inner.as_ref()
    }

    pub fn serialize_value(&self, value: &DynamicValue) -> Result<Json, TypeError> {
        self.inner.serialize(value)
    }

    pub fn deserialize_value(&self, wire: &Json) -> Result<DynamicValue, TypeError> {
        self.inner.deserialize(wire)
    }

    pub fn requirements(&self) -> Requirements {
        self.inner.requirements()
    }

    /// Wire form: kind fields plus the `"type"` tag.
    pub fn to_wire(&self) -> Json {
        let mut map = self.fields();
        map.insert(TAG_FIELD.to_string(), Json::String(self.tag().to_string()));
        Json::Object(map)
    }

    /// Rebuild a descriptor from its wire form using the kind registry.
    pub fn from_wire(wire: &Json) -> Result<Self, TypeError> {
        registry::decode(wire)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.tag() == other.tag() && self.fields() == other.fields())
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.to_wire())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypeDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = Json::deserialize(deserializer)?;
        Self::from_wire(&wire).map_err(D::Error::custom)
    }
}

/// Fetch a required field while decoding a kind.
pub fn required_field<'a>(
    kind: &str,
    fields: &'a Map<String, Json>,
    name: &str,
) -> Result<&'a Json, TypeError> {
    fields
        .get(name)
        .ok_or_else(|| TypeError::invalid(kind, format!("missing field \"{}\"", name)))
}
