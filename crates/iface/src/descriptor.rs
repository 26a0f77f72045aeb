// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Versioned, serializable snapshot of an interface.
//!
//! Wire schema:
//!
//! ```text
//! {
//!   "version": "<semver>",
//!   "methods": {
//!     "<name>": {
//!       "name": "<name>",
//!       "args": [ { "key": "<arg>", "type": { "type": "<tag>", ... } } ],
//!       "returns": { "type": "<tag>", ... } | null
//!     }
//!   }
//! }
//! ```

use crate::error::InterfaceError;
use crate::signature::Signature;
use crate::types::Requirements;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptor schema version, fixed at build time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Snapshot of an interface: version plus method name to signature.
///
/// Every key in `methods` equals the `name` of its signature; decoding
/// rejects a descriptor that breaks this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InterfaceDescriptorWire")]
pub struct InterfaceDescriptor {
    pub version: String,
    pub methods: BTreeMap<String, Signature>,
}

#[derive(Deserialize)]
struct InterfaceDescriptorWire {
    version: String,
    methods: BTreeMap<String, Signature>,
}

impl TryFrom<InterfaceDescriptorWire> for InterfaceDescriptor {
    type Error = InterfaceError;

    fn try_from(wire: InterfaceDescriptorWire) -> Result<Self, Self::Error> {
        let mismatch = wire
            .methods
            .iter()
            .find(|(key, sig)| sig.name() != key.as_str());
        if let Some((key, sig)) = mismatch {
            return Err(InterfaceError::MethodNameMismatch {
                key: key.clone(),
                name: sig.name().to_string(),
            });
        }
        Ok(Self {
            version: wire.version,
            methods: wire.methods,
        })
    }
}

impl InterfaceDescriptor {
    /// Build a descriptor at the current [`VERSION`].
    pub fn new<I>(signatures: I) -> Self
    where
        I: IntoIterator<Item = Signature>,
    {
        Self {
            version: VERSION.to_string(),
            methods: signatures
                .into_iter()
                .map(|sig| (sig.name().to_string(), sig))
                .collect(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&Signature> {
        self.methods.get(name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Union of the requirements of every argument and return type.
    pub fn requirements(&self) -> Requirements {
        self.methods
            .values()
            .flat_map(|sig| {
                sig.args()
                    .iter()
                    .map(|arg| arg.ty.requirements())
                    .chain(sig.returns().map(|ty| ty.requirements()))
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
