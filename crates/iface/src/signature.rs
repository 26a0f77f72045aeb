// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Method signatures: named, typed arguments plus an optional return type.

use crate::error::InterfaceError;
use crate::types::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One named, typed argument of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name, unique within its signature.
    pub key: String,
    /// Argument type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

impl Argument {
    pub fn new(key: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            key: key.into(),
            ty,
        }
    }
}

/// Typed description of one callable.
///
/// Argument order is significant: it is the positional order used when
/// binding a call. A missing return type is kept as `None` (serialized as
/// `null`) rather than replaced by a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SignatureWire")]
pub struct Signature {
    name: String,
    args: Vec<Argument>,
    returns: Option<TypeDescriptor>,
}

impl Signature {
    /// Create a signature, rejecting duplicate argument keys.
    pub fn new(
        name: impl Into<String>,
        args: Vec<Argument>,
        returns: Option<TypeDescriptor>,
    ) -> Result<Self, InterfaceError> {
        let name = name.into();
        let mut seen = HashSet::new();
        for arg in &args {
            if !seen.insert(arg.key.as_str()) {
                return Err(InterfaceError::DuplicateArgument {
                    method: name,
                    key: arg.key.clone(),
                });
            }
        }
        Ok(Self {
            name,
            args,
            returns,
        })
    }

    pub fn builder(name: impl Into<String>) -> SignatureBuilder {
        SignatureBuilder {
            name: name.into(),
            args: Vec::new(),
            returns: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn returns(&self) -> Option<&TypeDescriptor> {
        self.returns.as_ref()
    }

    /// Argument keys in declaration order.
    pub fn arg_keys(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|a| a.key.as_str())
    }

    /// Look up an argument by key.
    pub fn argument(&self, key: &str) -> Option<&Argument> {
        self.args.iter().find(|a| a.key == key)
    }
}

#[derive(Deserialize)]
struct SignatureWire {
    name: String,
    #[serde(default)]
    args: Vec<Argument>,
    #[serde(default)]
    returns: Option<TypeDescriptor>,
}

impl TryFrom<SignatureWire> for Signature {
    type Error = InterfaceError;

    fn try_from(wire: SignatureWire) -> Result<Self, Self::Error> {
        Signature::new(wire.name, wire.args, wire.returns)
    }
}

/// Fluent builder for [`Signature`].
#[derive(Debug)]
pub struct SignatureBuilder {
    name: String,
    args: Vec<Argument>,
    returns: Option<TypeDescriptor>,
}

impl SignatureBuilder {
    /// Append an argument.
    pub fn arg(mut self, key: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.args.push(Argument::new(key, ty));
        self
    }

    /// Set the return type.
    pub fn returns(mut self, ty: TypeDescriptor) -> Self {
        self.returns = Some(ty);
        self
    }

    pub fn build(self) -> Result<Signature, InterfaceError> {
        Signature::new(self.name, self.args, self.returns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NumberKind, PrimitiveKind};
    use serde_json::json;

    fn int() -> TypeDescriptor {
        TypeDescriptor::primitive(PrimitiveKind::Int)
    }

    #[test]
    fn builder_preserves_argument_order() {
        let sig = Signature::builder("add")
            .arg("b", int())
            .arg("a", int())
            .returns(int())
            .build()
            .unwrap();

        assert_eq!(sig.name(), "add");
        assert_eq!(sig.arg_keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(sig.argument("a").map(|a| &a.ty), Some(&int()));
        assert_eq!(sig.returns(), Some(&int()));
    }

    #[test]
    fn duplicate_keys_rejected() {
        let err = Signature::builder("f")
            .arg("x", int())
            .arg("x", int())
            .build()
            .unwrap_err();
        assert!(
            matches!(err, InterfaceError::DuplicateArgument { ref method, ref key } if method == "f" && key == "x")
        );
    }

    #[test]
    fn zero_args_and_no_return() {
        let sig = Signature::builder("ping").build().unwrap();
        assert!(sig.args().is_empty());
        assert!(sig.returns().is_none());
        assert_eq!(
            serde_json::to_value(&sig).unwrap(),
            json!({"name": "ping", "args": [], "returns": null})
        );
    }

    #[test]
    fn wire_form_matches_descriptor_schema() {
        let sig = Signature::builder("predict")
            .arg("data", TypeDescriptor::number(NumberKind::F64))
            .build()
            .unwrap();

        assert_eq!(
            serde_json::to_value(&sig).unwrap(),
            json!({
                "name": "predict",
                "args": [{"key": "data", "type": {"type": "number", "dtype": "float64"}}],
                "returns": null
            })
        );
    }

    #[test]
    fn deserialize_validates_keys() {
        let wire = json!({
            "name": "f",
            "args": [
                {"key": "x", "type": {"type": "primitive", "ptype": "int"}},
                {"key": "x", "type": {"type": "primitive", "ptype": "int"}}
            ],
            "returns": null
        });
        assert!(serde_json::from_value::<Signature>(wire).is_err());
    }
}
