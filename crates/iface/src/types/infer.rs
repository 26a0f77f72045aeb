// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Derive a type descriptor from a sample value.

use super::{DictType, ListType, PrimitiveKind, TypeDescriptor};
use crate::error::TypeError;
use crate::value::DynamicValue;

/// Infer a descriptor from a sample value.
///
/// Scalars map to `primitive`, sequences to a variable-length `list` of
/// their common element type and structs to `dict`. Empty or
/// heterogeneous sequences cannot be inferred.
pub fn infer_type(value: &DynamicValue) -> Result<TypeDescriptor, TypeError> {
    match value {
        DynamicValue::Null => Ok(TypeDescriptor::primitive(PrimitiveKind::Null)),
        DynamicValue::Bool(_) => Ok(TypeDescriptor::primitive(PrimitiveKind::Bool)),
        DynamicValue::I64(_) | DynamicValue::U64(_) => {
            Ok(TypeDescriptor::primitive(PrimitiveKind::Int))
        }
        DynamicValue::F64(_) => Ok(TypeDescriptor::primitive(PrimitiveKind::Float)),
        DynamicValue::String(_) => Ok(TypeDescriptor::primitive(PrimitiveKind::Str)),
        DynamicValue::Sequence(items) => {
            let (first, rest) = items
                .split_first()
                .ok_or_else(|| TypeError::CannotInfer("empty sequence".to_string()))?;
            let dtype = infer_type(first)?;
            for (index, item) in rest.iter().enumerate() {
                if infer_type(item)? != dtype {
                    return Err(TypeError::CannotInfer(format!(
                        "heterogeneous sequence: item {} differs from item 0",
                        index + 1
                    )));
                }
            }
            Ok(TypeDescriptor::new(ListType::new(dtype, None)))
        }
        DynamicValue::Struct(fields) => {
            let item_types = fields
                .iter()
                .map(|(name, item)| infer_type(item).map(|ty| (name.clone(), ty)))
                .collect::<Result<_, _>>()?;
            Ok(TypeDescriptor::new(DictType::new(item_types)))
        }
    }
}
