// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::model::ModelHandle;
use crate::dispatch::MethodExecutor;
use crate::error::{BoxError, InterfaceError};
use crate::signature::Signature;
use crate::value::DynamicValue;
use std::collections::HashMap;
use std::sync::Arc;

/// One exposed method.
#[derive(Clone)]
pub(crate) struct MethodEntry {
    pub(crate) signature: Signature,
    pub(crate) executor: Arc<dyn MethodExecutor>,
    pub(crate) docs: Option<String>,
}

/// Ordered method table with name lookup.
#[derive(Clone, Default)]
pub(crate) struct MethodTable {
    entries: Vec<MethodEntry>,
    index: HashMap<String, usize>,
}

impl MethodTable {
    pub(crate) fn insert(&mut self, entry: MethodEntry) -> Result<(), InterfaceError> {
        let name = entry.signature.name().to_string();
        if self.index.contains_key(&name) {
            return Err(InterfaceError::DuplicateMethod(name));
        }
        self.index.insert(name, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Copy a model's declared methods verbatim, each executor forwarding
    /// to `call_method` on the handle.
    pub(crate) fn from_model(model: &Arc<dyn ModelHandle>) -> Result<Self, InterfaceError> {
        let mut table = Self::default();
        for signature in model.methods() {
            let name = signature.name().to_string();
            let handle = model.clone();
            let target = name.clone();
            let executor = move |args: Vec<DynamicValue>| -> Result<DynamicValue, BoxError> {
                handle.call_method(&target, args)
            };
            table.insert(MethodEntry {
                signature: signature.clone(),
                executor: Arc::new(executor),
                docs: model.method_docs(&name),
            })?;
        }
        Ok(table)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&MethodEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub(crate) fn entries(&self) -> &[MethodEntry] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
