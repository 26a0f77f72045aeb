// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide registry of type kinds.
//!
//! Maps a tag string to the decoder that rebuilds a [`TypeDescriptor`]
//! from its wire fields. The registry is seeded with the built-in kinds on
//! first use and is append-only afterwards.

use super::{builtin, TypeDescriptor, TAG_FIELD};
use crate::error::TypeError;
use parking_lot::RwLock;
use serde_json::{Map, Value as Json};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Rebuilds a descriptor from its wire fields (the `"type"` key removed).
pub type KindDecoder =
    Arc<dyn Fn(&Map<String, Json>) -> Result<TypeDescriptor, TypeError> + Send + Sync>;

// @audit-ok: Global kind registry. Append-only, guarded by RwLock; decoders are cloned out before use.
static KINDS: OnceLock<RwLock<HashMap<String, KindDecoder>>> = OnceLock::new();

fn kinds() -> &'static RwLock<HashMap<String, KindDecoder>> {
    KINDS.get_or_init(|| {
        let mut map: HashMap<String, KindDecoder> = HashMap::new();
        for (tag, decoder) in builtin::builtin_kinds() {
            map.insert(tag.to_string(), decoder);
        }
        RwLock::new(map)
    })
}

/// Register a new kind under `tag`.
///
/// Registering a tag twice is a configuration error and fails with
/// [`TypeError::DuplicateTypeKind`]; the first decoder stays in place.
pub fn register_kind<F>(tag: &str, decoder: F) -> Result<(), TypeError>
where
    F: Fn(&Map<String, Json>) -> Result<TypeDescriptor, TypeError> + Send + Sync + 'static,
{
    if tag.is_empty() {
        return Err(TypeError::invalid(tag, "kind tag must not be empty"));
    }

    let mut registry = kinds().write();
    if registry.contains_key(tag) {
        return Err(TypeError::DuplicateTypeKind(tag.to_string()));
    }
    registry.insert(tag.to_string(), Arc::new(decoder));
    log::debug!("type registry: registered kind '{}'", tag);
    Ok(())
}

/// Check whether a kind is registered.
pub fn is_registered(tag: &str) -> bool {
    kinds().read().contains_key(tag)
}

/// List all registered tags (sorted for determinism).
pub fn registered_kinds() -> Vec<String> {
    let mut tags: Vec<String> = kinds().read().keys().cloned().collect();
    tags.sort();
    tags
}

pub(crate) fn decode(wire: &Json) -> Result<TypeDescriptor, TypeError> {
    let Json::Object(map) = wire else {
        return Err(TypeError::invalid(
            "<untagged>",
            format!("expected an object, got {}", wire),
        ));
    };

    let tag = map
        .get(TAG_FIELD)
        .and_then(Json::as_str)
        .ok_or(TypeError::MissingTag)?;

    // Clone the decoder out so nested decodes can take the lock again.
    let decoder = kinds()
        .read()
        .get(tag)
        .cloned()
        .ok_or_else(|| TypeError::UnknownTypeKind(tag.to_string()))?;

    let mut fields = map.clone();
    fields.remove(TAG_FIELD);
    decoder(&fields)
}
