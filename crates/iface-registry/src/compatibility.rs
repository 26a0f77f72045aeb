// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::collections::HashMap;
use std::fmt;

use iface::{InterfaceDescriptor, Signature, TypeDescriptor};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Compatibility level
// ---------------------------------------------------------------------------

/// Describes how two interface revisions relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compatibility {
    /// Both forward and backward compatible.
    Full,
    /// New interface accepts every call an old client makes.
    Backward,
    /// Old interface accepts every call a new client makes.
    Forward,
    /// Neither direction holds, or a type changed.
    Breaking,
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Compatibility::Full => "full",
            Compatibility::Backward => "backward",
            Compatibility::Forward => "forward",
            Compatibility::Breaking => "breaking",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// CompatibilityPolicy
// ---------------------------------------------------------------------------

/// Level a registry requires between consecutive revisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityPolicy {
    /// Accept any change.
    #[default]
    None,
    /// New revisions must serve old clients.
    Backward,
    /// Old revisions must serve new clients.
    Forward,
    /// Both directions.
    Full,
}

impl CompatibilityPolicy {
    /// Whether a change classified as `compatibility` satisfies this policy.
    pub fn allows(self, compatibility: Compatibility) -> bool {
        match self {
            CompatibilityPolicy::None => true,
            CompatibilityPolicy::Backward => {
                matches!(compatibility, Compatibility::Full | Compatibility::Backward)
            }
            CompatibilityPolicy::Forward => {
                matches!(compatibility, Compatibility::Full | Compatibility::Forward)
            }
            CompatibilityPolicy::Full => compatibility == Compatibility::Full,
        }
    }
}

impl fmt::Display for CompatibilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompatibilityPolicy::None => "none",
            CompatibilityPolicy::Backward => "backward",
            CompatibilityPolicy::Forward => "forward",
            CompatibilityPolicy::Full => "full",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// CompatibilityResult
// ---------------------------------------------------------------------------

/// Detailed result of a compatibility check between two descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityResult {
    /// Overall compatibility level.
    pub compatibility: Compatibility,
    /// Human-readable details about what changed.
    pub details: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Check compatibility between an old and a new interface revision.
///
/// Callers send named arguments and the dispatcher tolerates extra keys,
/// so:
///
/// | change             | result   |
/// |--------------------|----------|
/// | method added       | Backward |
/// | method removed     | Forward  |
/// | argument added     | Forward  |
/// | argument removed   | Backward |
/// | type changed       | Breaking |
///
/// Argument order is ignored. The descriptor version is not compared.
pub fn check_compatibility(old: &InterfaceDescriptor, new: &InterfaceDescriptor) -> CompatibilityResult {
    let mut details = Vec::new();
    // Old clients can no longer be served.
    let mut backward_broken = false;
    // New clients cannot be served by the old interface.
    let mut forward_broken = false;
    let mut has_type_change = false;

    for name in new.methods.keys() {
        if !old.methods.contains_key(name) {
            details.push(format!("added method: {}", name));
            forward_broken = true;
        }
    }

    for (name, old_sig) in &old.methods {
        let Some(new_sig) = new.methods.get(name) else {
            details.push(format!("removed method: {}", name));
            backward_broken = true;
            continue;
        };

        let diff = diff_signature(old_sig, new_sig);
        backward_broken |= diff.args_added;
        forward_broken |= diff.args_removed;
        has_type_change |= diff.type_changed;
        details.extend(diff.details);
    }

    let compatibility = if has_type_change || (backward_broken && forward_broken) {
        Compatibility::Breaking
    } else if backward_broken {
        Compatibility::Forward
    } else if forward_broken {
        Compatibility::Backward
    } else {
        Compatibility::Full
    };

    if details.is_empty() {
        details.push("descriptors are identical".to_string());
    }

    CompatibilityResult {
        compatibility,
        details,
    }
}

// ---------------------------------------------------------------------------
// Signature diff
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SignatureDiff {
    args_added: bool,
    args_removed: bool,
    type_changed: bool,
    details: Vec<String>,
}

fn diff_signature(old: &Signature, new: &Signature) -> SignatureDiff {
    let mut diff = SignatureDiff::default();
    let method = old.name();

    let old_args: HashMap<&str, &TypeDescriptor> =
        old.args().iter().map(|a| (a.key.as_str(), &a.ty)).collect();
    let new_args: HashMap<&str, &TypeDescriptor> =
        new.args().iter().map(|a| (a.key.as_str(), &a.ty)).collect();

    for arg in new.args() {
        if !old_args.contains_key(arg.key.as_str()) {
            diff.details
                .push(format!("added argument: {}.{} {}", method, arg.key, arg.ty));
            diff.args_added = true;
        }
    }

    for arg in old.args() {
        match new_args.get(arg.key.as_str()) {
            None => {
                diff.details
                    .push(format!("removed argument: {}.{} {}", method, arg.key, arg.ty));
                diff.args_removed = true;
            }
            Some(&new_ty) if *new_ty != arg.ty => {
                diff.details.push(format!(
                    "changed type of {}.{}: {} -> {}",
                    method, arg.key, arg.ty, new_ty
                ));
                diff.type_changed = true;
            }
            Some(_) => {}
        }
    }

    if old.returns() != new.returns() {
        diff.details.push(format!(
            "changed return type of {}: {} -> {}",
            method,
            describe(old.returns()),
            describe(new.returns())
        ));
        diff.type_changed = true;
    }

    diff
}

fn describe(ty: Option<&TypeDescriptor>) -> String {
    ty.map_or_else(|| "none".to_string(), ToString::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use iface::types::PrimitiveKind;

    fn int() -> TypeDescriptor {
        TypeDescriptor::primitive(PrimitiveKind::Int)
    }

    fn text() -> TypeDescriptor {
        TypeDescriptor::primitive(PrimitiveKind::Str)
    }

    fn sig(name: &str, args: &[(&str, TypeDescriptor)]) -> Signature {
        args.iter()
            .fold(Signature::builder(name), |b, (k, ty)| b.arg(*k, ty.clone()))
            .returns(int())
            .build()
            .unwrap()
    }

    fn desc(sigs: Vec<Signature>) -> InterfaceDescriptor {
        InterfaceDescriptor::new(sigs)
    }

    #[test]
    fn identical_descriptors_are_full() {
        let d = desc(vec![sig("count", &[("text", text())])]);
        let result = check_compatibility(&d, &d);
        assert_eq!(result.compatibility, Compatibility::Full);
        assert_eq!(result.details, vec!["descriptors are identical"]);
    }

    #[test]
    fn adding_method_is_backward() {
        let old = desc(vec![sig("count", &[("text", text())])]);
        let new = desc(vec![sig("count", &[("text", text())]), sig("ping", &[])]);
        let result = check_compatibility(&old, &new);
        assert_eq!(result.compatibility, Compatibility::Backward);
        assert!(result.details.iter().any(|d| d == "added method: ping"));
    }

    #[test]
    fn removing_method_is_forward() {
        let old = desc(vec![sig("count", &[]), sig("ping", &[])]);
        let new = desc(vec![sig("count", &[])]);
        let result = check_compatibility(&old, &new);
        assert_eq!(result.compatibility, Compatibility::Forward);
    }

    #[test]
    fn adding_argument_is_forward() {
        let old = desc(vec![sig("count", &[("text", text())])]);
        let new = desc(vec![sig("count", &[("text", text()), ("limit", int())])]);
        let result = check_compatibility(&old, &new);
        assert_eq!(result.compatibility, Compatibility::Forward);
        assert!(result.details.iter().any(|d| d.starts_with("added argument: count.limit")));
    }

    #[test]
    fn removing_argument_is_backward() {
        let old = desc(vec![sig("count", &[("text", text()), ("limit", int())])]);
        let new = desc(vec![sig("count", &[("text", text())])]);
        let result = check_compatibility(&old, &new);
        assert_eq!(result.compatibility, Compatibility::Backward);
    }

    #[test]
    fn changing_argument_type_is_breaking() {
        let old = desc(vec![sig("count", &[("text", text())])]);
        let new = desc(vec![sig("count", &[("text", int())])]);
        let result = check_compatibility(&old, &new);
        assert_eq!(result.compatibility, Compatibility::Breaking);
        assert!(result.details.iter().any(|d| d.contains("changed type of count.text")));
    }

    #[test]
    fn changing_return_type_is_breaking() {
        let old = desc(vec![Signature::builder("f").build().unwrap()]);
        let new = desc(vec![Signature::builder("f").returns(int()).build().unwrap()]);
        let result = check_compatibility(&old, &new);
        assert_eq!(result.compatibility, Compatibility::Breaking);
        assert!(result.details[0].contains("none ->"));
    }

    #[test]
    fn add_and_remove_is_breaking() {
        let old = desc(vec![sig("a", &[])]);
        let new = desc(vec![sig("b", &[])]);
        let result = check_compatibility(&old, &new);
        assert_eq!(result.compatibility, Compatibility::Breaking);
    }

    #[test]
    fn argument_order_is_ignored() {
        let old = desc(vec![sig("f", &[("x", int()), ("y", text())])]);
        let new = desc(vec![sig("f", &[("y", text()), ("x", int())])]);
        assert_eq!(check_compatibility(&old, &new).compatibility, Compatibility::Full);
    }

    #[test]
    fn policy_allows() {
        use CompatibilityPolicy as P;
        assert!(P::None.allows(Compatibility::Breaking));
        assert!(P::Backward.allows(Compatibility::Backward));
        assert!(!P::Backward.allows(Compatibility::Forward));
        assert!(P::Forward.allows(Compatibility::Full));
        assert!(!P::Full.allows(Compatibility::Backward));
    }
}
