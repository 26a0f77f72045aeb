// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

use iface::{Interface, InterfaceDescriptor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compatibility::{check_compatibility, Compatibility, CompatibilityPolicy, CompatibilityResult};

// ---------------------------------------------------------------------------
// DescriptorEntry
// ---------------------------------------------------------------------------

/// A single revision of an interface stored in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorEntry {
    /// Interface name (e.g. "fraud-detector").
    pub name: String,
    /// Monotonically increasing revision starting at 1.
    pub revision: u32,
    pub descriptor: InterfaceDescriptor,
    /// 64-bit hash of the serialized descriptor.
    pub hash: u64,
    pub registered_at: SystemTime,
}

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// Errors produced by the descriptor registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("interface name must not be empty")]
    EmptyName,

    #[error("descriptor has no methods")]
    EmptyDescriptor,

    #[error("identical descriptor already registered as {name} r{revision}")]
    DuplicateContent { name: String, revision: u32 },

    #[error("{name}: change is {compatibility}, policy requires {policy}: {}", .details.join("; "))]
    Incompatible {
        name: String,
        policy: CompatibilityPolicy,
        compatibility: Compatibility,
        details: Vec<String>,
    },

    #[error("interface not found: {0}")]
    NotFound(String),

    #[error("interface {name} cannot be described: {reason}")]
    Interface { name: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

// ---------------------------------------------------------------------------
// DescriptorRegistry
// ---------------------------------------------------------------------------

/// In-memory store of interface revisions keyed by name.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    /// Map from interface name to its revisions (index 0 = r1).
    interfaces: HashMap<String, Vec<DescriptorEntry>>,
    policy: CompatibilityPolicy,
}

impl DescriptorRegistry {
    /// Create an empty registry that accepts any change.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry enforcing `policy` on every new revision.
    pub fn with_policy(policy: CompatibilityPolicy) -> Self {
        Self {
            interfaces: HashMap::new(),
            policy,
        }
    }

    pub(crate) fn from_raw(
        interfaces: HashMap<String, Vec<DescriptorEntry>>,
        policy: CompatibilityPolicy,
    ) -> Self {
        Self { interfaces, policy }
    }

    pub(crate) fn inner(&self) -> &HashMap<String, Vec<DescriptorEntry>> {
        &self.interfaces
    }

    pub fn policy(&self) -> CompatibilityPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: CompatibilityPolicy) {
        self.policy = policy;
    }

    /// Register a new revision.
    ///
    /// Returns the assigned revision. Content identical to the latest
    /// revision yields `DuplicateContent`; a change the policy does not
    /// allow yields `Incompatible`.
    pub fn register(
        &mut self,
        name: &str,
        descriptor: InterfaceDescriptor,
    ) -> Result<u32, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if descriptor.is_empty() {
            return Err(RegistryError::EmptyDescriptor);
        }

        let hash = Self::compute_hash(&descriptor)?;

        if let Some(latest) = self.get_latest(name) {
            if latest.hash == hash && latest.descriptor == descriptor {
                return Err(RegistryError::DuplicateContent {
                    name: name.to_string(),
                    revision: latest.revision,
                });
            }

            let result = check_compatibility(&latest.descriptor, &descriptor);
            if !self.policy.allows(result.compatibility) {
                log::warn!(
                    "rejected {} revision: {} change under {} policy",
                    name,
                    result.compatibility,
                    self.policy
                );
                return Err(RegistryError::Incompatible {
                    name: name.to_string(),
                    policy: self.policy,
                    compatibility: result.compatibility,
                    details: result.details,
                });
            }
        }

        let revisions = self.interfaces.entry(name.to_string()).or_default();
        let revision = (revisions.len() as u32) + 1;

        revisions.push(DescriptorEntry {
            name: name.to_string(),
            revision,
            descriptor,
            hash,
            registered_at: SystemTime::now(),
        });
        log::info!("registered {} r{}", name, revision);
        Ok(revision)
    }

    /// Snapshot a live interface and register it.
    pub fn register_interface(
        &mut self,
        name: &str,
        interface: &Interface,
    ) -> Result<u32, RegistryError> {
        let descriptor = interface
            .get_descriptor()
            .map_err(|e| RegistryError::Interface {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        self.register(name, descriptor)
    }

    /// Compare a candidate against the latest revision without registering.
    ///
    /// An unknown name is trivially compatible.
    pub fn check_against_latest(
        &self,
        name: &str,
        descriptor: &InterfaceDescriptor,
    ) -> CompatibilityResult {
        match self.get_latest(name) {
            Some(latest) => check_compatibility(&latest.descriptor, descriptor),
            None => CompatibilityResult {
                compatibility: Compatibility::Full,
                details: vec!["no previous revision exists; trivially compatible".to_string()],
            },
        }
    }

    /// Return the latest revision of an interface, or `None` if not found.
    pub fn get_latest(&self, name: &str) -> Option<&DescriptorEntry> {
        self.interfaces.get(name).and_then(|v| v.last())
    }

    /// Return a specific revision (1-indexed).
    pub fn get_revision(&self, name: &str, revision: u32) -> Option<&DescriptorEntry> {
        if revision == 0 {
            return None;
        }
        self.interfaces
            .get(name)
            .and_then(|v| v.get((revision - 1) as usize))
    }

    /// List all registered interface names (sorted for determinism).
    pub fn list_interfaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.interfaces.keys().cloned().collect();
        names.sort();
        names
    }

    /// List all revisions of an interface.
    pub fn list_revisions(&self, name: &str) -> Vec<u32> {
        match self.interfaces.get(name) {
            Some(revisions) => revisions.iter().map(|e| e.revision).collect(),
            None => Vec::new(),
        }
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    /// Deterministic 64-bit hash of the descriptor's JSON form.
    pub(crate) fn compute_hash(descriptor: &InterfaceDescriptor) -> Result<u64, RegistryError> {
        let json = descriptor
            .to_json()
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;
        let mut hasher = DefaultHasher::new();
        json.hash(&mut hasher);
        Ok(hasher.finish())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
