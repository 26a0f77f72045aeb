// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use iface::{Interface, InterfaceDescriptor};
use parking_lot::RwLock;

use crate::compatibility::CompatibilityResult;
use crate::persistence::FilePersistence;
use crate::registry::{DescriptorEntry, DescriptorRegistry, RegistryError};

// ---------------------------------------------------------------------------
// SharedRegistry
// ---------------------------------------------------------------------------

/// Thread-safe facade over a [`DescriptorRegistry`].
///
/// Cloning is cheap and every clone sees the same registry. Lookups return
/// owned entries so no lock is held by the caller.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    registry: Arc<RwLock<DescriptorRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: DescriptorRegistry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
        }
    }

    /// Load a registry from disk and share it.
    pub fn open(persistence: &FilePersistence) -> Result<Self, RegistryError> {
        Ok(Self::new(persistence.load()?))
    }

    pub fn list_interfaces(&self) -> Vec<String> {
        self.registry.read().list_interfaces()
    }

    pub fn get_latest(&self, name: &str) -> Option<DescriptorEntry> {
        self.registry.read().get_latest(name).cloned()
    }

    pub fn get_revision(&self, name: &str, revision: u32) -> Option<DescriptorEntry> {
        self.registry.read().get_revision(name, revision).cloned()
    }

    pub fn list_revisions(&self, name: &str) -> Vec<u32> {
        self.registry.read().list_revisions(name)
    }

    pub fn register(
        &self,
        name: &str,
        descriptor: InterfaceDescriptor,
    ) -> Result<u32, RegistryError> {
        self.registry.write().register(name, descriptor)
    }

    pub fn register_interface(
        &self,
        name: &str,
        interface: &Interface,
    ) -> Result<u32, RegistryError> {
        self.registry.write().register_interface(name, interface)
    }

    /// Check a candidate against the latest registered revision.
    pub fn check_compatibility(
        &self,
        name: &str,
        descriptor: &InterfaceDescriptor,
    ) -> CompatibilityResult {
        self.registry.read().check_against_latest(name, descriptor)
    }

    /// Persist the current state.
    pub fn save(&self, persistence: &FilePersistence) -> Result<(), RegistryError> {
        persistence.save(&self.registry.read())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::{Compatibility, CompatibilityPolicy};
    use iface::Signature;
    use std::thread;

    fn descriptor(method: &str) -> InterfaceDescriptor {
        InterfaceDescriptor::new(vec![Signature::builder(method).build().unwrap()])
    }

    #[test]
    fn facade_delegates_to_registry() {
        let shared = SharedRegistry::default();
        assert_eq!(shared.register("svc", descriptor("a")).unwrap(), 1);

        let mut both = descriptor("a");
        both.methods.extend(descriptor("b").methods);
        assert_eq!(shared.register("svc", both.clone()).unwrap(), 2);

        assert_eq!(shared.list_interfaces(), vec!["svc"]);
        assert_eq!(shared.get_latest("svc").unwrap().revision, 2);
        assert_eq!(shared.get_revision("svc", 1).unwrap().descriptor, descriptor("a"));
        assert_eq!(shared.list_revisions("svc"), vec![1, 2]);
        assert!(shared.get_latest("unknown").is_none());

        let result = shared.check_compatibility("svc", &descriptor("a"));
        assert_eq!(result.compatibility, Compatibility::Forward);
    }

    #[test]
    fn concurrent_registration() {
        let shared = SharedRegistry::new(DescriptorRegistry::with_policy(CompatibilityPolicy::None));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || shared.register(&format!("svc-{}", i % 4), descriptor(&format!("m{}", i))))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        assert_eq!(shared.list_interfaces().len(), 4);
        for name in shared.list_interfaces() {
            assert_eq!(shared.list_revisions(&name), vec![1, 2]);
        }
    }

    #[test]
    fn save_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::new(dir.path().to_path_buf()).unwrap();

        let shared = SharedRegistry::new(DescriptorRegistry::with_policy(CompatibilityPolicy::Full));
        shared.register("svc", descriptor("a")).unwrap();
        shared.save(&persistence).unwrap();

        let reopened = SharedRegistry::open(&persistence).unwrap();
        assert_eq!(reopened.list_revisions("svc"), vec![1]);

        // Adding a method is only backward compatible.
        let mut both = descriptor("a");
        both.methods.extend(descriptor("b").methods);
        assert!(matches!(
            reopened.register("svc", both),
            Err(RegistryError::Incompatible { .. })
        ));
    }
}
