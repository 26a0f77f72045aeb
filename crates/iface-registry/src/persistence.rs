// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compatibility::CompatibilityPolicy;
use crate::registry::{DescriptorEntry, DescriptorRegistry, RegistryError};

/// Registry-wide settings kept next to the interface directories.
const SETTINGS_FILE: &str = "registry.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistrySettings {
    #[serde(default)]
    policy: CompatibilityPolicy,
}

// ---------------------------------------------------------------------------
// FilePersistence
// ---------------------------------------------------------------------------

/// File-based persistence for `DescriptorRegistry`.
///
/// Stores each revision as a JSON file at:
///   `{directory}/{encoded_name}/r{revision}.json`
///
/// and the compatibility policy in `{directory}/registry.json`. Names are
/// percent-encoded so distinct names never share a directory.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    directory: PathBuf,
}

fn io_error(what: impl Display, e: impl Display) -> RegistryError {
    RegistryError::Io(format!("{}: {}", what, e))
}

impl FilePersistence {
    /// Create a new `FilePersistence` rooted at the given directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new(directory: PathBuf) -> Result<Self, RegistryError> {
        fs::create_dir_all(&directory).map_err(|e| {
            io_error(format!("failed to create directory {}", directory.display()), e)
        })?;
        Ok(FilePersistence { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Persist the entire registry to disk. Existing files are overwritten.
    pub fn save(&self, registry: &DescriptorRegistry) -> Result<(), RegistryError> {
        let settings = RegistrySettings {
            policy: registry.policy(),
        };
        let settings_path = self.directory.join(SETTINGS_FILE);
        let json = serde_json::to_string_pretty(&settings)
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;
        fs::write(&settings_path, json)
            .map_err(|e| io_error(format!("failed to write {}", settings_path.display()), e))?;

        for (name, revisions) in registry.inner() {
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            let interface_dir = self.directory.join(encode_name(name));
            fs::create_dir_all(&interface_dir).map_err(|e| {
                io_error(format!("failed to create {}", interface_dir.display()), e)
            })?;

            for entry in revisions {
                let path = interface_dir.join(format!("r{}.json", entry.revision));
                let json = serde_json::to_string_pretty(entry)
                    .map_err(|e| RegistryError::Serialization(e.to_string()))?;
                fs::write(&path, json)
                    .map_err(|e| io_error(format!("failed to write {}", path.display()), e))?;
            }
        }
        log::debug!(
            "saved {} interfaces to {}",
            registry.interface_count(),
            self.directory.display()
        );
        Ok(())
    }

    /// Load a registry from disk.
    ///
    /// Scans every subdirectory for `r*.json` files and restores the saved
    /// policy. Without a settings file the default policy applies.
    pub fn load(&self) -> Result<DescriptorRegistry, RegistryError> {
        let policy = self.load_settings()?.policy;
        let mut interfaces: HashMap<String, Vec<DescriptorEntry>> = HashMap::new();

        let entries = fs::read_dir(&self.directory).map_err(|e| {
            io_error(format!("failed to read directory {}", self.directory.display()), e)
        })?;

        for dir_entry in entries {
            let path = dir_entry
                .map_err(|e| io_error("directory entry error", e))?
                .path();
            if !path.is_dir() {
                continue;
            }

            let mut revisions = Self::load_revisions(&path)?;
            revisions.sort_by_key(|e| e.revision);

            let Some(first) = revisions.first() else {
                continue;
            };
            let name = first.name.clone();
            let dir_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if name.is_empty() || dir_name != encode_name(&name) {
                return Err(RegistryError::Serialization(format!(
                    "{}: holds revisions of {:?}",
                    path.display(),
                    name
                )));
            }
            if let Some(stray) = revisions.iter().find(|e| e.name != name) {
                return Err(RegistryError::Serialization(format!(
                    "{}: mixes revisions of {:?} and {:?}",
                    path.display(),
                    name,
                    stray.name
                )));
            }
            interfaces.insert(name, revisions);
        }

        Ok(DescriptorRegistry::from_raw(interfaces, policy))
    }

    fn load_settings(&self) -> Result<RegistrySettings, RegistryError> {
        let path = self.directory.join(SETTINGS_FILE);
        if !path.is_file() {
            return Ok(RegistrySettings::default());
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| io_error(format!("failed to read {}", path.display()), e))?;
        serde_json::from_str(&json)
            .map_err(|e| RegistryError::Serialization(format!("{}: {}", path.display(), e)))
    }

    fn load_revisions(dir: &Path) -> Result<Vec<DescriptorEntry>, RegistryError> {
        let files = fs::read_dir(dir)
            .map_err(|e| io_error(format!("failed to read {}", dir.display()), e))?;

        let mut revisions = Vec::new();
        for file in files {
            let path = file.map_err(|e| io_error("revision file entry error", e))?.path();

            let is_revision = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('r') && n.ends_with(".json"));
            if !is_revision {
                continue;
            }

            let json = fs::read_to_string(&path)
                .map_err(|e| io_error(format!("failed to read {}", path.display()), e))?;
            let entry: DescriptorEntry = serde_json::from_str(&json).map_err(|e| {
                RegistryError::Serialization(format!("{}: {}", path.display(), e))
            })?;
            revisions.push(entry);
        }
        Ok(revisions)
    }
}

/// Encode an interface name as a directory name.
///
/// ASCII alphanumerics, `-` and `_` pass through; every other byte becomes
/// `%XX`. The mapping is injective and never yields `.` or `..`.
fn encode_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
