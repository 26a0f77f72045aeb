// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry for interface descriptors.
//!
//! Keeps the revision history of every named interface, checks each new
//! revision against the previous one and optionally persists the history
//! to disk.
//!
//! # Features
//!
//! - **Revision storage**: register and retrieve descriptors by name and revision
//! - **Compatibility checking**: classify method and argument changes
//!   (FULL, BACKWARD, FORWARD, BREAKING) and enforce a policy on register
//! - **Persistence**: one JSON file per revision
//! - **Shared access**: lock-guarded facade for concurrent hosts
//!
//! # Architecture
//!
//! ```text
//! Interface::get_descriptor()
//!        |
//!        v
//!   DescriptorRegistry (in-memory, policy-checked)
//!        |
//!        v
//!   FilePersistence (optional)
//! ```

pub mod compatibility;
pub mod persistence;
pub mod registry;
pub mod shared;

pub use compatibility::{check_compatibility, Compatibility, CompatibilityPolicy, CompatibilityResult};
pub use persistence::FilePersistence;
pub use registry::{DescriptorEntry, DescriptorRegistry, RegistryError};
pub use shared::SharedRegistry;
