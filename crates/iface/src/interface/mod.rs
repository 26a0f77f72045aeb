// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Interfaces: named collections of callable methods with typed signatures.
//!
//! One [`Interface`] type covers both ways of obtaining a method table:
//!
//! - **Declared**: methods are exposed explicitly through
//!   [`InterfaceBuilder`]. The interface is loaded from construction.
//! - **Derived**: methods are copied from a [`ModelHandle`], either given
//!   directly ([`Interface::from_model`]) or resolved by locator through a
//!   [`ModelLoader`] ([`Interface::derived`] followed by [`Interface::load`]).
//!
//! # State machine
//!
//! ```text
//! Unloaded --load ok--> Loaded --load ok--> Loaded (table replaced)
//!     |                    |
//!     +----load err--------+--> LoadError (terminal)
//! ```
//!
//! Method queries require `Loaded` and fail with
//! [`InterfaceError::NotLoaded`] otherwise.
//!
//! # Example
//!
//! ```rust
//! use iface::{BoxError, DynamicValue, Interface, Signature};
//! use iface::types::{PrimitiveKind, TypeDescriptor};
//! use std::collections::HashMap;
//!
//! let int = TypeDescriptor::primitive(PrimitiveKind::Int);
//! let add = Signature::builder("add")
//!     .arg("a", int.clone())
//!     .arg("b", int.clone())
//!     .returns(int)
//!     .build()?;
//!
//! let iface = Interface::builder()
//!     .expose(add, |args: Vec<DynamicValue>| -> Result<DynamicValue, BoxError> {
//!         let a = args[0].as_i64().ok_or("a")?;
//!         let b = args[1].as_i64().ok_or("b")?;
//!         Ok(DynamicValue::from(a + b))
//!     })
//!     .build()?;
//!
//! let mut call = HashMap::new();
//! call.insert("a".to_string(), DynamicValue::from(2));
//! call.insert("b".to_string(), DynamicValue::from(3));
//! assert_eq!(iface.execute("add", &call)?, DynamicValue::from(5));
//! # Ok::<(), iface::InterfaceError>(())
//! ```

mod model;
mod table;

pub use model::{FnModel, FnModelBuilder, ModelCatalog, ModelHandle, ModelLoader};

use crate::config::IfaceConfig;
use crate::descriptor::InterfaceDescriptor;
use crate::dispatch::{ArgumentPolicy, Arguments, BoundMethod, MethodExecutor};
use crate::error::{InterfaceError, Result};
use crate::signature::Signature;
use crate::types::TypeDescriptor;
use crate::value::DynamicValue;
use std::fmt;
use std::sync::Arc;
use table::{MethodEntry, MethodTable};

/// Load state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceState {
    /// No method table yet.
    Unloaded,
    /// Method table available.
    Loaded,
    /// Loading failed. Terminal.
    LoadError,
}

/// Where the method table comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Declared,
    Derived,
}

#[derive(Debug, Clone)]
struct LoadFailure {
    uri: String,
    reason: String,
}

/// A collection of callable methods with typed signatures.
pub struct Interface {
    kind: InterfaceKind,
    state: InterfaceState,
    table: MethodTable,
    policy: ArgumentPolicy,
    loader: Option<Arc<dyn ModelLoader>>,
    model: Option<Arc<dyn ModelHandle>>,
    source: Option<String>,
    failure: Option<LoadFailure>,
}

impl Interface {
    /// Start declaring methods explicitly.
    pub fn builder() -> InterfaceBuilder {
        InterfaceBuilder::new()
    }

    /// Create an unloaded interface that resolves its model through `loader`.
    pub fn derived(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            kind: InterfaceKind::Derived,
            state: InterfaceState::Unloaded,
            table: MethodTable::default(),
            policy: ArgumentPolicy::default(),
            loader: Some(loader),
            model: None,
            source: None,
            failure: None,
        }
    }

    /// Create a loaded interface over an already-loaded model.
    pub fn from_model(model: Arc<dyn ModelHandle>) -> Result<Self> {
        let table = MethodTable::from_model(&model)?;
        log::debug!("interface bound to model with {} methods", table.len());
        Ok(Self {
            kind: InterfaceKind::Derived,
            state: InterfaceState::Loaded,
            table,
            policy: ArgumentPolicy::default(),
            loader: None,
            model: Some(model),
            source: None,
            failure: None,
        })
    }

    pub fn kind(&self) -> InterfaceKind {
        self.kind
    }

    pub fn state(&self) -> InterfaceState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state == InterfaceState::Loaded
    }

    pub fn argument_policy(&self) -> ArgumentPolicy {
        self.policy
    }

    pub fn set_argument_policy(&mut self, policy: ArgumentPolicy) {
        self.policy = policy;
    }

    /// Locator of the last successful load, if any.
    pub fn source_uri(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The underlying model of a derived interface.
    pub fn model(&self) -> Option<&Arc<dyn ModelHandle>> {
        self.model.as_ref()
    }

    /// Bind to the model found at `uri`.
    ///
    /// Declared interfaces accept any locator and do nothing. A derived
    /// interface replaces its method table wholesale on success and moves
    /// to the terminal `LoadError` state on failure. An interface built
    /// with [`Interface::from_model`] has no loader and reports
    /// [`InterfaceError::NoLoader`] without changing state.
    ///
    /// Must not run concurrently with calls on the same interface.
    pub fn load(&mut self, uri: &str) -> Result<()> {
        if self.kind == InterfaceKind::Declared {
            log::debug!("declared interface ignores load from {}", uri);
            return Ok(());
        }
        if let Some(failure) = &self.failure {
            return Err(InterfaceError::LoadFailed {
                uri: failure.uri.clone(),
                reason: failure.reason.clone(),
            });
        }
        let loader = self
            .loader
            .clone()
            .ok_or_else(|| InterfaceError::NoLoader(uri.to_string()))?;

        let loaded = loader
            .load_by_uri(uri)
            .map_err(InterfaceError::from)
            .and_then(|model| MethodTable::from_model(&model).map(|table| (model, table)));

        match loaded {
            Ok((model, table)) => {
                log::info!("interface loaded from {} ({} methods)", uri, table.len());
                self.table = table;
                self.model = Some(model);
                self.source = Some(uri.to_string());
                self.state = InterfaceState::Loaded;
                Ok(())
            }
            Err(e) => {
                log::warn!("interface failed to load from {}: {}", uri, e);
                self.table = MethodTable::default();
                self.model = None;
                self.state = InterfaceState::LoadError;
                self.failure = Some(LoadFailure {
                    uri: uri.to_string(),
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn table(&self) -> Result<&MethodTable> {
        match self.state {
            InterfaceState::Loaded => Ok(&self.table),
            InterfaceState::Unloaded | InterfaceState::LoadError => Err(InterfaceError::NotLoaded),
        }
    }

    fn entry(&self, name: &str) -> Result<&MethodEntry> {
        self.table()?
            .get(name)
            .ok_or_else(|| InterfaceError::UnknownMethod(name.to_string()))
    }

    /// Method names in declaration order.
    pub fn get_method_names(&self) -> Result<Vec<String>> {
        Ok(self
            .table()?
            .entries()
            .iter()
            .map(|e| e.signature.name().to_string())
            .collect())
    }

    pub fn get_method_signature(&self, name: &str) -> Result<&Signature> {
        self.entry(name).map(|e| &e.signature)
    }

    /// A bound, ready-to-invoke wrapper for `name`.
    pub fn get_method_executor(&self, name: &str) -> Result<BoundMethod> {
        let entry = self.entry(name)?;
        Ok(BoundMethod::new(
            entry.signature.clone(),
            entry.executor.clone(),
            self.policy,
        ))
    }

    /// Argument keys and types of `name`, in order.
    pub fn get_method_args(&self, name: &str) -> Result<Vec<(&str, &TypeDescriptor)>> {
        Ok(self
            .get_method_signature(name)?
            .args()
            .iter()
            .map(|a| (a.key.as_str(), &a.ty))
            .collect())
    }

    pub fn get_method_returns(&self, name: &str) -> Result<Option<&TypeDescriptor>> {
        self.get_method_signature(name).map(Signature::returns)
    }

    pub fn get_method_docs(&self, name: &str) -> Result<Option<&str>> {
        self.entry(name).map(|e| e.docs.as_deref())
    }

    /// Iterate `(name, signature)` pairs in declaration order.
    pub fn iter_methods(&self) -> Result<impl Iterator<Item = (&str, &Signature)>> {
        Ok(self
            .table()?
            .entries()
            .iter()
            .map(|e| (e.signature.name(), &e.signature)))
    }

    /// Snapshot of the current method table.
    pub fn get_descriptor(&self) -> Result<InterfaceDescriptor> {
        Ok(InterfaceDescriptor::new(
            self.table()?.entries().iter().map(|e| e.signature.clone()),
        ))
    }

    /// Validate `args` against the signature of `method` and invoke it.
    pub fn execute(&self, method: &str, args: &Arguments) -> Result<DynamicValue> {
        self.get_method_executor(method)?.call(args)
    }
}

impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .table
            .entries()
            .iter()
            .map(|e| e.signature.name())
            .collect();
        f.debug_struct("Interface")
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("source", &self.source)
            .field("methods", &names)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for declared interfaces.
///
/// Exposure order is the method order reported by the interface.
pub struct InterfaceBuilder {
    entries: Vec<MethodEntry>,
    policy: ArgumentPolicy,
}

impl InterfaceBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            policy: ArgumentPolicy::default(),
        }
    }

    /// Apply settings from a loaded configuration.
    pub fn with_config(mut self, config: &IfaceConfig) -> Self {
        self.policy = config.argument_policy();
        self
    }

    pub fn argument_policy(mut self, policy: ArgumentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Expose a method.
    pub fn expose<E: MethodExecutor>(mut self, signature: Signature, executor: E) -> Self {
        self.entries.push(MethodEntry {
            signature,
            executor: Arc::new(executor),
            docs: None,
        });
        self
    }

    /// Expose a method with documentation.
    pub fn expose_with_docs<E: MethodExecutor>(
        mut self,
        signature: Signature,
        docs: impl Into<String>,
        executor: E,
    ) -> Self {
        self.entries.push(MethodEntry {
            signature,
            executor: Arc::new(executor),
            docs: Some(docs.into()),
        });
        self
    }

    /// Build the interface. Fails with `DuplicateMethod` if a name was
    /// exposed twice.
    pub fn build(self) -> Result<Interface> {
        let mut table = MethodTable::default();
        for entry in self.entries {
            log::debug!("exposing method '{}'", entry.signature.name());
            table.insert(entry)?;
        }
        Ok(Interface {
            kind: InterfaceKind::Declared,
            state: InterfaceState::Loaded,
            table,
            policy: self.policy,
            loader: None,
            model: None,
            source: None,
            failure: None,
        })
    }
}

impl Default for InterfaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
