// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # iface - Interface description and dispatch
//!
//! Describe the callable surface of a model or service as typed
//! signatures, validate and dispatch calls against it, and export the
//! whole surface as a versioned, serializable descriptor for remote
//! callers.
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |  host object (model handle / hand-written service)          |
//! +-------------------------------------------------------------+
//!          | expose / load                 | call_method
//!          v                               ^
//! +-------------------------------------------------------------+
//! |  Interface  (Declared | Derived)  ->  MethodTable            |
//! |     execute(name, args)  ->  bind_arguments -> executor     |
//! +-------------------------------------------------------------+
//!          | get_descriptor
//!          v
//! +-------------------------------------------------------------+
//! |  InterfaceDescriptor { version, methods: name -> Signature } |
//! |  Signature { name, args: [ { key, type } ], returns }        |
//! |  TypeDescriptor { "type": tag, ...fields }                  |
//! +-------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Interface`] | Method table plus load state, entry point for calls |
//! | [`Signature`] | Ordered typed arguments and optional return type |
//! | [`TypeDescriptor`] | Tagged, structurally comparable data shape |
//! | [`InterfaceDescriptor`] | Wire-stable snapshot of an interface |
//! | [`ModelHandle`] / [`ModelLoader`] | Collaborators supplying derived methods |
//!
//! ## Quick Start
//!
//! ```rust
//! use iface::{BoxError, DynamicValue, FnModel, Interface, ModelCatalog, Signature};
//! use iface::types::{PrimitiveKind, TypeDescriptor};
//! use std::sync::Arc;
//!
//! let float = TypeDescriptor::primitive(PrimitiveKind::Float);
//! let model = FnModel::builder()
//!     .method(
//!         Signature::builder("predict").arg("x", float.clone()).returns(float).build()?,
//!         |args: Vec<DynamicValue>| -> Result<DynamicValue, BoxError> {
//!             Ok(DynamicValue::from(args[0].as_f64().ok_or("x")? * 2.0))
//!         },
//!     )
//!     .build()?;
//!
//! let catalog = Arc::new(ModelCatalog::new());
//! catalog.insert_model("mem://doubler", Arc::new(model));
//!
//! let mut iface = Interface::derived(catalog);
//! iface.load("mem://doubler")?;
//! assert_eq!(iface.get_method_names()?, vec!["predict"]);
//!
//! let json = iface.get_descriptor()?.to_json().expect("descriptor serializes");
//! assert!(json.contains("\"predict\""));
//! # Ok::<(), iface::InterfaceError>(())
//! ```

pub mod config;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod interface;
pub mod logging;
pub mod signature;
pub mod types;
pub mod value;

pub use config::{ConfigError, DispatchConfig, IfaceConfig, LoggingConfig};
pub use descriptor::{InterfaceDescriptor, VERSION};
pub use dispatch::{bind_arguments, ArgumentPolicy, Arguments, BoundMethod, MethodExecutor};
pub use error::{BoxError, InterfaceError, LoaderError, Result, TypeError};
pub use interface::{
    FnModel, FnModelBuilder, Interface, InterfaceBuilder, InterfaceKind, InterfaceState,
    ModelCatalog, ModelHandle, ModelLoader,
};
pub use signature::{Argument, Signature, SignatureBuilder};
pub use types::{DataType, Requirements, TypeDescriptor};
pub use value::DynamicValue;
