// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Model collaborators: handles that carry their own method tables and
//! loaders that resolve them by locator.

use crate::dispatch::MethodExecutor;
use crate::error::{BoxError, InterfaceError, LoaderError};
use crate::signature::Signature;
use crate::value::DynamicValue;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A loaded model exposing named methods with already-known signatures.
///
/// The handle is owned by whoever loaded it; an [`Interface`] only keeps
/// a reference.
///
/// [`Interface`]: crate::Interface
pub trait ModelHandle: Send + Sync {
    /// Declared methods, in declaration order.
    fn methods(&self) -> &[Signature];

    /// Invoke a method with arguments in signature order.
    fn call_method(&self, name: &str, args: Vec<DynamicValue>) -> Result<DynamicValue, BoxError>;

    /// Documentation for a method, if the model carries any.
    fn method_docs(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Resolves a locator to a loaded model.
pub trait ModelLoader: Send + Sync {
    fn load_by_uri(&self, uri: &str) -> Result<Arc<dyn ModelHandle>, LoaderError>;
}

// ---------------------------------------------------------------------------
// In-memory catalog
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum CatalogEntry {
    Model(Arc<dyn ModelHandle>),
    Object { kind: String },
}

/// In-memory [`ModelLoader`] keyed by locator.
///
/// Besides models, the catalog can hold placeholder objects of some other
/// kind so that loading them reports [`LoaderError::WrongKind`].
#[derive(Default)]
pub struct ModelCatalog {
    entries: RwLock<HashMap<String, CatalogEntry>>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a model under `uri`, replacing any previous entry.
    pub fn insert_model(&self, uri: impl Into<String>, model: Arc<dyn ModelHandle>) {
        let uri = uri.into();
        log::debug!("catalog: model stored at {}", uri);
        self.entries.write().insert(uri, CatalogEntry::Model(model));
    }

    /// Store a non-model object of the given kind under `uri`.
    pub fn insert_object(&self, uri: impl Into<String>, kind: impl Into<String>) {
        let uri = uri.into();
        let kind = kind.into();
        log::debug!("catalog: {} stored at {}", kind, uri);
        self.entries.write().insert(uri, CatalogEntry::Object { kind });
    }

    pub fn remove(&self, uri: &str) -> bool {
        self.entries.write().remove(uri).is_some()
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.entries.read().contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ModelLoader for ModelCatalog {
    fn load_by_uri(&self, uri: &str) -> Result<Arc<dyn ModelHandle>, LoaderError> {
        match self.entries.read().get(uri) {
            Some(CatalogEntry::Model(model)) => Ok(model.clone()),
            Some(CatalogEntry::Object { kind }) => Err(LoaderError::WrongKind {
                uri: uri.to_string(),
                kind: kind.clone(),
            }),
            None => Err(LoaderError::NotFound(uri.to_string())),
        }
    }
}

impl fmt::Debug for ModelCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        let mut uris: Vec<&String> = entries.keys().collect();
        uris.sort();
        f.debug_struct("ModelCatalog").field("uris", &uris).finish()
    }
}

// ---------------------------------------------------------------------------
// Closure-backed model
// ---------------------------------------------------------------------------

/// A [`ModelHandle`] whose methods are plain closures.
pub struct FnModel {
    methods: Vec<Signature>,
    executors: HashMap<String, Arc<dyn MethodExecutor>>,
    docs: HashMap<String, String>,
}

impl FnModel {
    pub fn builder() -> FnModelBuilder {
        FnModelBuilder::default()
    }
}

impl ModelHandle for FnModel {
    fn methods(&self) -> &[Signature] {
        &self.methods
    }

    fn call_method(&self, name: &str, args: Vec<DynamicValue>) -> Result<DynamicValue, BoxError> {
        let executor = self
            .executors
            .get(name)
            .ok_or_else(|| InterfaceError::UnknownMethod(name.to_string()))?;
        executor.call(args)
    }

    fn method_docs(&self, name: &str) -> Option<String> {
        self.docs.get(name).cloned()
    }
}

impl fmt::Debug for FnModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.methods.iter().map(Signature::name).collect();
        f.debug_struct("FnModel").field("methods", &names).finish()
    }
}

/// Builder for [`FnModel`].
#[derive(Default)]
pub struct FnModelBuilder {
    methods: Vec<(Signature, Arc<dyn MethodExecutor>)>,
    docs: HashMap<String, String>,
}

impl FnModelBuilder {
    /// Add a method.
    pub fn method<E: MethodExecutor>(mut self, signature: Signature, executor: E) -> Self {
        self.methods.push((signature, Arc::new(executor)));
        self
    }

    /// Attach documentation to a method.
    pub fn doc(mut self, name: impl Into<String>, docs: impl Into<String>) -> Self {
        self.docs.insert(name.into(), docs.into());
        self
    }

    /// Build the model. Method names must be unique.
    pub fn build(self) -> Result<FnModel, InterfaceError> {
        let mut methods = Vec::with_capacity(self.methods.len());
        let mut executors = HashMap::with_capacity(self.methods.len());
        for (signature, executor) in self.methods {
            let name = signature.name().to_string();
            if executors.insert(name.clone(), executor).is_some() {
                return Err(InterfaceError::DuplicateMethod(name));
            }
            methods.push(signature);
        }
        Ok(FnModel {
            methods,
            executors,
            docs: self.docs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PrimitiveKind, TypeDescriptor};

    fn echo_model() -> FnModel {
        let sig = Signature::builder("echo")
            .arg("x", TypeDescriptor::primitive(PrimitiveKind::Str))
            .build()
            .unwrap();
        FnModel::builder()
            .method(sig, |mut args: Vec<DynamicValue>| -> Result<DynamicValue, BoxError> {
                Ok(args.remove(0))
            })
            .doc("echo", "Return the argument.")
            .build()
            .unwrap()
    }

    #[test]
    fn fn_model_calls_and_docs() {
        let model = echo_model();
        assert_eq!(model.methods().len(), 1);
        assert_eq!(
            model.call_method("echo", vec!["hi".into()]).unwrap(),
            DynamicValue::from("hi")
        );
        assert!(model.call_method("nope", Vec::new()).is_err());
        assert_eq!(model.method_docs("echo").as_deref(), Some("Return the argument."));
        assert_eq!(model.method_docs("nope"), None);
    }

    #[test]
    fn fn_model_rejects_duplicate_names() {
        let sig = Signature::builder("f").build().unwrap();
        let noop = |_: Vec<DynamicValue>| -> Result<DynamicValue, BoxError> { Ok(DynamicValue::Null) };
        let err = FnModel::builder()
            .method(sig.clone(), noop)
            .method(sig, noop)
            .build()
            .unwrap_err();
        assert!(matches!(err, InterfaceError::DuplicateMethod(ref name) if name == "f"));
    }

    #[test]
    fn catalog_resolution() {
        let catalog = ModelCatalog::new();
        catalog.insert_model("mem://echo", Arc::new(echo_model()));
        catalog.insert_object("mem://dataset", "dataset");

        assert!(catalog.load_by_uri("mem://echo").is_ok());
        assert_eq!(
            catalog.load_by_uri("mem://dataset").err(),
            Some(LoaderError::WrongKind {
                uri: "mem://dataset".into(),
                kind: "dataset".into()
            })
        );
        assert_eq!(
            catalog.load_by_uri("mem://missing").err(),
            Some(LoaderError::NotFound("mem://missing".into()))
        );

        assert!(catalog.remove("mem://dataset"));
        assert_eq!(catalog.len(), 1);
    }
}
