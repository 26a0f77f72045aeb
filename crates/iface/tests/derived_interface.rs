// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Derived Interface Tests
//!
//! Methods come from a model resolved through a loader. Covers the load
//! state machine and verbatim copying of the model's method table.

use iface::types::{NdarrayType, NumberKind, PrimitiveKind};
use iface::{
    Arguments, BoxError, DynamicValue, FnModel, Interface, InterfaceError, InterfaceKind,
    InterfaceState, ModelCatalog, Signature, TypeDescriptor,
};
use std::sync::Arc;

fn features() -> TypeDescriptor {
    TypeDescriptor::new(NdarrayType::batched(&[3], NumberKind::F64))
}

fn classifier() -> FnModel {
    let predict = Signature::builder("predict")
        .arg("data", features())
        .returns(TypeDescriptor::list(TypeDescriptor::primitive(PrimitiveKind::Int)))
        .build()
        .unwrap();
    let predict_proba = Signature::builder("predict_proba")
        .arg("data", features())
        .build()
        .unwrap();

    FnModel::builder()
        .method(predict, |args: Vec<DynamicValue>| -> Result<DynamicValue, BoxError> {
            let rows = args[0].as_sequence().ok_or("data must be a batch")?;
            Ok(DynamicValue::Sequence(
                rows.iter().map(|_| DynamicValue::from(1)).collect(),
            ))
        })
        .method(predict_proba, |_: Vec<DynamicValue>| -> Result<DynamicValue, BoxError> {
            Err("probabilities unavailable".into())
        })
        .doc("predict", "Predict class labels.")
        .build()
        .unwrap()
}

fn catalog() -> Arc<ModelCatalog> {
    let catalog = Arc::new(ModelCatalog::new());
    catalog.insert_model("mem://classifier", Arc::new(classifier()));
    catalog.insert_object("mem://train.csv", "dataset");
    catalog
}

#[test]
fn queries_before_load_fail() {
    let iface = Interface::derived(catalog());
    assert_eq!(iface.kind(), InterfaceKind::Derived);
    assert_eq!(iface.state(), InterfaceState::Unloaded);
    assert!(matches!(iface.get_method_names(), Err(InterfaceError::NotLoaded)));
    assert!(matches!(iface.get_descriptor(), Err(InterfaceError::NotLoaded)));
    assert!(matches!(
        iface.execute("predict", &Arguments::new()),
        Err(InterfaceError::NotLoaded)
    ));
}

#[test]
fn load_copies_model_methods_in_order() {
    let mut iface = Interface::derived(catalog());
    iface.load("mem://classifier").unwrap();

    assert_eq!(iface.state(), InterfaceState::Loaded);
    assert_eq!(iface.source_uri(), Some("mem://classifier"));
    assert_eq!(
        iface.get_method_names().unwrap(),
        vec!["predict", "predict_proba"]
    );

    let model = iface.model().expect("model kept after load");
    assert_eq!(model.methods()[0], *iface.get_method_signature("predict").unwrap());
    assert_eq!(iface.get_method_returns("predict_proba").unwrap(), None);
    assert_eq!(
        iface.get_method_docs("predict").unwrap(),
        Some("Predict class labels.")
    );
    assert_eq!(iface.get_descriptor().unwrap().requirements().len(), 1);
}

#[test]
fn execute_forwards_to_model() {
    let mut iface = Interface::derived(catalog());
    iface.load("mem://classifier").unwrap();

    let mut call = Arguments::new();
    call.insert(
        "data".to_string(),
        DynamicValue::from_json(&serde_json::json!([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])),
    );
    let out = iface.execute("predict", &call).unwrap();
    assert_eq!(out.as_sequence().map(<[DynamicValue]>::len), Some(2));

    let err = iface.execute("predict_proba", &call).unwrap_err();
    assert!(matches!(err, InterfaceError::ExecutionError { .. }));
    assert!(err.to_string().contains("probabilities unavailable"));
}

#[test]
fn load_of_non_model_is_terminal() {
    let mut iface = Interface::derived(catalog());
    let err = iface.load("mem://train.csv").unwrap_err();
    assert!(matches!(
        err,
        InterfaceError::InvalidSourceKind { ref kind, .. } if kind == "dataset"
    ));
    assert!(err.to_string().contains("only be created from models"));
    assert_eq!(iface.state(), InterfaceState::LoadError);

    // A later load does not recover the instance.
    assert!(matches!(
        iface.load("mem://classifier"),
        Err(InterfaceError::LoadFailed { ref uri, .. }) if uri == "mem://train.csv"
    ));
    assert!(matches!(iface.get_method_names(), Err(InterfaceError::NotLoaded)));
}

#[test]
fn load_of_missing_locator() {
    let mut iface = Interface::derived(catalog());
    assert!(matches!(
        iface.load("mem://nowhere"),
        Err(InterfaceError::NotFound(ref uri)) if uri == "mem://nowhere"
    ));
    assert_eq!(iface.state(), InterfaceState::LoadError);
}

#[test]
fn reload_replaces_table() {
    let catalog = catalog();
    let echo = FnModel::builder()
        .method(
            Signature::builder("echo")
                .arg("x", TypeDescriptor::primitive(PrimitiveKind::Str))
                .build()
                .unwrap(),
            |mut args: Vec<DynamicValue>| -> Result<DynamicValue, BoxError> { Ok(args.remove(0)) },
        )
        .build()
        .unwrap();
    catalog.insert_model("mem://echo", Arc::new(echo));

    let mut iface = Interface::derived(catalog);
    iface.load("mem://classifier").unwrap();
    let before = iface.get_descriptor().unwrap();

    iface.load("mem://echo").unwrap();
    assert_eq!(iface.get_method_names().unwrap(), vec!["echo"]);
    assert!(matches!(
        iface.get_method_signature("predict"),
        Err(InterfaceError::UnknownMethod(_))
    ));
    assert_ne!(iface.get_descriptor().unwrap(), before);
}

#[test]
fn from_model_is_loaded_immediately() {
    let iface = Interface::from_model(Arc::new(classifier())).unwrap();
    assert!(iface.is_loaded());
    assert_eq!(iface.get_method_names().unwrap().len(), 2);
}
