// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared Interface Tests
//!
//! A hand-written service exposes a subset of its methods through the
//! builder. Covers dispatch, argument checks and the descriptor wire form.

use iface::types::{register_kind, required_field, DataType, PrimitiveKind};
use iface::{
    Arguments, BoxError, DynamicValue, IfaceConfig, Interface, InterfaceDescriptor,
    InterfaceError, Signature, TypeDescriptor, TypeError, VERSION,
};
use serde_json::{json, Map, Value as Json};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};

/// Custom structured kind carrying a single integer parameter.
#[derive(Debug)]
struct TestContainer {
    field: i64,
}

impl DataType for TestContainer {
    fn tag(&self) -> &str {
        "test_container"
    }

    fn fields(&self) -> Map<String, Json> {
        let mut map = Map::new();
        map.insert("field".to_string(), json!(self.field));
        map
    }

    fn serialize(&self, value: &DynamicValue) -> Result<Json, TypeError> {
        Ok(value.to_json())
    }

    fn deserialize(&self, wire: &Json) -> Result<DynamicValue, TypeError> {
        Ok(DynamicValue::from_json(wire))
    }
}

fn register_container() {
    static REGISTER: Once = Once::new();
    REGISTER.call_once(|| {
        register_kind("test_container", |fields| {
            let field = required_field("test_container", fields, "field")?
                .as_i64()
                .ok_or_else(|| TypeError::InvalidDescriptor {
                    kind: "test_container".into(),
                    reason: "field must be an integer".into(),
                })?;
            Ok(TypeDescriptor::new(TestContainer { field }))
        })
        .expect("test_container registers once");
    });
}

fn container() -> TypeDescriptor {
    TypeDescriptor::new(TestContainer { field: 5 })
}

/// Service with one exposed method and one private helper.
struct ContainerService {
    helper_calls: AtomicBool,
}

impl ContainerService {
    fn method1(&self, arg1: DynamicValue) -> DynamicValue {
        self.method2();
        arg1
    }

    fn method2(&self) {
        self.helper_calls.store(true, Ordering::SeqCst);
    }
}

fn service_interface(service: Arc<ContainerService>) -> Interface {
    register_container();
    let sig = Signature::builder("method1")
        .arg("arg1", container())
        .returns(container())
        .build()
        .expect("valid signature");

    Interface::builder()
        .expose(sig, move |mut args: Vec<DynamicValue>| -> Result<DynamicValue, BoxError> {
            Ok(service.method1(args.remove(0)))
        })
        .build()
        .expect("valid interface")
}

fn int() -> TypeDescriptor {
    TypeDescriptor::primitive(PrimitiveKind::Int)
}

fn calc_interface(invoked: Arc<AtomicBool>) -> Interface {
    let sig = Signature::builder("sub")
        .arg("a", int())
        .arg("b", int())
        .returns(int())
        .build()
        .expect("valid signature");

    Interface::builder()
        .expose(sig, move |args: Vec<DynamicValue>| -> Result<DynamicValue, BoxError> {
            invoked.store(true, Ordering::SeqCst);
            let a = args[0].as_i64().ok_or("a must be an integer")?;
            let b = args[1].as_i64().ok_or("b must be an integer")?;
            Ok(DynamicValue::from(a - b))
        })
        .build()
        .expect("valid interface")
}

fn args(pairs: &[(&str, DynamicValue)]) -> Arguments {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn container_scenario_executes_and_describes() {
    let service = Arc::new(ContainerService {
        helper_calls: AtomicBool::new(false),
    });
    let iface = service_interface(service.clone());

    let arg1 = DynamicValue::from_json(&json!({"field": 5}));
    let result = iface
        .execute("method1", &args(&[("arg1", arg1.clone())]))
        .unwrap();
    assert_eq!(result, arg1);
    assert!(service.helper_calls.load(Ordering::SeqCst));

    // The private helper never appears in the method table.
    assert_eq!(iface.get_method_names().unwrap(), vec!["method1"]);

    let wire = serde_json::to_value(iface.get_descriptor().unwrap()).unwrap();
    assert_eq!(
        wire,
        json!({
            "version": VERSION,
            "methods": {
                "method1": {
                    "name": "method1",
                    "args": [{"key": "arg1", "type": {"type": "test_container", "field": 5}}],
                    "returns": {"type": "test_container", "field": 5}
                }
            }
        })
    );
}

#[test]
fn descriptor_roundtrip_with_custom_kind() {
    let iface = service_interface(Arc::new(ContainerService {
        helper_calls: AtomicBool::new(false),
    }));
    let desc = iface.get_descriptor().unwrap();

    let back = InterfaceDescriptor::from_json(&desc.to_json().unwrap()).unwrap();
    assert_eq!(back, desc);
    assert_eq!(back.method("method1").and_then(Signature::returns), Some(&container()));
}

#[test]
fn descriptor_is_deterministic() {
    let iface = calc_interface(Arc::new(AtomicBool::new(false)));
    let first = iface.get_descriptor().unwrap();
    let second = iface.get_descriptor().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn missing_arguments_rejected_before_invocation() {
    let invoked = Arc::new(AtomicBool::new(false));
    let iface = calc_interface(invoked.clone());

    let err = iface
        .execute("sub", &args(&[("a", DynamicValue::from(1))]))
        .unwrap_err();
    match err {
        InterfaceError::MissingArguments { method, missing } => {
            assert_eq!(method, "sub");
            assert_eq!(missing, vec!["b".to_string()]);
        }
        other => panic!("expected MissingArguments, got {:?}", other),
    }
    assert!(!invoked.load(Ordering::SeqCst));
}

#[test]
fn extra_arguments_tolerated() {
    let iface = calc_interface(Arc::new(AtomicBool::new(false)));
    let base = args(&[("a", DynamicValue::from(7)), ("b", DynamicValue::from(2))]);
    let mut extra = base.clone();
    extra.insert("request_id".to_string(), DynamicValue::from("abc"));

    assert_eq!(
        iface.execute("sub", &base).unwrap(),
        iface.execute("sub", &extra).unwrap()
    );
}

#[test]
fn strict_arguments_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[dispatch]\nstrict_arguments = true").unwrap();
    let config = IfaceConfig::from_file(file.path()).unwrap();

    let sig = Signature::builder("neg").arg("x", int()).build().unwrap();
    let iface = Interface::builder()
        .with_config(&config)
        .expose(sig, |args: Vec<DynamicValue>| -> Result<DynamicValue, BoxError> {
            Ok(DynamicValue::from(-args[0].as_i64().ok_or("x")?))
        })
        .build()
        .unwrap();

    assert_eq!(
        iface.execute("neg", &args(&[("x", DynamicValue::from(3))])).unwrap(),
        DynamicValue::from(-3)
    );
    let err = iface
        .execute("neg", &args(&[("x", DynamicValue::from(3)), ("y", DynamicValue::from(1))]))
        .unwrap_err();
    assert!(err.to_string().contains("unexpected args y"));
}

#[test]
fn unknown_method_for_any_interface() {
    let empty = Interface::builder().build().unwrap();
    let calc = calc_interface(Arc::new(AtomicBool::new(false)));

    for iface in [&empty, &calc] {
        assert!(matches!(
            iface.execute("doesNotExist", &Arguments::new()),
            Err(InterfaceError::UnknownMethod(_))
        ));
    }
    assert!(empty.get_descriptor().unwrap().is_empty());
}

#[test]
fn execution_error_keeps_cause() {
    let iface = calc_interface(Arc::new(AtomicBool::new(false)));
    let err = iface
        .execute("sub", &args(&[("a", DynamicValue::from(1)), ("b", DynamicValue::from("x"))]))
        .unwrap_err();

    assert!(matches!(err, InterfaceError::ExecutionError { ref method, .. } if method == "sub"));
    let cause = std::error::Error::source(&err).expect("cause is kept");
    assert_eq!(cause.to_string(), "b must be an integer");
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn loaded_interface_shared_across_threads() {
    assert_send_sync::<Interface>();

    let iface = calc_interface(Arc::new(AtomicBool::new(false)));
    let expected = iface.get_descriptor().unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4i64)
            .map(|i| {
                let iface = &iface;
                let expected = &expected;
                scope.spawn(move || {
                    for j in 0..50i64 {
                        let result = iface
                            .execute(
                                "sub",
                                &args(&[("a", DynamicValue::from(i * 100 + j)), ("b", DynamicValue::from(j))]),
                            )
                            .unwrap();
                        assert_eq!(result, DynamicValue::from(i * 100));
                        assert_eq!(&iface.get_descriptor().unwrap(), expected);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    });
}
