// packages/interpose-engine/tests/interceptor_scenarios.rs
//! End-to-end scenarios through the `Interceptor` facade

use interpose_engine::interception::member_name;
use interpose_engine::{Class, EngineError, HookKind, Interceptor, Object, OperationTable};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

type Log = Mutex<Vec<Value>>;

fn push(object: &Object<Log>, value: Value) {
    object.state().lock().push(value);
}

fn snapshot(object: &Object<Log>) -> Value {
    Value::Array(object.state().lock().clone())
}

/// `first()`, `second(a, b)`, `third(a, b) { block }` on instances and
/// `zweit(a, b)`, `dritt(a, b) { block }` on the type
fn foo() -> Class<Log> {
    let class: Class<Log> = Class::new("Foo");
    class
        .define_method("first", |obj, _, _| {
            push(obj, json!("origin"));
            Ok(snapshot(obj))
        })
        .unwrap();
    class
        .define_method("second", |obj, args, _| {
            push(obj, json!("origin"));
            push(obj, Value::Array(args.to_vec()));
            Ok(snapshot(obj))
        })
        .unwrap();
    class
        .define_method("third", |obj, args, block| {
            push(obj, json!("origin"));
            if let Some(block) = block {
                push(obj, block(args)?);
            }
            Ok(snapshot(obj))
        })
        .unwrap();
    class
        .define_class_method("zweit", |_, args, _| Ok(json!(["origin", args])))
        .unwrap();
    class
        .define_class_method("dritt", |_, args, block| match block {
            Some(block) => Ok(json!(["origin", block(args)?])),
            None => Ok(json!(["origin"])),
        })
        .unwrap();
    class
}

fn wrapper_members<R>(table: &OperationTable<R>) -> Vec<String> {
    table
        .member_names()
        .into_iter()
        .filter(|name| name.starts_with(interpose_engine::interception::MEMBER_PREFIX))
        .collect()
}

#[test]
fn before_runs_ahead_of_origin() {
    let class = foo();
    let interceptor = Interceptor::new(&class);
    interceptor
        .before("second", |obj, call, _| {
            push(obj, json!("before"));
            push(obj, Value::Array(call.args.clone()));
            Ok(())
        })
        .unwrap();

    let object = class.new_instance(Log::default());
    let result = object.call("second", &[json!(1), json!(2)]).unwrap();
    assert_eq!(result, json!(["before", [1, 2], "origin", [1, 2]]));
}

#[test]
fn after_sees_args_and_result() {
    let class = foo();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let interceptor = Interceptor::new(&class);
    interceptor
        .after("second", move |_, call| {
            sink.lock().push(json!({
                "operation": call.operation,
                "args": call.args,
                "result": call.result,
            }));
            Ok(())
        })
        .unwrap();

    let object = class.new_instance(Log::default());
    let result = object.call("second", &[json!("a"), json!("b")]).unwrap();

    assert_eq!(result, json!(["origin", ["a", "b"]]));
    assert_eq!(
        *seen.lock(),
        vec![json!({
            "operation": "second",
            "args": ["a", "b"],
            "result": ["origin", ["a", "b"]],
        })]
    );
}

#[test]
fn stub_replaces_origin_exclusively() {
    let class = foo();
    let object = class.new_instance(Log::default());
    let interceptor = Interceptor::new(&object);
    interceptor
        .stub("first", |obj, _, _| {
            push(obj, json!("stub"));
            Ok(snapshot(obj))
        })
        .unwrap();

    assert_eq!(object.call("first", &[]).unwrap(), json!(["stub"]));
}

#[test]
fn stub_receives_block_and_original() {
    let class = foo();
    let object = class.new_instance(Log::default());
    let interceptor = Interceptor::new(&object);
    interceptor
        .stub("third", |obj, call, block| {
            push(obj, json!("stub"));
            call.original.call_with_block(&call.args, block)
        })
        .unwrap();

    let concat = |args: &[Value]| -> interpose_engine::Result<Value> {
        Ok(json!(format!("{}{}", args[0], args[1])))
    };
    let result = object
        .call_with_block("third", &[json!(1), json!(2)], &concat)
        .unwrap();
    assert_eq!(result, json!(["stub", "origin", "12"]));
}

#[test]
fn instance_wrapping_does_not_leak() {
    let class = foo();
    let wrapped = class.new_instance(Log::default());
    let sibling = class.new_instance(Log::default());

    Interceptor::new(&wrapped)
        .stub("first", |_, _, _| Ok(json!("stubbed")))
        .unwrap();

    assert_eq!(wrapped.call("first", &[]).unwrap(), json!("stubbed"));
    assert_eq!(sibling.call("first", &[]).unwrap(), json!(["origin"]));
    assert!(wrapper_members(class.methods()).is_empty());
    assert!(wrapper_members(sibling.singleton_methods()).is_empty());
    assert_eq!(
        wrapper_members(wrapped.singleton_methods()),
        vec![
            member_name(HookKind::Origin, "first"),
            member_name(HookKind::Stub, "first"),
        ]
    );
}

#[test]
fn type_wrapping_reaches_new_instances() {
    let class = foo();
    let interceptor = Interceptor::new(&class);
    interceptor.stub("first", |_, _, _| Ok(json!("stubbed"))).unwrap();

    let fresh = class.new_instance(Log::default());
    assert_eq!(fresh.call("first", &[]).unwrap(), json!("stubbed"));

    interceptor.restore(None, &[]).unwrap();
    assert_eq!(fresh.call("first", &[]).unwrap(), json!(["origin"]));
}

#[test]
fn instance_and_type_wrappers_compose() {
    let class = foo();
    let object = class.new_instance(Log::default());

    Interceptor::new(&class)
        .before("first", |obj, _, _| {
            push(obj, json!("type-before"));
            Ok(())
        })
        .unwrap();
    let on_object = Interceptor::new(&object);
    on_object
        .before("first", |obj, _, _| {
            push(obj, json!("instance-before"));
            Ok(())
        })
        .unwrap();

    assert_eq!(
        object.call("first", &[]).unwrap(),
        json!(["instance-before", "type-before", "origin"])
    );

    on_object.restore_all();
    object.state().lock().clear();
    assert_eq!(
        object.call("first", &[]).unwrap(),
        json!(["type-before", "origin"])
    );
    assert!(object.singleton_methods().member_names().is_empty());
}

#[test]
fn cbefore_runs_ahead_of_type_operation() {
    let class = foo();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let interceptor = Interceptor::new(&class);
    interceptor
        .cbefore("zweit", move |class, call, _| {
            sink.lock().push(json!(format!("before ({}) on {}", call.operation, class.name())));
            Ok(())
        })
        .unwrap();

    let table = class.class_methods();
    assert!(table.has_member(&member_name(HookKind::Origin, "zweit")));
    assert!(table.has_member(&member_name(HookKind::Before, "zweit")));
    assert!(!table.has_member(&member_name(HookKind::After, "zweit")));

    assert_eq!(
        class.call("zweit", &[json!(1), json!(2)]).unwrap(),
        json!(["origin", [1, 2]])
    );
    assert_eq!(*seen.lock(), vec![json!("before (zweit) on Foo")]);
}

#[test]
fn type_group_from_instance_targets_class_operations() {
    let class = foo();
    let object = class.new_instance(Log::default());

    let interceptor = Interceptor::new(&object);
    interceptor
        .cstub("dritt", |_, call, block| {
            let original = call.original.call_with_block(&call.args, block)?;
            Ok(json!(["cstub", original]))
        })
        .unwrap();

    let sum = |args: &[Value]| -> interpose_engine::Result<Value> {
        Ok(json!(args[0].as_i64().unwrap_or(0) + args[1].as_i64().unwrap_or(0)))
    };
    assert_eq!(
        class.call_with_block("dritt", &[json!(2), json!(3)], &sum).unwrap(),
        json!(["cstub", ["origin", 5]])
    );

    interceptor.crestore(Some("dritt"), &[HookKind::Stub]).unwrap();
    assert!(wrapper_members(class.class_methods()).is_empty());
}

#[test]
fn restore_single_wrapped_operation() {
    for kinds in [vec![HookKind::Before], vec![]] {
        let class = foo();
        let interceptor = Interceptor::new(&class);
        interceptor.before("first", |_, _, _| Ok(())).unwrap();

        interceptor.restore(Some("first"), &kinds).unwrap();
        assert!(wrapper_members(class.methods()).is_empty());
    }

    let class = foo();
    let interceptor = Interceptor::new(&class);
    interceptor.before("first", |_, _, _| Ok(())).unwrap();
    interceptor.restore(None, &[]).unwrap();
    assert!(wrapper_members(class.methods()).is_empty());
}

#[test]
fn restore_other_kind_keeps_wrapper() {
    let class = foo();
    let interceptor = Interceptor::new(&class);
    interceptor.before("first", |_, _, _| Ok(())).unwrap();

    interceptor.restore(Some("first"), &[HookKind::After]).unwrap();
    assert!(class.methods().has_member(&member_name(HookKind::Before, "first")));
    assert!(class.methods().has_member(&member_name(HookKind::Origin, "first")));
}

#[test]
fn restore_rejects_bad_arguments() {
    let class = foo();
    let interceptor = Interceptor::new(&class);
    interceptor.before("first", |_, _, _| Ok(())).unwrap();

    assert!(matches!(
        interceptor.restore(Some("second"), &[]),
        Err(EngineError::MissingTarget(_))
    ));
    assert!(matches!(
        "foo".parse::<HookKind>(),
        Err(EngineError::InvalidHookKind(_))
    ));
    assert!(matches!(
        interceptor.restore(Some("first"), &[HookKind::Origin]),
        Err(EngineError::InvalidHookKind(_))
    ));
}

#[test]
fn restore_one_of_two_operations() {
    let class = foo();
    let interceptor = Interceptor::new(&class);
    interceptor.before("first", |_, _, _| Ok(())).unwrap();
    interceptor.before("second", |_, _, _| Ok(())).unwrap();

    assert!(matches!(
        interceptor.restore(None, &[]),
        Err(EngineError::AmbiguousTarget { .. })
    ));
    assert!(matches!(
        interceptor.restore(Some("third"), &[]),
        Err(EngineError::MissingTarget(_))
    ));

    interceptor.restore(Some("second"), &[HookKind::After]).unwrap();
    assert_eq!(
        wrapper_members(class.methods()),
        vec![
            member_name(HookKind::Before, "first"),
            member_name(HookKind::Before, "second"),
            member_name(HookKind::Origin, "first"),
            member_name(HookKind::Origin, "second"),
        ]
    );

    interceptor.restore(Some("second"), &[HookKind::Before]).unwrap();
    assert_eq!(
        wrapper_members(class.methods()),
        vec![
            member_name(HookKind::Before, "first"),
            member_name(HookKind::Origin, "first"),
        ]
    );
}

#[test]
fn attach_to_unknown_operation_fails_cleanly() {
    let class = foo();
    let interceptor = Interceptor::new(&class);

    assert!(matches!(
        interceptor.observe_before("missing"),
        Err(EngineError::UnknownOperation { .. })
    ));
    assert!(matches!(
        interceptor.cobserve_after("first"),
        Err(EngineError::UnknownOperation { .. })
    ));
    assert!(wrapper_members(class.methods()).is_empty());
    assert!(wrapper_members(class.class_methods()).is_empty());
}

#[test]
fn subclass_wrapping_leaves_base_untouched() {
    let base = foo();
    let derived = base.subclass("Bar");

    let interceptor = Interceptor::new(&derived);
    interceptor.stub("first", |_, _, _| Ok(json!("bar"))).unwrap();

    assert_eq!(
        derived.new_instance(Log::default()).call("first", &[]).unwrap(),
        json!("bar")
    );
    assert_eq!(
        base.new_instance(Log::default()).call("first", &[]).unwrap(),
        json!(["origin"])
    );

    interceptor.restore_all();
    assert!(!derived.methods().contains("first"));
    assert!(derived.method_defined("first"));
}

#[test]
fn full_restore_recovers_original_names() {
    let class = foo();
    let interceptor = Interceptor::new(&class);
    interceptor
        .observe_before("first")
        .and_then(|i| i.observe_after("second"))
        .and_then(|i| i.stub("third", |_, _, _| Ok(Value::Null)))
        .and_then(|i| i.cobserve_before("zweit"))
        .unwrap();

    interceptor.restore_all().crestore_all();

    assert_eq!(class.methods().member_names(), vec!["first", "second", "third"]);
    assert_eq!(class.class_methods().member_names(), vec!["dritt", "zweit"]);
    let object = class.new_instance(Log::default());
    assert_eq!(
        object.call("second", &[json!(1), json!(2)]).unwrap(),
        json!(["origin", [1, 2]])
    );
}
