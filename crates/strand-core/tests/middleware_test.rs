use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use serde_json::{Value, json};

use strand_core::{
    Action, ActionError, ActionResult, Dependencies, DynAction, Field, Input, Middleware,
    MiddlewareDescriptor, MiddlewareError, MiddlewareOverrides,
};

fn concat() -> Action {
    Action::from_async(|args: Vec<Value>| async move {
        Ok(json!(format!("abc{}", args[0].as_str().unwrap_or_default())))
    })
}

struct Add;

#[async_trait]
impl DynAction for Add {
    async fn invoke(&self, args: Vec<Value>) -> ActionResult {
        let x = args.first().and_then(Value::as_i64).unwrap_or_default();
        let y = args.get(1).and_then(Value::as_i64).unwrap_or_default();
        Ok(json!(x + y))
    }
}

#[tokio::test]
async fn init_then_apply_resolves() {
    let mw = Middleware::init("name", "service", Dependencies::none(), concat()).unwrap();
    assert_eq!(mw.apply(json!(["z"])).await.unwrap(), json!("abcz"));
}

#[test]
fn init_accepts_every_dependency_form() {
    assert!(Middleware::init("name", "service", Dependencies::none(), concat()).is_ok());
    assert!(Middleware::init("name", "service", "some Middleware", concat()).is_ok());
    assert!(
        Middleware::init(
            "name",
            "service",
            ["some Middleware 1", "some Middleware 2"],
            concat()
        )
        .is_ok()
    );
}

#[test]
fn numeric_name_is_a_type_error() {
    let err = Middleware::from_inputs(vec![
        json!(1).into(),
        "service".into(),
        json!([]).into(),
        concat().into(),
    ])
    .unwrap_err();
    assert_eq!(err, MiddlewareError::InvalidFieldType { field: Field::Name });
}

#[test]
fn numeric_dependencies_are_a_type_error() {
    let err = Middleware::from_inputs(vec![
        "name".into(),
        "service".into(),
        json!(123).into(),
        concat().into(),
    ])
    .unwrap_err();
    assert_eq!(
        err,
        MiddlewareError::InvalidFieldType {
            field: Field::Dependencies
        }
    );
}

#[test]
fn object_action_is_a_type_error() {
    let inputs: Vec<Input> = vec![
        "name".into(),
        "service".into(),
        json!(["dependency 1", "dependency 2", "dependency 3"]).into(),
        json!({}).into(),
    ];
    let err = Middleware::from_inputs(inputs).unwrap_err();
    assert_eq!(err.field(), Some(Field::Action));
}

#[tokio::test]
async fn apply_and_call_resolve_to_sum() {
    let mw = Middleware::init(
        "name",
        "service",
        ["dependency 1", "dependency 2", "dependency 3"],
        Action::from_dyn(Add),
    )
    .unwrap();

    assert_eq!(mw.apply(json!([13, 31])).await.unwrap(), json!(44));
    assert_eq!(mw.call([13, 31]).await.unwrap(), json!(44));
}

#[tokio::test]
async fn failure_message_survives() {
    let mw = Middleware::init(
        "name",
        "service",
        Dependencies::none(),
        Action::from_async(|_args| async { Err(ActionError::new("boom")) }),
    )
    .unwrap();

    assert_eq!(mw.apply(json!([13, 31])).await.unwrap_err().to_string(), "boom");
    assert_eq!(mw.call([13, 31]).await.unwrap_err().to_string(), "boom");
}

#[tokio::test]
async fn shapes_are_invisible_to_the_caller() {
    let shapes = vec![
        Action::from_dyn(Add),
        Action::from_sync(|args| {
            let total: i64 = args.iter().filter_map(Value::as_i64).sum();
            Ok(json!(total))
        }),
        Action::from_stream(|args: Vec<Value>| {
            let total: i64 = args.iter().filter_map(Value::as_i64).sum();
            stream::iter(vec![Ok(json!(total))])
        }),
    ];

    let mut results = Vec::new();
    for action in shapes {
        let mw = Middleware::new("name", "service", Dependencies::none(), action).unwrap();
        results.push(mw.call([13, 31]).await.unwrap());
    }
    assert_eq!(results, vec![json!(44), json!(44), json!([44])]);
}

#[tokio::test]
async fn shared_middleware_serves_concurrent_callers() {
    let mw =
        Middleware::init("name", "service", Dependencies::none(), Action::from_dyn(Add)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let mw = Arc::clone(&mw);
            tokio::spawn(async move { mw.call([i, i]).await })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let out = handle.await.unwrap().unwrap();
        assert_eq!(out, json!(2 * i as i64));
    }
}

fn boom(_args: Vec<Value>) -> ActionResult {
    panic!("async boom")
}

#[tokio::test]
async fn panicking_async_action_fails_inside_spawned_task() {
    let mw = Middleware::init(
        "name",
        "service",
        Dependencies::none(),
        Action::from_async(|args| async move { boom(args) }),
    )
    .unwrap();

    let handle = tokio::spawn(async move { mw.call([13, 31]).await });
    let result = handle.await.expect("task must not panic");
    assert_eq!(result.unwrap_err().to_string(), "async boom");
}

#[test]
fn every_write_is_refused() {
    let mw = Middleware::init(
        "name",
        "service",
        ["dependency 1", "dependency 2", "dependency 3"],
        concat(),
    )
    .unwrap();

    assert!(mw.set_name("name_new").is_err());
    assert!(mw.set_service("service_new").is_err());
    assert!(mw.set_dependencies(["dependency new 4", "dependency new 5"]).is_err());
    assert!(mw.set_action(Action::from_sync(|_args| Ok(Value::Null))).is_err());
}

#[test]
fn clone_with_overrides_leaves_source_alone() {
    let mw = Middleware::init(
        "name",
        "service",
        ["dependency 1", "dependency 2", "dependency 3"],
        concat(),
    )
    .unwrap();

    let copy = mw
        .clone_with(
            MiddlewareOverrides::new()
                .with_name("name_copy")
                .with_dependencies(["dependency new 4", "dependency new 5"]),
        )
        .unwrap();

    assert_eq!(copy.name(), "name_copy");
    assert_eq!(copy.service(), "service");
    assert_eq!(copy.dependencies(), vec!["dependency new 4", "dependency new 5"]);
    assert!(Arc::ptr_eq(copy.action(), mw.action()));

    assert_eq!(mw.name(), "name");
    assert_eq!(
        mw.dependencies(),
        vec!["dependency 1", "dependency 2", "dependency 3"]
    );
}

#[test]
fn descriptor_from_json_builds_middleware() {
    let json = r#"{ "name": "auth", "service": "gateway", "dependencies": ["session"] }"#;
    let descriptor: MiddlewareDescriptor = serde_json::from_str(json).unwrap();

    let mw = Middleware::from_descriptor(descriptor.clone(), concat()).unwrap();
    assert_eq!(mw.descriptor(), descriptor);
}
