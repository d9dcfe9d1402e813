use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{Value, json};

use webdriver_jsobject::{
    EnumerationScope, JsObject, JsObjectError, PropertyValue, Result as JsResult, ScriptExecutor,
};

/// Executor stub that records every script and replays canned responses.
#[derive(Clone, Default)]
struct ScriptedExecutor {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    calls: Vec<(String, Vec<Value>)>,
    responses: VecDeque<JsResult<Value>>,
}

impl ScriptedExecutor {
    fn new() -> Self {
        Self::default()
    }

    fn respond(self, value: Value) -> Self {
        self.state.lock().unwrap().responses.push_back(Ok(value));
        self
    }

    fn fail(self, error: JsObjectError) -> Self {
        self.state.lock().unwrap().responses.push_back(Err(error));
        self
    }

    fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.state.lock().unwrap().calls.clone()
    }

    fn scripts(&self) -> Vec<String> {
        self.calls().into_iter().map(|(script, _)| script).collect()
    }
}

impl ScriptExecutor for ScriptedExecutor {
    async fn execute_script(&self, script: &str, args: Vec<Value>) -> JsResult<Value> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((script.to_string(), args));
        state.responses.pop_front().unwrap_or(Ok(Value::Null))
    }
}

#[test]
fn empty_expression_is_rejected() {
    let err = JsObject::from_expression(ScriptedExecutor::new(), "   ").unwrap_err();
    assert!(matches!(err, JsObjectError::InvalidArgument(_)));
}

#[tokio::test]
async fn empty_property_name_is_rejected() {
    let handle = JsObject::from_expression(ScriptedExecutor::new(), "window").unwrap();
    let err = handle.get_as::<Value>("").await.unwrap_err();
    assert!(matches!(err, JsObjectError::InvalidArgument(_)));
}

#[tokio::test]
async fn get_decodes_primitive_properties() {
    let exec = ScriptedExecutor::new().respond(json!({"kind": "string", "value": "Mozilla"}));
    let navigator = JsObject::from_expression(exec.clone(), "navigator").unwrap();

    match navigator.get("userAgent").await.unwrap() {
        PropertyValue::Value(v) => assert_eq!(v, json!("Mozilla")),
        PropertyValue::Object(handle) => panic!("expected a primitive, got {handle:?}"),
    }

    let scripts = exec.scripts();
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains("(navigator).userAgent"));
}

#[tokio::test]
async fn get_wraps_objects_as_new_handles() {
    let exec = ScriptedExecutor::new()
        .respond(json!({"kind": "object"}))
        .respond(json!({"kind": "string", "value": "4g"}));
    let navigator = JsObject::from_expression(exec.clone(), "navigator").unwrap();

    let connection = navigator
        .get("connection")
        .await
        .unwrap()
        .into_object()
        .expect("object-typed property should wrap");
    assert_eq!(connection.definition(), "(navigator).connection");

    match connection.get("effectiveType").await.unwrap() {
        PropertyValue::Value(v) => assert_eq!(v, json!("4g")),
        PropertyValue::Object(handle) => panic!("expected a primitive, got {handle:?}"),
    }
    assert!(exec.scripts()[1].contains("((navigator).connection).effectiveType"));
}

#[tokio::test]
async fn null_properties_decode_as_null() {
    let exec = ScriptedExecutor::new().respond(json!({"kind": "null", "value": null}));
    let handle = JsObject::from_expression(exec, "document").unwrap();

    match handle.get("onclick").await.unwrap() {
        PropertyValue::Value(v) => assert_eq!(v, Value::Null),
        PropertyValue::Object(handle) => panic!("null must not wrap, got {handle:?}"),
    }
}

#[tokio::test]
async fn non_identifier_names_use_subscript_access() {
    let exec = ScriptedExecutor::new().respond(json!({"kind": "string", "value": "s"}));
    let handle = JsObject::from_value(exec.clone(), "string").unwrap();

    handle.get("0").await.unwrap();
    assert!(exec.scripts()[0].contains(r#"(arguments[0])["0"]"#));
}

#[tokio::test]
async fn names_with_quotes_are_json_escaped() {
    let exec = ScriptedExecutor::new().respond(json!({"kind": "undefined"}));
    let handle = JsObject::from_expression(exec.clone(), "window").unwrap();

    handle.get(r#"we"ird"#).await.unwrap();
    assert!(exec.scripts()[0].contains(r#"(window)["we\"ird"]"#));
}

#[tokio::test]
async fn bracketed_names_are_appended_verbatim() {
    let exec = ScriptedExecutor::new().respond(json!({"kind": "number", "value": 1}));
    let handle = JsObject::from_expression(exec.clone(), "list").unwrap();

    handle.get("[0]").await.unwrap();
    assert!(exec.scripts()[0].contains("(list)[0]"));
}

#[tokio::test]
async fn attribute_names_enumerate_own_properties() {
    let exec = ScriptedExecutor::new().respond(json!(["0", "1", "length"]));
    let handle = JsObject::from_value(exec.clone(), "ab").unwrap();

    let names = handle.attribute_names(EnumerationScope::Own).await.unwrap();
    assert_eq!(names, vec!["0", "1", "length"]);
    assert_eq!(
        exec.calls()[0].0,
        "return Object.getOwnPropertyNames((arguments[0]))"
    );
}

#[tokio::test]
async fn function_names_filter_browser_side_in_one_round_trip() {
    let exec = ScriptedExecutor::new().respond(json!(["startsWith", "endsWith"]));
    let handle = JsObject::from_value(exec.clone(), "ab").unwrap();

    let names = handle.function_names(EnumerationScope::All).await.unwrap();
    assert_eq!(names, vec!["startsWith", "endsWith"]);

    let scripts = exec.scripts();
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains("Object.getPrototypeOf"));
    assert!(scripts[0].contains(r#"typeof (arguments[0])[p] === "function""#));
}

#[tokio::test]
async fn depth_limited_enumeration_bounds_the_prototype_walk() {
    let exec = ScriptedExecutor::new().respond(json!([]));
    let handle = JsObject::from_expression(exec.clone(), "window").unwrap();

    handle
        .property_names(EnumerationScope::Depth(2))
        .await
        .unwrap();

    let script = &exec.scripts()[0];
    assert!(script.contains("let depth = 2"));
    assert!(script.contains(r#"typeof (window)[p] !== "function""#));
}

#[tokio::test]
async fn invoke_appends_argument_slots_after_bound_args() {
    let exec = ScriptedExecutor::new().respond(json!(true));
    let handle = JsObject::from_value(exec.clone(), "string").unwrap();

    let result = handle.invoke("startsWith", ("s",)).await.unwrap();
    assert_eq!(result, json!(true));

    let calls = exec.calls();
    assert_eq!(
        calls[0].0,
        "return (arguments[0]).startsWith(arguments[1])"
    );
    assert_eq!(calls[0].1, vec![json!("string"), json!("s")]);
}

#[tokio::test]
async fn invoke_without_arguments() {
    let exec = ScriptedExecutor::new().respond(json!("STRING"));
    let handle = JsObject::from_value(exec.clone(), "string").unwrap();

    let result = handle.invoke("toUpperCase", ()).await.unwrap();
    assert_eq!(result, json!("STRING"));
    assert_eq!(exec.calls()[0].0, "return (arguments[0]).toUpperCase()");
}

#[tokio::test]
async fn browser_side_throw_surfaces_as_remote_execution() {
    let exec = ScriptedExecutor::new().fail(JsObjectError::RemoteExecution(
        "javascript error: nosuchmethod is not a function".to_string(),
    ));
    let handle = JsObject::from_value(exec, "string").unwrap();

    let err = handle.invoke("nosuchmethod", ()).await.unwrap_err();
    assert!(matches!(err, JsObjectError::RemoteExecution(_)));
}

#[tokio::test]
async fn unserializable_invoke_arguments_fail_before_any_round_trip() {
    let mut keys = std::collections::HashMap::new();
    keys.insert(("a", 1), 2);

    let exec = ScriptedExecutor::new();
    let handle = JsObject::from_expression(exec.clone(), "window").unwrap();

    let err = handle.invoke("postMessage", (keys,)).await.unwrap_err();
    assert!(matches!(err, JsObjectError::Serialization(_)));
    assert!(exec.calls().is_empty());
}

#[tokio::test]
async fn call_invokes_the_wrapped_function_itself() {
    let exec = ScriptedExecutor::new()
        .respond(json!({"kind": "function"}))
        .respond(json!("done"));
    let handle = JsObject::from_expression(exec.clone(), "window").unwrap();

    let function = handle
        .get("close")
        .await
        .unwrap()
        .into_object()
        .expect("functions wrap as handles");
    let result = function.call(()).await.unwrap();

    assert_eq!(result, json!("done"));
    assert_eq!(exec.calls()[1].0, "return ((window).close)()");
}

#[tokio::test]
async fn materialize_snapshots_data_properties_in_browser_order() {
    let exec = ScriptedExecutor::new().respond(json!([["length", 2], ["0", "a"]]));
    let handle = JsObject::from_value(exec.clone(), "ab").unwrap();

    let pairs = handle.materialize(EnumerationScope::Own).await.unwrap();
    assert_eq!(
        pairs,
        vec![
            ("length".to_string(), json!(2)),
            ("0".to_string(), json!("a"))
        ]
    );
    assert!(exec.scripts()[0].contains("JSON.stringify"));
}

#[tokio::test]
async fn type_of_reports_the_remote_type() {
    let exec = ScriptedExecutor::new().respond(json!("string"));
    let handle = JsObject::from_value(exec.clone(), "ab").unwrap();

    assert_eq!(handle.type_of().await.unwrap(), "string");
    assert_eq!(exec.calls()[0].0, "return typeof (arguments[0])");
}

#[tokio::test]
async fn repeated_reads_reissue_the_same_script() {
    let exec = ScriptedExecutor::new().respond(json!(6)).respond(json!(6));
    let handle = JsObject::from_value(exec.clone(), "string").unwrap();

    let first: u64 = handle.get_as("length").await.unwrap();
    let second: u64 = handle.get_as("length").await.unwrap();
    assert_eq!(first, second);

    let scripts = exec.scripts();
    assert_eq!(scripts.len(), 2);
    assert_eq!(scripts[0], scripts[1]);
}

#[derive(Serialize)]
struct Payload {
    kind: &'static str,
    count: u32,
}

#[tokio::test]
async fn host_values_bind_to_the_first_argument_slot() {
    let exec = ScriptedExecutor::new().respond(json!("object"));
    let handle = JsObject::from_value(
        exec.clone(),
        Payload {
            kind: "probe",
            count: 3,
        },
    )
    .unwrap();

    assert_eq!(handle.definition(), "arguments[0]");
    handle.type_of().await.unwrap();
    assert_eq!(exec.calls()[0].1, vec![json!({"kind": "probe", "count": 3})]);
}

#[tokio::test]
async fn instantiate_builds_a_window_bound_instance() {
    let exec = ScriptedExecutor::new().respond(Value::Null);
    let handle = JsObject::instantiate(exec.clone(), "Date", "jsDate", (0,))
        .await
        .unwrap();

    assert_eq!(handle.definition(), "window.jsDate");
    let calls = exec.calls();
    assert_eq!(calls[0].0, "window.jsDate = new Date(arguments[0])");
    assert_eq!(calls[0].1, vec![json!(0)]);
}

#[tokio::test]
async fn instantiate_rejects_invalid_identifiers() {
    let err = JsObject::instantiate(ScriptedExecutor::new(), "Date", "not a name", ())
        .await
        .unwrap_err();
    assert!(matches!(err, JsObjectError::InvalidArgument(_)));
}
