//! Handles over JavaScript values living in a browser execution context.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{JsObjectError, Result};
use crate::executor::ScriptExecutor;
use crate::script;

/// How far property enumeration walks the prototype chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationScope {
    /// Own property names only.
    Own,
    /// The full prototype chain.
    All,
    /// At most this many prototype links past the object itself.
    Depth(usize),
}

/// A handle to a JavaScript value inside a browser execution context.
///
/// The handle stores a definition expression (a JS source fragment, possibly
/// referencing `arguments[N]` slots bound to host values) and re-evaluates it
/// remotely on every access. Nothing is cached and no remote reference is
/// held, so dropping a handle needs no browser-side cleanup.
pub struct JsObject<E> {
    executor: E,
    definition: String,
    args: Vec<Value>,
}

impl<E> fmt::Debug for JsObject<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsObject<{}>", self.definition)
    }
}

/// Result of a property read.
pub enum PropertyValue<E> {
    /// A primitive decoded from the browser's JSON response.
    Value(Value),
    /// An object- or function-typed value, re-wrapped as a handle over the
    /// composite member path.
    Object(JsObject<E>),
}

impl<E> PropertyValue<E> {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Object(_) => None,
        }
    }

    pub fn into_object(self) -> Option<JsObject<E>> {
        match self {
            Self::Value(_) => None,
            Self::Object(handle) => Some(handle),
        }
    }
}

impl<E> fmt::Debug for PropertyValue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "PropertyValue::Value({value})"),
            Self::Object(handle) => write!(f, "PropertyValue::Object({handle:?})"),
        }
    }
}

#[derive(serde::Deserialize)]
struct ProbeReport {
    kind: String,
    #[serde(default)]
    value: Option<Value>,
}

/// Serializes invocation arguments into WebDriver argument values.
///
/// Tuples and sequences spread into one value per element, `()` and `None`
/// mean no arguments, and anything else is passed as the single argument.
fn collect_args(args: impl Serialize) -> Result<Vec<Value>> {
    match serde_json::to_value(args)? {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        single => Ok(vec![single]),
    }
}

impl<E: ScriptExecutor> JsObject<E> {
    /// Wraps the value produced by evaluating `expression` in the browser.
    ///
    /// No remote call happens here; the expression is evaluated lazily on
    /// each access.
    pub fn from_expression(executor: E, expression: impl Into<String>) -> Result<Self> {
        Self::with_args(executor, expression, Vec::new())
    }

    /// Wraps a host value by binding it to the `arguments[0]` slot.
    ///
    /// The value is serialized once and re-sent with every access, so the
    /// remote side always sees the same JSON clone.
    pub fn from_value(executor: E, value: impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        Self::with_args(executor, script::arg_slot(0), vec![value])
    }

    /// Wraps `expression` with `args` bound to its `arguments[N]` slots.
    pub fn with_args(executor: E, expression: impl Into<String>, args: Vec<Value>) -> Result<Self> {
        let expression = expression.into();
        if expression.trim().is_empty() {
            return Err(JsObjectError::InvalidArgument(
                "definition expression must not be empty".to_string(),
            ));
        }
        Ok(Self {
            executor,
            definition: expression,
            args,
        })
    }

    /// Creates a remote `new class(...)` instance bound to `window.<var>`
    /// and returns a handle over it.
    pub async fn instantiate(
        executor: E,
        class: &str,
        var: &str,
        ctor_args: impl Serialize,
    ) -> Result<Self> {
        if !script::is_identifier(class) {
            return Err(JsObjectError::InvalidArgument(format!(
                "`{class}` is not a valid constructor name"
            )));
        }
        if !script::is_identifier(var) {
            return Err(JsObjectError::InvalidArgument(format!(
                "`{var}` is not a valid variable name"
            )));
        }
        let args = collect_args(ctor_args)?;
        let stmt = script::construct(class, var, args.len());
        debug!(script = %stmt, "instantiating remote object");
        executor.execute_script(&stmt, args).await?;
        Self::from_expression(executor, format!("window.{var}"))
    }

    /// The stored definition expression.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// `typeof` of the resolved value.
    pub async fn type_of(&self) -> Result<String> {
        let fragment = format!("return typeof {}", self.root());
        let value = self.run(&fragment, Vec::new()).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// All property names of the resolved value, in the browser's
    /// enumeration order. The order is not stable across engines.
    pub async fn attribute_names(&self, scope: EnumerationScope) -> Result<Vec<String>> {
        self.enumerate(scope, script::NameFilter::Any).await
    }

    /// Property names whose values are callable.
    pub async fn function_names(&self, scope: EnumerationScope) -> Result<Vec<String>> {
        self.enumerate(scope, script::NameFilter::Callable).await
    }

    /// Property names whose values are not callable.
    pub async fn property_names(&self, scope: EnumerationScope) -> Result<Vec<String>> {
        self.enumerate(scope, script::NameFilter::NotCallable).await
    }

    /// Reads the property `name` and deserializes it into `T`.
    ///
    /// Unlike [`get`](Self::get) this forces the value through the driver's
    /// JSON clone, so it only suits JSON-representable values.
    pub async fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.member_path(name)?;
        let value = self.run(&format!("return {path}"), Vec::new()).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Invokes the member `name` as a method of the resolved value.
    ///
    /// Invocation arguments are appended as fresh `arguments[N]` slots after
    /// the handle's own bound arguments. Calling a missing or non-callable
    /// member throws in the browser and surfaces as
    /// [`RemoteExecution`](JsObjectError::RemoteExecution).
    pub async fn invoke(&self, name: &str, args: impl Serialize) -> Result<Value> {
        let path = self.member_path(name)?;
        let extra = collect_args(args)?;
        let fragment = script::call(&path, self.args.len(), extra.len());
        self.run(&fragment, extra).await
    }

    /// [`invoke`](Self::invoke), deserialized into `T`.
    pub async fn invoke_as<T: DeserializeOwned>(
        &self,
        name: &str,
        args: impl Serialize,
    ) -> Result<T> {
        Ok(serde_json::from_value(self.invoke(name, args).await?)?)
    }

    /// Calls the resolved value itself as a function.
    pub async fn call(&self, args: impl Serialize) -> Result<Value> {
        let extra = collect_args(args)?;
        let fragment = script::call(&self.root(), self.args.len(), extra.len());
        self.run(&fragment, extra).await
    }

    /// Snapshots the data properties under `scope` into `(name, value)`
    /// pairs in one round trip.
    ///
    /// Callables and values the browser cannot JSON-encode are skipped.
    pub async fn materialize(&self, scope: EnumerationScope) -> Result<Vec<(String, Value)>> {
        let fragment = script::snapshot(&self.root(), scope);
        let value = self.run(&fragment, Vec::new()).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn enumerate(
        &self,
        scope: EnumerationScope,
        filter: script::NameFilter,
    ) -> Result<Vec<String>> {
        let fragment = script::names(&self.root(), scope, filter);
        let value = self.run(&fragment, Vec::new()).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn member_path(&self, name: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(JsObjectError::InvalidArgument(
                "property name must not be empty".to_string(),
            ));
        }
        Ok(script::member(&self.root(), name))
    }

    fn root(&self) -> String {
        format!("({})", self.definition)
    }

    async fn run(&self, fragment: &str, extra: Vec<Value>) -> Result<Value> {
        let mut args = self.args.clone();
        args.extend(extra);
        debug!(script = %fragment, args = args.len(), "executing script");
        self.executor.execute_script(fragment, args).await
    }
}

impl<E: ScriptExecutor + Clone> JsObject<E> {
    /// Reads the property `name`.
    ///
    /// Primitives come back decoded; object- and function-typed values come
    /// back as a new handle over the composite member path, sharing this
    /// handle's session and bound arguments. One round trip either way.
    pub async fn get(&self, name: &str) -> Result<PropertyValue<E>> {
        let path = self.member_path(name)?;
        let value = self.run(&script::probe(&path), Vec::new()).await?;
        let report: ProbeReport = serde_json::from_value(value)?;
        match report.kind.as_str() {
            "object" | "function" => Ok(PropertyValue::Object(Self {
                executor: self.executor.clone(),
                definition: path,
                args: self.args.clone(),
            })),
            _ => Ok(PropertyValue::Value(report.value.unwrap_or(Value::Null))),
        }
    }
}

impl JsObject<fantoccini::Client> {
    /// Wraps a located element as a handle rooted at `arguments[0]`.
    ///
    /// The element serializes to its W3C reference form, which the driver
    /// resolves back to the live DOM node on every access.
    pub fn from_element(
        client: fantoccini::Client,
        element: &fantoccini::elements::Element,
    ) -> Result<Self> {
        let reference = serde_json::to_value(element)?;
        Self::with_args(client, script::arg_slot(0), vec![reference])
    }
}
