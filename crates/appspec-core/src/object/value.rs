use std::fmt;
use std::sync::Arc;

use crate::kernel::error::{Error, Result};
use crate::kernel::Instance;
use crate::object::{BoundMethod, Callable, Factory, Namespace, Object, ObjectRef};

/// What an attribute or a spec entry holds.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Object(ObjectRef),
    Callable(Callable),
    Method(BoundMethod),
    /// A constructible type
    Factory(Factory),
}

impl Value {
    /// Wrap a concrete object
    pub fn object<O: Object + 'static>(object: O) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Callable(_) | Value::Method(_) | Value::Factory(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    pub fn as_factory(&self) -> Option<&Factory> {
        match self {
            Value::Factory(factory) => Some(factory),
            _ => None,
        }
    }

    /// Short name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Callable(_) => "callable",
            Value::Method(_) => "method",
            Value::Factory(_) => "factory",
        }
    }

    /// Repr-style rendering for diagnostics
    pub fn describe(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => format!("'{}'", s),
            Value::List(items) => format!(
                "[{}]",
                items.iter().map(Value::describe).collect::<Vec<_>>().join(", ")
            ),
            Value::Object(object) => object.describe(),
            Value::Callable(callable) => format!("<callable {}>", callable.name()),
            Value::Method(method) => method.describe(),
            Value::Factory(factory) => format!("<factory {}>", factory.name()),
        }
    }

    /// Requirement paths carried by a `requires` marker
    pub fn required_paths(&self) -> &[String] {
        match self {
            Value::Callable(callable) => callable.required_paths(),
            _ => &[],
        }
    }

    /// Look up an attribute on this value. Only objects have attributes.
    pub fn lookup(&self, name: &str) -> Result<Option<Value>> {
        match self {
            Value::Object(object) => object.lookup(name),
            _ => Ok(None),
        }
    }

    /// Call this value with the instance as context
    pub fn invoke(&self, cx: &Instance, args: Vec<Value>) -> Result<Value> {
        match self {
            Value::Callable(callable) => callable.call(cx, args),
            Value::Method(method) => method.call(cx, args),
            Value::Factory(factory) if args.is_empty() => {
                factory
                    .construct(&Default::default())
                    .map_err(|source| Error::CallFailed {
                        target: factory.name().to_string(),
                        source,
                    })
            }
            other => Err(Error::NotCallable {
                target: other.describe(),
                value: other.kind().to_string(),
            }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => f.write_str(&other.describe()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            (Value::Method(a), Value::Method(b)) => a.ptr_eq(b),
            (Value::Factory(a), Value::Factory(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Callable(callable)
    }
}

impl From<BoundMethod> for Value {
    fn from(method: BoundMethod) -> Self {
        Value::Method(method)
    }
}

impl From<Factory> for Value {
    fn from(factory: Factory) -> Self {
        Value::Factory(factory)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
