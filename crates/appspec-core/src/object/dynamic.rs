use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::kernel::error::{Error, Result};
use crate::kernel::Instance;
use crate::object::{NativeFn, Object, Value};

/// An attribute bag with named native methods.
///
/// Component groups are built as one of these, and it is the quickest way to
/// give an application a small collaborator without writing an [`Object`]
/// impl by hand.
#[derive(Clone)]
pub struct DynamicObject {
    type_name: String,
    attrs: IndexMap<String, Value>,
    methods: IndexMap<String, Arc<NativeFn>>,
}

impl DynamicObject {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attrs: IndexMap::new(),
            methods: IndexMap::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn with_method<F>(mut self, name: &str, method: F) -> Self
    where
        F: Fn(&Instance, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.to_string(), Arc::new(method));
        self
    }

    pub fn insert_attr(&mut self, name: &str, value: Value) -> Option<Value> {
        self.attrs.insert(name.to_string(), value)
    }

    pub fn attrs(&self) -> &IndexMap<String, Value> {
        &self.attrs
    }

    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(|name| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicObject")
            .field("type_name", &self.type_name)
            .field("attrs", &self.attrs)
            .field("methods", &self.method_names())
            .finish()
    }
}

impl Object for DynamicObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn attr(&self, name: &str) -> Option<Value> {
        self.attrs.get(name).cloned()
    }

    fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    fn call_method(&self, name: &str, cx: &Instance, args: Vec<Value>) -> Result<Value> {
        match self.methods.get(name) {
            Some(method) => method(cx, args),
            None => Err(Error::NoSuchMethod {
                object: self.type_name.clone(),
                method: name.to_string(),
            }),
        }
    }
}
