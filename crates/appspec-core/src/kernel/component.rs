use indexmap::IndexMap;

use crate::kernel::error::{BoxError, Error, ErrorContext, Result};
use crate::object::{DynamicObject, Factory, Kwargs, Value};
use crate::spec::Origin;

/// One entry of a component group: a type to construct, or a value to place as-is.
#[derive(Debug, Clone)]
pub enum ComponentSource {
    Factory(Factory),
    Value(Value),
}

impl From<Value> for ComponentSource {
    fn from(value: Value) -> Self {
        match value {
            Value::Factory(factory) => ComponentSource::Factory(factory),
            other => ComponentSource::Value(other),
        }
    }
}

/// A `components` block, built into one group object per instance.
#[derive(Debug, Clone)]
pub struct ComponentGroupDescriptor {
    pub identity: String,
    pub entries: IndexMap<String, ComponentSource>,
    pub origin: Origin,
}

impl ComponentGroupDescriptor {
    pub fn materialize(&self) -> Result<Value> {
        let mut group = DynamicObject::new(&self.identity);
        for (name, source) in &self.entries {
            let value = match source {
                ComponentSource::Factory(factory) => {
                    let kwargs = Kwargs::new();
                    factory.construct(&kwargs).map_err(|source| {
                        construction_error(&format!("{}.{}", self.identity, name), factory, &kwargs, &self.origin, source)
                    })?
                }
                ComponentSource::Value(value) => value.clone(),
            };
            group.insert_attr(name, value);
        }
        Ok(Value::object(group))
    }
}

/// An unknown block, built into a single object from its `mainType`.
#[derive(Debug, Clone)]
pub struct CustomDescriptor {
    /// Attribute name on the instance
    pub identity: String,
    /// The block it was declared with
    pub block: String,
    pub factory: Factory,
    pub kwargs: Kwargs,
    pub origin: Origin,
}

impl CustomDescriptor {
    pub fn materialize(&self) -> Result<Value> {
        self.factory
            .construct(&self.kwargs)
            .map_err(|source| construction_error(&self.block, &self.factory, &self.kwargs, &self.origin, source))
    }
}

/// Something a layer contributes that only exists once an instance does.
#[derive(Debug, Clone)]
pub enum Deferred {
    Components(ComponentGroupDescriptor),
    Custom(CustomDescriptor),
}

impl Deferred {
    pub fn identity(&self) -> &str {
        match self {
            Deferred::Components(group) => &group.identity,
            Deferred::Custom(custom) => &custom.identity,
        }
    }

    pub fn origin(&self) -> &Origin {
        match self {
            Deferred::Components(group) => &group.origin,
            Deferred::Custom(custom) => &custom.origin,
        }
    }

    pub fn materialize(&self) -> Result<Value> {
        match self {
            Deferred::Components(group) => group.materialize(),
            Deferred::Custom(custom) => custom.materialize(),
        }
    }
}

fn construction_error(name: &str, factory: &Factory, kwargs: &Kwargs, origin: &Origin, source: BoxError) -> Error {
    let calling = factory
        .location()
        .map(|location| format!("{} at {}", factory.name(), location))
        .unwrap_or_else(|| factory.name().to_string());
    let calling_with = kwargs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value.describe()))
        .collect::<Vec<_>>()
        .join(", ");
    let context = ErrorContext::new()
        .origin(origin)
        .with("calling", calling)
        .with("calling_with", format!("{{{}}}", calling_with))
        .with("callee_signature", factory.signature())
        .with("error", &source);
    Error::Developer {
        message: format!("Failed to create custom object '{}'", name),
        context,
        source: Some(source),
    }
}
