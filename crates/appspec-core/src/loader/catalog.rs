use std::sync::Arc;

use indexmap::IndexMap;

use crate::compiler::CompiledType;
use crate::kernel::error::{Error, Result};
use crate::object::{Callable, Factory};

/// Named factories and callables a spec document may refer to.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    factories: IndexMap<String, Factory>,
    callables: IndexMap<String, Callable>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under its own name
    pub fn factory(mut self, factory: Factory) -> Self {
        self.register_factory(factory);
        self
    }

    /// Register a callable under its own name
    pub fn callable(mut self, callable: Callable) -> Self {
        self.register_callable(callable);
        self
    }

    pub fn register_factory(&mut self, factory: Factory) -> Option<Factory> {
        self.factories.insert(factory.name().to_string(), factory)
    }

    pub fn register_callable(&mut self, callable: Callable) -> Option<Callable> {
        self.callables.insert(callable.name().to_string(), callable)
    }

    pub fn get_factory(&self, name: &str) -> Result<&Factory> {
        self.factories
            .get(name)
            .ok_or_else(|| Error::config("catalog", format!("No factory registered as '{}'", name)))
    }

    pub fn get_callable(&self, name: &str) -> Result<&Callable> {
        self.callables
            .get(name)
            .ok_or_else(|| Error::config("catalog", format!("No callable registered as '{}'", name)))
    }

    pub fn factory_names(&self) -> Vec<&str> {
        self.factories.keys().map(|name| name.as_str()).collect()
    }

    pub fn callable_names(&self) -> Vec<&str> {
        self.callables.keys().map(|name| name.as_str()).collect()
    }
}

/// Compiled types by name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, Arc<CompiledType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compiled type. Names are unique.
    pub fn register(&mut self, compiled: Arc<CompiledType>) -> Result<()> {
        let name = compiled.name().to_string();
        if self.types.contains_key(&name) {
            return Err(Error::config("registry", format!("Type '{}' is already registered", name)));
        }
        log::debug!("Registered type '{}'", name);
        self.types.insert(name, compiled);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<CompiledType>> {
        self.types.get(name).cloned().ok_or_else(|| {
            Error::config(
                "registry",
                format!(
                    "Unknown type '{}' (known: {})",
                    name,
                    self.names().join(", ")
                ),
            )
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.types.keys().map(|name| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
