use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::compiler::bookkeeper::BookKeeper;
use crate::compiler::handlers;
use crate::compiler::layer::{Layer, Member};
use crate::kernel::error::{Error, Result};
use crate::object::{Factory, Value};
use crate::spec::{Origin, SpecBlock};

/// What a type inherits under a block name.
#[derive(Debug, Clone, Default)]
pub struct InheritedBlock {
    pub entries: IndexMap<String, Value>,
    pub main_type: Option<Factory>,
}

impl InheritedBlock {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.main_type.is_none()
    }
}

/// Everything a handler sees while processing one block.
pub struct HandlerContext<'a> {
    pub type_name: &'a str,
    pub block: &'a SpecBlock,
    pub origin: &'a Origin,
    pub inherited: &'a InheritedBlock,
    /// Linearized ancestors, nearest first
    pub ancestors: &'a [Arc<Layer>],
    pub bookkeeper: &'a mut BookKeeper,
}

impl HandlerContext<'_> {
    /// Inherited entries to null out when the block asks for it
    pub fn nulls_if_necessary(&self) -> IndexMap<String, Value> {
        if self.block.flags().nullifies() {
            self.inherited
                .entries
                .keys()
                .map(|key| (key.clone(), Value::Null))
                .collect()
        } else {
            IndexMap::new()
        }
    }

    /// Whether a null under `key` would hide a real inherited value, either
    /// from the same block or from whatever member the ancestors resolve it to.
    pub fn overrides_inherited(&self, key: &str) -> bool {
        if matches!(self.inherited.entries.get(key), Some(value) if !value.is_null()) {
            return true;
        }
        match self.ancestors.iter().find_map(|layer| layer.member(key)) {
            Some(inherited) => !matches!(inherited.member, Member::Value(Value::Null)),
            None => false,
        }
    }
}

/// Processes one kind of block for the compiler.
pub trait BlockHandler: Send + Sync {
    /// Lowercased block name this handler answers to
    fn name(&self) -> &str;

    /// Whether `extend = false` makes sense for this block
    fn extendable(&self) -> bool {
        true
    }

    /// Whether `nullify_inherited = true` makes sense for this block
    fn nullable(&self) -> bool {
        true
    }

    /// Attributes this block puts on the type, in order.
    fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<Vec<(String, Member)>>;
}

/// Block handlers keyed by lowercased name, iterated in lexicographic order.
pub struct HandlerRegistry {
    handlers: BTreeMap<String, Box<dyn BlockHandler>>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&String> = self.handlers.keys().collect();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &names)
            .finish()
    }
}

impl HandlerRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// A registry with the built-in handlers
    pub fn with_defaults() -> Self {
        let mut handlers: BTreeMap<String, Box<dyn BlockHandler>> = BTreeMap::new();
        for handler in handlers::builtin() {
            handlers.insert(handler.name().to_lowercase(), handler);
        }
        Self { handlers }
    }

    /// Register a handler. Each lowercased name can be registered once.
    pub fn register(&mut self, handler: Box<dyn BlockHandler>) -> Result<()> {
        let name = handler.name().to_lowercase();
        if self.handlers.contains_key(&name) {
            return Err(Error::developer(format!("Declaration for {} specified twice", name)));
        }
        log::debug!("Registered block handler '{}'", name);
        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn BlockHandler> {
        self.handlers.get(&name.to_lowercase()).map(|handler| handler.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(&name.to_lowercase())
    }

    /// Registered names in dispatch order
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(|name| name.as_str()).collect()
    }

    pub fn count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
