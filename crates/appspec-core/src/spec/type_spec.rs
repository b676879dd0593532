use indexmap::IndexMap;

use crate::compiler::BookKeeper;
use crate::object::{Callable, Value};
use crate::spec::{Location, Origin, SpecBlock};

/// Everything declared on one application type.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    name: String,
    blocks: Vec<SpecBlock>,
    members: IndexMap<String, Value>,
    location: Option<Location>,
    bookkeeper: Option<BookKeeper>,
}

impl TypeSpec {
    #[track_caller]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
            members: IndexMap::new(),
            location: Some(Location::caller()),
            bookkeeper: None,
        }
    }

    pub fn block(mut self, block: SpecBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Declare a member by hand, bypassing the compiler
    pub fn member(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.members.insert(name.to_string(), value.into());
        self
    }

    /// Declare a callable member under its own name
    pub fn method(mut self, callable: Callable) -> Self {
        self.members.insert(callable.name().to_string(), Value::Callable(callable));
        self
    }

    /// Start from an explicitly declared ledger instead of an empty one
    pub fn bookkeeper(mut self, bookkeeper: BookKeeper) -> Self {
        self.bookkeeper = Some(bookkeeper);
        self
    }

    pub fn located(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blocks(&self) -> &[SpecBlock] {
        &self.blocks
    }

    pub fn members(&self) -> &IndexMap<String, Value> {
        &self.members
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn origin(&self) -> Origin {
        Origin::of_type(&self.name, self.location.clone())
    }

    /// Origin of a hand-declared member. Callables remember their own location.
    pub fn member_origin(&self, name: &str) -> Origin {
        let location = match self.members.get(name) {
            Some(Value::Callable(callable)) => callable.location().cloned(),
            _ => None,
        }
        .or_else(|| self.location.clone());
        Origin::member(&self.name, name, location)
    }

    pub(crate) fn take_bookkeeper(&mut self) -> Option<BookKeeper> {
        self.bookkeeper.take()
    }
}
