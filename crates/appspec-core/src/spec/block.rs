use indexmap::IndexMap;

use crate::kernel::constants::{
    FLAG_EXTEND, FLAG_EXTENDS, FLAG_LOCATION, FLAG_MAIN, FLAG_MAIN_TYPE, FLAG_NULLIFY_INHERITED,
    RESERVED_PREFIX,
};
use crate::object::{Factory, Value};
use crate::spec::{Location, Origin};

/// Control flags of a block. Unset flags fall back to their defaults.
#[derive(Debug, Clone, Default)]
pub struct BlockFlags {
    pub extend: Option<bool>,
    pub nullify_inherited: Option<bool>,
    pub main_type: Option<Factory>,
}

impl BlockFlags {
    /// Whether inherited entries are merged in (defaults to true)
    pub fn extends(&self) -> bool {
        self.extend.unwrap_or(true)
    }

    /// Whether inherited entries are nulled out (defaults to false)
    pub fn nullifies(&self) -> bool {
        self.nullify_inherited.unwrap_or(false)
    }
}

/// A named declaration: ordered entries plus control flags.
#[derive(Debug, Clone)]
pub struct SpecBlock {
    identity: String,
    entries: IndexMap<String, Value>,
    flags: BlockFlags,
    location: Option<Location>,
    invalid: Vec<String>,
}

impl SpecBlock {
    #[track_caller]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            entries: IndexMap::new(),
            flags: BlockFlags::default(),
            location: Some(Location::caller()),
            invalid: Vec::new(),
        }
    }

    /// Add an entry. Keys starting with `_` are read as control flags.
    pub fn entry(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if key.starts_with(RESERVED_PREFIX) {
            self.apply_flag(key, value);
        } else {
            self.entries.insert(key.to_string(), value);
        }
        self
    }

    /// Add a null entry, suppressing whatever was inherited under `key`
    pub fn null(self, key: &str) -> Self {
        self.entry(key, Value::Null)
    }

    pub fn extend(mut self, extend: bool) -> Self {
        self.flags.extend = Some(extend);
        self
    }

    pub fn nullify_inherited(mut self, nullify: bool) -> Self {
        self.flags.nullify_inherited = Some(nullify);
        self
    }

    pub fn main_type(mut self, factory: Factory) -> Self {
        self.flags.main_type = Some(factory);
        self
    }

    /// Override the captured source location
    pub fn at(mut self, file: &str, line: u32) -> Self {
        self.location = Some(Location::new(file, Some(line)));
        self
    }

    pub fn located(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    fn apply_flag(&mut self, key: &str, value: Value) {
        match (key, value) {
            (FLAG_EXTEND | FLAG_EXTENDS, Value::Bool(extend)) => self.flags.extend = Some(extend),
            (FLAG_NULLIFY_INHERITED, Value::Bool(nullify)) => self.flags.nullify_inherited = Some(nullify),
            (FLAG_MAIN | FLAG_MAIN_TYPE, Value::Factory(factory)) => self.flags.main_type = Some(factory),
            (FLAG_LOCATION, Value::Str(location)) => self.location = Some(Location::parse(&location)),
            (FLAG_EXTEND | FLAG_EXTENDS | FLAG_NULLIFY_INHERITED | FLAG_MAIN | FLAG_MAIN_TYPE | FLAG_LOCATION, other) => {
                self.invalid
                    .push(format!("flag '{}' can't be set to {} ({})", key, other.describe(), other.kind()));
            }
            (unknown, _) => self.invalid.push(format!("unknown control flag '{}'", unknown)),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn entries(&self) -> &IndexMap<String, Value> {
        &self.entries
    }

    pub fn flags(&self) -> &BlockFlags {
        &self.flags
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Problems found while reading control flags
    pub fn invalid_flags(&self) -> &[String] {
        &self.invalid
    }

    /// The declaration this block represents on `type_name`
    pub fn origin(&self, type_name: &str) -> Origin {
        Origin::declaration(type_name, &self.identity, self.location.clone())
    }
}
