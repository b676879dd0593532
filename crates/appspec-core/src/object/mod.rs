//! # Appspec Object Model
//!
//! The runtime model specs are compiled against. An application instance,
//! the components it owns and the strategies it delegates to are all things
//! a dot-path can walk through, so they share a small attribute protocol:
//!
//! - [`Object`]: anything with named data attributes and named methods.
//! - [`Namespace`]: anything a dot-path can start from (objects and
//!   [`Instance`](crate::kernel::Instance)s).
//! - [`Value`]: what an attribute holds, including [`Callable`]s,
//!   [`BoundMethod`]s and [`Factory`]s (constructible types).
//! - [`resolve`]: the path resolver.
//! - [`LazyDelegate`]: the per-instance cache cell behind generated method
//!   delegates.
use std::fmt::Debug;
use std::sync::Arc;

use crate::kernel::error::{Error, Result};
use crate::kernel::Instance;

pub mod callable;
pub mod delegate;
pub mod dynamic;
pub mod path;
pub mod value;

pub use callable::{ArgumentError, BoundMethod, Callable, Factory, Kwargs, NativeFn, Param};
pub use delegate::{DelegateSpec, LazyDelegate};
pub use dynamic::DynamicObject;
pub use path::{resolve, resolve_all};
pub use value::Value;

/// Attribute protocol for anything that can sit on an application instance.
pub trait Object: Send + Sync + Debug {
    /// Name used in diagnostics
    fn type_name(&self) -> &str;

    /// Look up a data attribute
    fn attr(&self, name: &str) -> Option<Value>;

    /// Whether this object answers to a method of that name
    fn has_method(&self, _name: &str) -> bool {
        false
    }

    /// Invoke a method. `cx` is the application instance being assembled.
    fn call_method(&self, name: &str, _cx: &Instance, _args: Vec<Value>) -> Result<Value> {
        Err(Error::NoSuchMethod {
            object: self.type_name().to_string(),
            method: name.to_string(),
        })
    }
}

/// Shared handle to an object
pub type ObjectRef = Arc<dyn Object>;

/// Something a dot-path can be resolved against.
pub trait Namespace {
    /// Look up one path segment. `Ok(None)` means "no such attribute".
    fn lookup(&self, name: &str) -> Result<Option<Value>>;

    /// Human readable description used when resolution fails
    fn describe(&self) -> String;
}

impl Namespace for ObjectRef {
    fn lookup(&self, name: &str) -> Result<Option<Value>> {
        if let Some(value) = self.attr(name) {
            return Ok(Some(value));
        }
        if self.has_method(name) {
            return Ok(Some(Value::Method(BoundMethod::new(self.clone(), name))));
        }
        Ok(None)
    }

    fn describe(&self) -> String {
        format!("<{} object>", self.type_name())
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
