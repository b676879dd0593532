//! Declarative component assembly.
//!
//! Application types declare named blocks (components to build, attributes
//! to copy, methods to delegate, objects to install, paths they require).
//! The [`Compiler`] merges them along the inheritance chain into a
//! [`CompiledType`]; an [`Instance`] of it is then created, validated,
//! installed and run by the kernel's orchestrator.
pub mod compiler;
pub mod kernel;
pub mod loader;
pub mod object;
pub mod spec;

pub use compiler::{BookKeeper, BlockHandler, CompiledType, Compiler, HandlerRegistry};
pub use kernel::error::Error as KernelError;
pub use kernel::{Instance, Result};
pub use loader::{Catalog, SpecLoader, TypeRegistry};
pub use object::{Callable, DynamicObject, Factory, Object, ObjectRef, Value};
pub use spec::{SpecBlock, TypeSpec};

#[cfg(test)]
mod tests;
