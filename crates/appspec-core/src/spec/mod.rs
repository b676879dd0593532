//! # Appspec Spec Authoring
//!
//! The typed description an application is assembled from. A [`TypeSpec`]
//! names a type, its hand-declared members and an ordered list of
//! [`SpecBlock`]s; each block is an ordered set of entries plus the control
//! [`BlockFlags`]. Specs are plain values: they are built with the builder
//! methods here or produced by the [`loader`](crate::loader), and only take
//! effect once handed to the [`Compiler`](crate::compiler::Compiler).
pub mod block;
pub mod origin;
pub mod type_spec;

pub use block::{BlockFlags, SpecBlock};
pub use origin::{Location, Origin};
pub use type_spec::TypeSpec;

// Test module declaration
#[cfg(test)]
mod tests;
