//! # Appspec Kernel
//!
//! The `kernel` module turns a [`CompiledType`](crate::compiler::CompiledType)
//! into a running application object.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Instances**: [`Instance`] holds the per-instance state of a compiled
//!   type: materialized objects, runtime overrides and its own delegate cells.
//! - **Lifecycle**: the [`Orchestrator`](bootstrap::Orchestrator) in the
//!   `bootstrap` submodule drives an instance through
//!   `Created -> Validated -> Installed -> Running`.
//! - **Deferred objects**: the `component` submodule describes component
//!   groups and custom objects and knows how to build them.
//! - **Core Constants**: reserved flag names, handler names and defaults in
//!   `constants`.
//! - **Error Handling**: the crate-wide [`Error`](error::Error) and `Result`
//!   alias in `error`.
pub mod bootstrap;
pub mod component;
pub mod constants;
pub mod error;
pub mod instance;

pub use bootstrap::Orchestrator;
pub use component::{ComponentGroupDescriptor, ComponentSource, CustomDescriptor, Deferred};
pub use error::{Error, Result};
pub use instance::Instance;

// Test module declaration
#[cfg(test)]
mod tests;
