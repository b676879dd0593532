//! # Appspec Compiler
//!
//! Turns a [`TypeSpec`] plus the compiled types it extends into a
//! [`CompiledType`]:
//!
//! 1. Ancestor layers are linearized (C3) from the direct bases.
//! 2. Blocks whose lowercased identity matches a registered [`BlockHandler`]
//!    are dispatched in handler-name order. Each handler sees the block's
//!    declared entries and what its ancestors declared under the same
//!    name, and records what it did into the layer's [`BookKeeper`].
//! 3. Every other block becomes a single custom object built from its
//!    `mainType` when an instance is created.
//! 4. Members declared by hand that shadow something an ancestor generated
//!    are recorded as replaced, and the ledger is normalised.
//!
//! Compilation is a pure function of its inputs; nothing is registered
//! globally.
use std::sync::Arc;

use indexmap::IndexMap;

use crate::kernel::component::CustomDescriptor;
use crate::kernel::error::{Error, ErrorContext, Result};
use crate::object::Value;
use crate::spec::{Origin, SpecBlock, TypeSpec};

pub mod bookkeeper;
pub mod conflict;
pub mod handler;
pub mod handlers;
pub mod layer;
pub mod linearize;

pub use bookkeeper::{BookKeeper, CheckerEntry, InstallerBlock, InstallerEntry, MethodEntry, Requirement};
pub use conflict::{ConflictDetector, ConflictType, NameConflict};
pub use handler::{BlockHandler, HandlerContext, HandlerRegistry, InheritedBlock};
pub use layer::{CompiledType, EffectiveBlock, Layer, LayerMember, Member, Provenance};

/// Compiles type specs against a handler registry.
#[derive(Debug, Default)]
pub struct Compiler {
    registry: HandlerRegistry,
}

/// What the bases declare under `name`. The keys are those visible through
/// the direct bases; each value comes from the first ancestor, in linearized
/// order, whose block still carries that key.
fn inherited_block(bases: &[Arc<CompiledType>], ancestors: &[Arc<Layer>], name: &str) -> InheritedBlock {
    let mut inherited = InheritedBlock::default();
    let visible: Vec<&EffectiveBlock> = bases.iter().filter_map(|base| base.block(name)).collect();
    if visible.is_empty() {
        return inherited;
    }

    let owned: Vec<&EffectiveBlock> = ancestors.iter().filter_map(|layer| layer.block(name)).collect();
    for key in visible.iter().copied().flat_map(|block| block.entries.keys()) {
        if inherited.entries.contains_key(key) {
            continue;
        }
        if let Some(value) = owned.iter().copied().find_map(|block| block.entries.get(key)) {
            inherited.entries.insert(key.clone(), value.clone());
        }
    }
    if visible.iter().any(|block| block.main_type.is_some()) {
        inherited.main_type = owned.iter().copied().find_map(|block| block.main_type.clone());
    }
    inherited
}

fn merged(inherited: &IndexMap<String, Value>, declared: &IndexMap<String, Value>) -> IndexMap<String, Value> {
    let mut entries = inherited.clone();
    for (key, value) in declared {
        entries.insert(key.clone(), value.clone());
    }
    entries
}

struct LayerBuilder {
    blocks: IndexMap<String, EffectiveBlock>,
    members: IndexMap<String, LayerMember>,
    bookkeeper: BookKeeper,
    conflicts: ConflictDetector,
}

impl LayerBuilder {
    /// Check, record and place the attributes a block produced.
    fn place(&mut self, origin: &Origin, produced: Vec<(String, Member)>) -> Result<()> {
        let names: Vec<String> = produced.iter().map(|(name, _)| name.clone()).collect();
        self.conflicts.ensure_free(origin, &names)?;

        for (name, member) in &produced {
            if let Member::Value(Value::Callable(callable)) = member {
                if !callable.required_paths().is_empty() {
                    self.bookkeeper
                        .add_requirement(callable.required_paths().iter().cloned(), name, origin);
                }
            }
        }

        self.bookkeeper.added_attributes(origin, &names);
        self.conflicts.generated(&names, origin);
        for (name, member) in produced {
            self.members.insert(
                name,
                LayerMember {
                    member,
                    origin: origin.clone(),
                },
            );
        }
        Ok(())
    }
}

impl Compiler {
    /// A compiler with the built-in handlers
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::with_defaults(),
        }
    }

    pub fn with_registry(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    /// Compile `spec` on top of its direct `bases`, in declaration order.
    pub fn compile(&self, mut spec: TypeSpec, bases: &[Arc<CompiledType>]) -> Result<Arc<CompiledType>> {
        let type_name = spec.name().to_string();
        log::debug!("Compiling type '{}' with {} base(s)", type_name, bases.len());

        let ancestors = linearize::ancestors(&type_name, bases)?;
        self.validate_blocks(&spec)?;

        let mut builder = LayerBuilder {
            blocks: IndexMap::new(),
            members: IndexMap::new(),
            bookkeeper: spec.take_bookkeeper().unwrap_or_default(),
            conflicts: ConflictDetector::new(),
        };
        builder.conflicts.hand_declared(
            spec.members()
                .keys()
                .map(|name| (name.as_str(), spec.member_origin(name))),
        );

        let (mut known, mut unknown): (Vec<&SpecBlock>, Vec<&SpecBlock>) = spec
            .blocks()
            .iter()
            .partition(|block| self.registry.contains(block.identity()));
        known.sort_by_key(|block| block.identity().to_lowercase());
        unknown.sort_by(|a, b| a.identity().cmp(b.identity()));

        for block in known {
            self.compile_known(&type_name, block, bases, &ancestors, &mut builder)?;
        }
        for block in unknown {
            self.compile_custom(&type_name, block, bases, &ancestors, &mut builder)?;
        }

        // Members declared by hand
        for (name, value) in spec.members() {
            let origin = spec.member_origin(name);
            if let Value::Callable(callable) = value {
                if !callable.required_paths().is_empty() {
                    builder
                        .bookkeeper
                        .add_requirement(callable.required_paths().iter().cloned(), name, &origin);
                }
            }
            builder.members.insert(
                name.clone(),
                LayerMember {
                    member: Member::Value(value.clone()),
                    origin,
                },
            );
        }

        let replaced: Vec<String> = spec
            .members()
            .keys()
            .filter(|name| builder.bookkeeper.added_by(name).is_none())
            .filter(|name| {
                ancestors
                    .iter()
                    .any(|layer| layer.bookkeeper().added_by(name).is_some())
            })
            .cloned()
            .collect();
        if !replaced.is_empty() {
            log::debug!("{} replaces generated attributes by hand: {:?}", type_name, replaced);
            builder.bookkeeper.replaced_attributes(&spec.origin(), &replaced);
        }
        builder.bookkeeper.normalise();

        let layer = Layer::new(
            type_name,
            spec.origin(),
            bases.iter().map(|base| base.name().to_string()).collect(),
            builder.blocks,
            builder.members,
            builder.bookkeeper,
        );
        let mut layers = Vec::with_capacity(ancestors.len() + 1);
        layers.push(Arc::new(layer));
        layers.extend(ancestors);
        Ok(Arc::new(CompiledType::new(layers)))
    }

    fn validate_blocks(&self, spec: &TypeSpec) -> Result<()> {
        let mut seen: IndexMap<String, &str> = IndexMap::new();
        for block in spec.blocks() {
            let origin = block.origin(spec.name());
            if !block.invalid_flags().is_empty() {
                let context = ErrorContext::new()
                    .origin(&origin)
                    .with("problems", block.invalid_flags().join("; "));
                return Err(Error::developer_with(
                    format!("Invalid control flags on '{}'", block.identity()),
                    context,
                ));
            }
            let lowered = block.identity().to_lowercase();
            if let Some(previous) = seen.insert(lowered, block.identity()) {
                let context = ErrorContext::new()
                    .origin(&origin)
                    .with("first", previous)
                    .with("second", block.identity());
                return Err(Error::developer_with(
                    format!("Blocks on '{}' may not differ only by case", spec.name()),
                    context,
                ));
            }
        }
        Ok(())
    }

    fn compile_known(
        &self,
        type_name: &str,
        block: &SpecBlock,
        bases: &[Arc<CompiledType>],
        ancestors: &[Arc<Layer>],
        builder: &mut LayerBuilder,
    ) -> Result<()> {
        let Some(handler) = self.registry.get(block.identity()) else {
            return Err(Error::developer(format!("No handler for '{}'", block.identity())));
        };
        let origin = block.origin(type_name);
        let flags = block.flags();

        if flags.extend == Some(false) && !handler.extendable() {
            let message = format!(
                "'{}' puts all its properties on the type being created, so extend doesn't make \
                 sense here. Override inherited properties to do nothing, or something different, instead",
                block.identity()
            );
            return Err(Error::developer_with(message, ErrorContext::new().origin(&origin)));
        }
        if flags.nullifies() && !handler.nullable() {
            let message = format!(
                "'{}' doesn't put its properties on the type being created. \
                 Use extend = false to drop inherited entries instead",
                block.identity()
            );
            return Err(Error::developer_with(message, ErrorContext::new().origin(&origin)));
        }

        let inherited = inherited_block(bases, ancestors, block.identity());
        log::debug!(
            "{}: handling '{}' with '{}' ({} inherited entries)",
            type_name,
            block.identity(),
            handler.name(),
            inherited.entries.len()
        );

        let produced = {
            let mut cx = HandlerContext {
                type_name,
                block,
                origin: &origin,
                inherited: &inherited,
                ancestors,
                bookkeeper: &mut builder.bookkeeper,
            };
            handler.handle(&mut cx)?
        };
        builder.place(&origin, produced)?;

        let keeps_inherited = !handler.extendable() || flags.extends();
        let effective = EffectiveBlock {
            identity: block.identity().to_string(),
            entries: if keeps_inherited {
                merged(&inherited.entries, block.entries())
            } else {
                block.entries().clone()
            },
            main_type: flags
                .main_type
                .clone()
                .or_else(|| keeps_inherited.then(|| inherited.main_type.clone()).flatten()),
            origin,
        };
        builder
            .blocks
            .insert(block.identity().to_lowercase(), effective);
        Ok(())
    }

    fn compile_custom(
        &self,
        type_name: &str,
        block: &SpecBlock,
        bases: &[Arc<CompiledType>],
        ancestors: &[Arc<Layer>],
        builder: &mut LayerBuilder,
    ) -> Result<()> {
        let origin = block.origin(type_name);
        let flags = block.flags();
        let inherited = inherited_block(bases, ancestors, block.identity());

        let entries = if flags.extends() && !flags.nullifies() {
            merged(&inherited.entries, block.entries())
        } else {
            block.entries().clone()
        };
        let main_type = flags.main_type.clone().or_else(|| {
            flags
                .extends()
                .then(|| inherited.main_type.clone())
                .flatten()
        });
        let Some(factory) = main_type else {
            return Err(Error::developer_with(
                format!("Component {} needs to have a mainType", block.identity()),
                ErrorContext::new().origin(&origin),
            ));
        };

        let identity = block.identity().to_lowercase();
        log::debug!(
            "{}: '{}' becomes custom object '{}' built by {}",
            type_name,
            block.identity(),
            identity,
            factory.signature()
        );
        if !factory.required_paths().is_empty() {
            builder
                .bookkeeper
                .add_requirement(factory.required_paths().iter().cloned(), &identity, &origin);
        }
        builder.place(&origin, vec![(identity.clone(), Member::Deferred)])?;
        builder.bookkeeper.add_custom(CustomDescriptor {
            identity: identity.clone(),
            block: block.identity().to_string(),
            factory: factory.clone(),
            kwargs: entries.clone(),
            origin: origin.clone(),
        });
        builder.blocks.insert(
            identity,
            EffectiveBlock {
                identity: block.identity().to_string(),
                entries,
                main_type: Some(factory),
                origin,
            },
        );
        Ok(())
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
