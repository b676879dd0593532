use std::sync::Arc;

use indexmap::IndexMap;

use crate::compiler::bookkeeper::{BookKeeper, CheckerEntry, InstallerEntry, MethodEntry, Requirement};
use crate::kernel::component::Deferred;
use crate::object::{DelegateSpec, Factory, Value};
use crate::spec::Origin;

/// What a layer puts under an attribute name.
#[derive(Debug, Clone)]
pub enum Member {
    /// A plain value, including callables
    Value(Value),
    /// A lazy method delegate, realized per instance
    Delegate(DelegateSpec),
    /// A component group or custom object, realized per instance
    Deferred,
}

#[derive(Debug, Clone)]
pub struct LayerMember {
    pub member: Member,
    pub origin: Origin,
}

/// A block as a layer ended up with it, after merging with what it inherited.
#[derive(Debug, Clone)]
pub struct EffectiveBlock {
    pub identity: String,
    pub entries: IndexMap<String, Value>,
    pub main_type: Option<Factory>,
    pub origin: Origin,
}

/// One type in an inheritance chain. Immutable once compiled.
#[derive(Debug)]
pub struct Layer {
    name: String,
    origin: Origin,
    bases: Vec<String>,
    blocks: IndexMap<String, EffectiveBlock>,
    members: IndexMap<String, LayerMember>,
    bookkeeper: BookKeeper,
}

impl Layer {
    pub(crate) fn new(
        name: String,
        origin: Origin,
        bases: Vec<String>,
        blocks: IndexMap<String, EffectiveBlock>,
        members: IndexMap<String, LayerMember>,
        bookkeeper: BookKeeper,
    ) -> Self {
        Self {
            name,
            origin,
            bases,
            blocks,
            members,
            bookkeeper,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Names of the direct bases, in declaration order
    pub fn bases(&self) -> &[String] {
        &self.bases
    }

    /// Effective block by lowercased identity
    pub fn block(&self, name: &str) -> Option<&EffectiveBlock> {
        self.blocks.get(&name.to_lowercase())
    }

    pub fn blocks(&self) -> impl Iterator<Item = &EffectiveBlock> {
        self.blocks.values()
    }

    pub fn member(&self, name: &str) -> Option<&LayerMember> {
        self.members.get(name)
    }

    pub fn members(&self) -> &IndexMap<String, LayerMember> {
        &self.members
    }

    pub fn bookkeeper(&self) -> &BookKeeper {
        &self.bookkeeper
    }
}

/// Who last touched an attribute, walking layers most-derived first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Provenance {
    pub added_by: Option<Origin>,
    pub removed_by: Option<Origin>,
}

/// A compiled application type: its own layer followed by its linearized ancestors.
#[derive(Debug)]
pub struct CompiledType {
    layers: Vec<Arc<Layer>>,
}

impl CompiledType {
    pub(crate) fn new(layers: Vec<Arc<Layer>>) -> Self {
        Self { layers }
    }

    pub fn name(&self) -> &str {
        self.own().name()
    }

    /// Most-derived first
    pub fn layers(&self) -> &[Arc<Layer>] {
        &self.layers
    }

    pub fn own(&self) -> &Arc<Layer> {
        // A compiled type always has at least its own layer.
        &self.layers[0]
    }

    /// Whether `other`'s own layer appears in this type's chain
    pub fn inherits_from(&self, other: &CompiledType) -> bool {
        self.layers.iter().any(|layer| Arc::ptr_eq(layer, other.own()))
    }

    /// The winning member for `name` and the layer it comes from
    pub fn member(&self, name: &str) -> Option<(&Arc<Layer>, &LayerMember)> {
        self.layers
            .iter()
            .find_map(|layer| layer.member(name).map(|member| (layer, member)))
    }

    /// The nearest effective block with this (case-insensitive) identity
    pub fn block(&self, name: &str) -> Option<&EffectiveBlock> {
        self.layers.iter().find_map(|layer| layer.block(name))
    }

    /// Every member name visible on an instance, most-derived first
    pub fn member_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for layer in &self.layers {
            for name in layer.members().keys() {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Installers to run, in order. The first layer to mention an identity
    /// decides it; a layer whose installer block doesn't extend ends the walk.
    pub fn installers(&self) -> Vec<InstallerEntry> {
        let mut seen: Vec<&str> = Vec::new();
        let mut installers = Vec::new();
        for layer in &self.layers {
            let Some(block) = layer.bookkeeper().installers() else {
                continue;
            };
            for (identity, path) in &block.entries {
                if seen.contains(&identity.as_str()) {
                    continue;
                }
                seen.push(identity);
                if let Some(path) = path {
                    installers.push(InstallerEntry {
                        identity: identity.clone(),
                        path: path.clone(),
                        origin: block.origin.clone(),
                    });
                }
            }
            if !block.extend {
                break;
            }
        }
        installers
    }

    /// Requirements to check, first per identity wins; suppressions are dropped.
    pub fn requirements(&self) -> Vec<&Requirement> {
        let mut seen: Vec<&str> = Vec::new();
        let mut requirements = Vec::new();
        for requirement in self
            .layers
            .iter()
            .flat_map(|layer| layer.bookkeeper().requirements())
        {
            if seen.contains(&requirement.identity.as_str()) {
                continue;
            }
            seen.push(&requirement.identity);
            if !requirement.is_suppression() {
                requirements.push(requirement);
            }
        }
        requirements
    }

    /// Active checkers, first per identity wins
    pub fn checkers(&self) -> Vec<&CheckerEntry> {
        let mut seen: Vec<&str> = Vec::new();
        let mut checkers = Vec::new();
        for checker in self.layers.iter().flat_map(|layer| layer.bookkeeper().checkers()) {
            if seen.contains(&checker.identity.as_str()) {
                continue;
            }
            seen.push(&checker.identity);
            if checker.active {
                checkers.push(checker);
            }
        }
        checkers
    }

    /// Every `methods` entry, first per identity wins
    pub fn methods(&self) -> Vec<&MethodEntry> {
        let mut seen: Vec<&str> = Vec::new();
        let mut methods = Vec::new();
        for method in self.layers.iter().flat_map(|layer| layer.bookkeeper().methods()) {
            if !seen.contains(&method.identity.as_str()) {
                seen.push(&method.identity);
                methods.push(method);
            }
        }
        methods
    }

    /// Objects to build on a new instance. Each identity is taken only from
    /// the layer owning the winning member of that name.
    pub fn deferred(&self) -> Vec<Deferred> {
        let mut seen: Vec<String> = Vec::new();
        let mut deferred = Vec::new();
        for layer in &self.layers {
            for item in layer.bookkeeper().deferred() {
                if seen.iter().any(|identity| identity == item.identity()) {
                    continue;
                }
                seen.push(item.identity().to_string());
                let owned_here = matches!(
                    self.member(item.identity()),
                    Some((owner, LayerMember { member: Member::Deferred, .. })) if Arc::ptr_eq(owner, layer)
                );
                if owned_here {
                    deferred.push(item);
                }
            }
        }
        deferred
    }

    /// Which declaration added `identity` and, if it was later nulled or
    /// replaced, which declaration did that.
    pub fn provenance(&self, identity: &str) -> Provenance {
        let mut provenance = Provenance::default();
        for layer in &self.layers {
            let bookkeeper = layer.bookkeeper();
            if provenance.removed_by.is_none() {
                provenance.removed_by = bookkeeper
                    .removed_by(identity)
                    .or_else(|| bookkeeper.replaced_by(identity))
                    .cloned();
            }
            if let Some(origin) = bookkeeper.added_by(identity) {
                provenance.added_by = Some(origin.clone());
                break;
            }
        }
        provenance
    }
}
