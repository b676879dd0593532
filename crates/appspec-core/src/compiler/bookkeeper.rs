use indexmap::IndexMap;

use crate::kernel::component::{ComponentGroupDescriptor, CustomDescriptor, Deferred};
use crate::kernel::error::{Error, ErrorContext, PathDesc, Result};
use crate::object::{resolve, Namespace};
use crate::spec::Origin;

/// A declared dependency: every path must resolve on the finished instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub paths: Vec<String>,
    pub identity: String,
    pub origin: Origin,
}

impl Requirement {
    pub fn new<I, S>(paths: I, identity: &str, origin: Origin) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            identity: identity.to_string(),
            origin,
        }
    }

    /// A requirement with no paths; it only shadows inherited ones.
    pub fn is_suppression(&self) -> bool {
        self.paths.is_empty()
    }
}

/// The installer block declared by one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallerBlock {
    /// identity -> path of the installable, `None` suppresses the identity
    pub entries: IndexMap<String, Option<String>>,
    pub extend: bool,
    pub origin: Origin,
}

/// An installer that will actually run.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallerEntry {
    pub identity: String,
    pub path: String,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckerEntry {
    pub identity: String,
    pub origin: Origin,
    /// Inactive entries shadow an inherited checker without running anything
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodEntry {
    pub identity: String,
    pub origin: Origin,
}

/// Per-layer ledger of what a type adds, removes, replaces, requires and installs.
#[derive(Debug, Clone, Default)]
pub struct BookKeeper {
    added: IndexMap<Origin, Vec<String>>,
    removed: IndexMap<Origin, Vec<String>>,
    replaced: IndexMap<Origin, Vec<String>>,
    attrs: Vec<String>,
    methods: Vec<MethodEntry>,
    checkers: Vec<CheckerEntry>,
    installers: Option<InstallerBlock>,
    components: Vec<ComponentGroupDescriptor>,
    custom: Vec<CustomDescriptor>,
    requirements: Vec<Requirement>,
}

fn record(map: &mut IndexMap<Origin, Vec<String>>, origin: &Origin, names: &[String]) {
    if names.is_empty() {
        return;
    }
    let list = map.entry(origin.clone()).or_default();
    for name in names {
        if !list.contains(name) {
            list.push(name.clone());
        }
    }
}

fn union(map: &IndexMap<Origin, Vec<String>>) -> Vec<String> {
    let mut all: Vec<String> = Vec::new();
    for name in map.values().flatten() {
        if !all.contains(name) {
            all.push(name.clone());
        }
    }
    all
}

fn recorded_by<'a>(map: &'a IndexMap<Origin, Vec<String>>, name: &str) -> Option<&'a Origin> {
    map.iter()
        .find(|(_, names)| names.iter().any(|n| n == name))
        .map(|(origin, _)| origin)
}

impl BookKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== attribute ledger =====

    /// Record names supplied by `origin`. A name lives under one origin at a time.
    pub fn added_attributes(&mut self, origin: &Origin, names: &[String]) {
        for list in self.added.values_mut() {
            list.retain(|name| !names.contains(name));
        }
        self.added.retain(|_, list| !list.is_empty());
        record(&mut self.added, origin, names);
    }

    /// Record names that `origin` nulled out
    pub fn removed_attributes(&mut self, origin: &Origin, names: &[String]) {
        record(&mut self.removed, origin, names);
    }

    /// Record names overwritten by hand, bypassing the compiler
    pub fn replaced_attributes(&mut self, origin: &Origin, names: &[String]) {
        record(&mut self.replaced, origin, names);
    }

    pub fn added(&self) -> &IndexMap<Origin, Vec<String>> {
        &self.added
    }

    pub fn removed(&self) -> &IndexMap<Origin, Vec<String>> {
        &self.removed
    }

    pub fn replaced(&self) -> &IndexMap<Origin, Vec<String>> {
        &self.replaced
    }

    /// Every added name across all origins, first seen first
    pub fn all_added(&self) -> Vec<String> {
        union(&self.added)
    }

    pub fn all_removed(&self) -> Vec<String> {
        union(&self.removed)
    }

    pub fn all_replaced(&self) -> Vec<String> {
        union(&self.replaced)
    }

    pub fn added_by(&self, name: &str) -> Option<&Origin> {
        recorded_by(&self.added, name)
    }

    pub fn removed_by(&self, name: &str) -> Option<&Origin> {
        recorded_by(&self.removed, name)
    }

    pub fn replaced_by(&self, name: &str) -> Option<&Origin> {
        recorded_by(&self.replaced, name)
    }

    /// Drop `added` records shadowed by a removal or replacement.
    pub fn normalise(&mut self) {
        let shadowed: Vec<String> = self
            .all_removed()
            .into_iter()
            .chain(self.all_replaced())
            .collect();
        for list in self.added.values_mut() {
            list.retain(|name| !shadowed.contains(name));
        }
        self.added.retain(|_, list| !list.is_empty());
    }

    // ===== handler records =====

    pub fn record_attrs(&mut self, names: &[String]) {
        for name in names {
            if !self.attrs.contains(name) {
                self.attrs.push(name.clone());
            }
        }
    }

    pub fn attrs(&self) -> &[String] {
        &self.attrs
    }

    pub fn add_method(&mut self, identity: &str, origin: &Origin) {
        self.methods.push(MethodEntry {
            identity: identity.to_string(),
            origin: origin.clone(),
        });
    }

    pub fn methods(&self) -> &[MethodEntry] {
        &self.methods
    }

    pub fn add_checker(&mut self, identity: &str, origin: &Origin, active: bool) {
        self.checkers.push(CheckerEntry {
            identity: identity.to_string(),
            origin: origin.clone(),
            active,
        });
    }

    pub fn checkers(&self) -> &[CheckerEntry] {
        &self.checkers
    }

    /// Set this layer's installer block. A layer declares at most one.
    pub fn set_installers(&mut self, block: InstallerBlock) -> Result<()> {
        if let Some(existing) = &self.installers {
            let context = ErrorContext::new()
                .origin(&block.origin)
                .with("first", &existing.origin);
            return Err(Error::developer_with("Installers declared twice on the same type", context));
        }
        self.installers = Some(block);
        Ok(())
    }

    pub fn installers(&self) -> Option<&InstallerBlock> {
        self.installers.as_ref()
    }

    pub fn add_components(&mut self, group: ComponentGroupDescriptor) {
        self.components.push(group);
    }

    pub fn components(&self) -> &[ComponentGroupDescriptor] {
        &self.components
    }

    pub fn add_custom(&mut self, custom: CustomDescriptor) {
        self.custom.push(custom);
    }

    pub fn custom(&self) -> &[CustomDescriptor] {
        &self.custom
    }

    /// Record that `identity` needs every one of `paths`
    pub fn add_requirement<I, S>(&mut self, paths: I, identity: &str, origin: &Origin)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements
            .push(Requirement::new(paths, identity, origin.clone()));
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Everything that must be materialized on an instance: component groups, then custom objects.
    pub fn deferred(&self) -> Vec<Deferred> {
        self.components
            .iter()
            .cloned()
            .map(Deferred::Components)
            .chain(self.custom.iter().cloned().map(Deferred::Custom))
            .collect()
    }

    /// Make sure every path of `requirement` resolves on `root`.
    pub fn path_check(root: &dyn Namespace, requirement: &Requirement) -> Result<()> {
        for path in &requirement.paths {
            resolve(root, path).map_err(|err| {
                err.into_requirement(PathDesc::Requires, &requirement.identity, &requirement.origin)
            })?;
        }
        Ok(())
    }
}
