use indexmap::IndexMap;

use crate::kernel::error::{Error, ErrorContext, Result};
use crate::spec::Origin;

/// Why an attribute name is already taken on the type being compiled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// Declared by hand on the same type
    HandDeclared,
    /// Produced by another block of the same type
    AlreadyGenerated,
}

impl ConflictType {
    pub fn description(&self) -> &str {
        match self {
            ConflictType::HandDeclared => "already defined by hand on same type",
            ConflictType::AlreadyGenerated => "already generated by another declaration on same type",
        }
    }
}

/// One colliding attribute name
#[derive(Debug, Clone)]
pub struct NameConflict {
    pub name: String,
    pub conflict_type: ConflictType,
    /// Whoever claimed the name first
    pub claimed_by: Origin,
}

/// Tracks which attribute names a type has already claimed while it is compiled.
#[derive(Debug, Default)]
pub struct ConflictDetector {
    claimed: IndexMap<String, (ConflictType, Origin)>,
}

impl ConflictDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim names declared by hand
    pub fn hand_declared<'a>(&mut self, names: impl IntoIterator<Item = (&'a str, Origin)>) {
        for (name, origin) in names {
            self.claimed
                .insert(name.to_string(), (ConflictType::HandDeclared, origin));
        }
    }

    /// Claim names a block produced
    pub fn generated(&mut self, names: &[String], origin: &Origin) {
        for name in names {
            self.claimed
                .insert(name.clone(), (ConflictType::AlreadyGenerated, origin.clone()));
        }
    }

    /// Conflicts `names` would cause, in the order given
    pub fn detect(&self, names: &[String]) -> Vec<NameConflict> {
        names
            .iter()
            .filter_map(|name| {
                self.claimed.get(name).map(|(conflict_type, origin)| NameConflict {
                    name: name.clone(),
                    conflict_type: conflict_type.clone(),
                    claimed_by: origin.clone(),
                })
            })
            .collect()
    }

    /// Fail with a developer error if `origin` would produce any claimed name.
    pub fn ensure_free(&self, origin: &Origin, names: &[String]) -> Result<()> {
        let conflicts = self.detect(names);
        let Some(first) = conflicts.first() else {
            return Ok(());
        };

        let listed = conflicts
            .iter()
            .map(|conflict| format!("'{}'", conflict.name))
            .collect::<Vec<_>>()
            .join(", ");
        let mut context = ErrorContext::new().origin(origin).with("conflicts", &listed);
        for conflict in &conflicts {
            context = context.with(&format!("claimed_{}", conflict.name), &conflict.claimed_by);
        }
        Err(Error::developer_with(
            format!(
                "Adding attributes [{}] from {} but {}",
                listed,
                origin.label(),
                first.conflict_type.description()
            ),
            context,
        ))
    }
}
