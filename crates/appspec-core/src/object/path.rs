//! Dot-path resolution.
//!
//! `resolve(root, "components.cli.get_parser")` walks one attribute at a time
//! and, when a segment is missing, reports exactly how far it got. Nothing is
//! cached; the result is a pure function of the root's current state.
use crate::kernel::error::{Error, NotFound, Result};
use crate::object::{Namespace, Value};

/// Resolve a dot-separated attribute path against `root`.
pub fn resolve(root: &dyn Namespace, path: &str) -> Result<Value> {
    let mut found: Vec<&str> = Vec::new();
    let not_found = |found: &[&str]| {
        Error::PathNotFound(NotFound {
            path: path.to_string(),
            root: root.describe(),
            found: found.iter().map(|segment| segment.to_string()).collect(),
        })
    };

    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    let mut current = if first.is_empty() {
        None
    } else {
        root.lookup(first)?
    }
    .ok_or_else(|| not_found(&found))?;
    found.push(first);

    for segment in segments {
        let next = if segment.is_empty() {
            None
        } else {
            current.lookup(segment)?
        };
        current = next.ok_or_else(|| not_found(&found))?;
        found.push(segment);
    }

    Ok(current)
}

/// Resolve several paths, stopping at the first failure.
pub fn resolve_all<S: AsRef<str>>(root: &dyn Namespace, paths: &[S]) -> Result<Vec<Value>> {
    paths.iter().map(|path| resolve(root, path.as_ref())).collect()
}
