//! Built-in block handlers.
use indexmap::IndexMap;

use crate::compiler::bookkeeper::InstallerBlock;
use crate::compiler::handler::{BlockHandler, HandlerContext};
use crate::compiler::layer::Member;
use crate::kernel::component::{ComponentGroupDescriptor, ComponentSource};
use crate::kernel::constants::{
    HANDLER_ATTRS, HANDLER_CHECKERS, HANDLER_COMPONENTS, HANDLER_INSTALL, HANDLER_INSTALLERS,
    HANDLER_METHODS, HANDLER_REQUIRES,
};
use crate::kernel::error::{Error, ErrorContext, Result};
use crate::object::{Callable, DelegateSpec, Value};

pub(crate) fn builtin() -> Vec<Box<dyn BlockHandler>> {
    vec![
        Box::new(AttrsHandler),
        Box::new(CheckersHandler),
        Box::new(MethodsHandler),
        Box::new(InstallHandler::new(HANDLER_INSTALL)),
        Box::new(InstallHandler::new(HANDLER_INSTALLERS)),
        Box::new(ComponentsHandler),
        Box::new(RequiresHandler),
    ]
}

fn bad_entry(cx: &HandlerContext<'_>, key: &str, expected: &str, value: &Value) -> Error {
    let context = ErrorContext::new()
        .origin(cx.origin)
        .with("entry", key)
        .with("value", value.describe());
    Error::developer_with(
        format!("'{}' entries must be {}, got {}", cx.block.identity(), expected, value.kind()),
        context,
    )
}

/// Declared entries laid over the nulls a `nullify_inherited` block asks for.
fn declared_with_nulls(cx: &HandlerContext<'_>) -> IndexMap<String, Value> {
    let mut attributes = cx.nulls_if_necessary();
    for (key, value) in cx.block.entries() {
        attributes.insert(key.clone(), value.clone());
    }
    attributes
}

/// A null that hides a real inherited value becomes a callable that refuses
/// to run, and is recorded as removed. Other nulls stay null.
fn suppress(cx: &mut HandlerContext<'_>, key: &str) -> Member {
    if cx.overrides_inherited(key) {
        cx.bookkeeper.removed_attributes(cx.origin, &[key.to_string()]);
        Member::Value(Value::Callable(Callable::not_implemented(key, cx.origin)))
    } else {
        Member::Value(Value::Null)
    }
}

/// Copies its entries onto the type verbatim.
pub struct AttrsHandler;

impl BlockHandler for AttrsHandler {
    fn name(&self) -> &str {
        HANDLER_ATTRS
    }

    fn extendable(&self) -> bool {
        false
    }

    fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<Vec<(String, Member)>> {
        let mut produced = Vec::new();
        for (key, value) in declared_with_nulls(cx) {
            let member = if value.is_null() {
                suppress(cx, &key)
            } else {
                Member::Value(value)
            };
            produced.push((key, member));
        }
        let names: Vec<String> = produced.iter().map(|(name, _)| name.clone()).collect();
        cx.bookkeeper.record_attrs(&names);
        Ok(produced)
    }
}

/// Registers zero-argument validation routines run during the sanity check.
pub struct CheckersHandler;

impl BlockHandler for CheckersHandler {
    fn name(&self) -> &str {
        HANDLER_CHECKERS
    }

    fn extendable(&self) -> bool {
        false
    }

    fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<Vec<(String, Member)>> {
        let mut produced = Vec::new();
        for (key, value) in declared_with_nulls(cx) {
            match value {
                Value::Callable(callable) => {
                    cx.bookkeeper.add_checker(&key, cx.origin, callable.is_checker());
                    produced.push((key, Member::Value(Value::Callable(callable))));
                }
                Value::Null => {
                    cx.bookkeeper.add_checker(&key, cx.origin, false);
                    let member = suppress(cx, &key);
                    produced.push((key, member));
                }
                other => return Err(bad_entry(cx, &key, "callables", &other)),
            }
        }
        Ok(produced)
    }
}

/// Generates lazy delegates: `identity = "dot.path"`.
pub struct MethodsHandler;

impl BlockHandler for MethodsHandler {
    fn name(&self) -> &str {
        HANDLER_METHODS
    }

    fn extendable(&self) -> bool {
        false
    }

    fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<Vec<(String, Member)>> {
        let mut produced = Vec::new();
        for (key, value) in declared_with_nulls(cx) {
            let member = match value {
                Value::Str(path) => Member::Delegate(DelegateSpec::new(&key, &path, cx.origin.clone())),
                Value::Null => suppress(cx, &key),
                value if value.is_callable() => Member::Value(value),
                other => return Err(bad_entry(cx, &key, "dot-paths or callables", &other)),
            };
            cx.bookkeeper.add_method(&key, cx.origin);
            produced.push((key, member));
        }
        Ok(produced)
    }
}

/// Records which objects get `install(instance)` called on them.
pub struct InstallHandler {
    name: &'static str,
}

impl InstallHandler {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl BlockHandler for InstallHandler {
    fn name(&self) -> &str {
        self.name
    }

    fn nullable(&self) -> bool {
        false
    }

    fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<Vec<(String, Member)>> {
        let mut entries = IndexMap::new();
        for (key, value) in cx.block.entries() {
            let path = match value {
                Value::Str(path) => Some(path.clone()),
                Value::Null => None,
                other => return Err(bad_entry(cx, key, "dot-paths", other)),
            };
            entries.insert(key.clone(), path);
        }
        cx.bookkeeper.set_installers(InstallerBlock {
            entries,
            extend: cx.block.flags().extends(),
            origin: cx.origin.clone(),
        })?;
        Ok(Vec::new())
    }
}

/// Builds one group object holding every component of the block.
pub struct ComponentsHandler;

impl BlockHandler for ComponentsHandler {
    fn name(&self) -> &str {
        HANDLER_COMPONENTS
    }

    fn nullable(&self) -> bool {
        false
    }

    fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<Vec<(String, Member)>> {
        let mut values = if cx.block.flags().extends() {
            cx.inherited.entries.clone()
        } else {
            IndexMap::new()
        };
        for (key, value) in cx.block.entries() {
            values.insert(key.clone(), value.clone());
        }

        let identity = cx.block.identity().to_lowercase();
        let mut entries = IndexMap::new();
        for (key, value) in values {
            if value.is_null() {
                if cx.inherited.entries.contains_key(&key) {
                    log::debug!("Dropping component '{}' from {}", key, cx.origin);
                } else {
                    log::warn!("{} nulls component '{}' but no base declares it", cx.origin, key);
                }
                continue;
            }
            if let Value::Factory(factory) = &value {
                if !factory.required_paths().is_empty() {
                    cx.bookkeeper.add_requirement(
                        factory.required_paths().iter().cloned(),
                        &format!("{}.{}", identity, key),
                        cx.origin,
                    );
                }
            }
            entries.insert(key, ComponentSource::from(value));
        }

        cx.bookkeeper.add_components(ComponentGroupDescriptor {
            identity: identity.clone(),
            entries,
            origin: cx.origin.clone(),
        });
        Ok(vec![(identity, Member::Deferred)])
    }
}

/// `identity = "path"` or `identity = ["a", "b"]`: paths that must resolve.
pub struct RequiresHandler;

impl BlockHandler for RequiresHandler {
    fn name(&self) -> &str {
        HANDLER_REQUIRES
    }

    fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<Vec<(String, Member)>> {
        let flags = cx.block.flags();
        if flags.nullifies() || !flags.extends() {
            let hidden: Vec<String> = cx
                .inherited
                .entries
                .keys()
                .filter(|key| !cx.block.entries().contains_key(*key))
                .cloned()
                .collect();
            for key in hidden {
                cx.bookkeeper.add_requirement(Vec::<String>::new(), &key, cx.origin);
            }
        }

        for (key, value) in cx.block.entries() {
            let paths: Vec<String> = match value {
                Value::Str(path) => vec![path.clone()],
                Value::Null => Vec::new(),
                Value::List(items) => items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| bad_entry(cx, key, "dot-paths", item))
                    })
                    .collect::<Result<_>>()?,
                other => return Err(bad_entry(cx, key, "dot-paths or lists of dot-paths", other)),
            };
            cx.bookkeeper.add_requirement(paths, key, cx.origin);
        }
        Ok(Vec::new())
    }
}
