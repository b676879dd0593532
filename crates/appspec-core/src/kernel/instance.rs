use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use indexmap::IndexMap;

use crate::compiler::{CompiledType, LayerMember, Member};
use crate::kernel::bootstrap::Orchestrator;
use crate::kernel::constants::DEFAULT_RUNNER;
use crate::kernel::error::{Error, LifecyclePhase, Result};
use crate::object::{resolve, DelegateSpec, LazyDelegate, Namespace, Value};

/// One application object assembled from a [`CompiledType`].
///
/// Deferred objects and values set at runtime live in the instance; every
/// other lookup falls through to the winning member of the compiled layers.
/// Each instance owns its own delegate cells, so two instances of the same
/// type never see each other's cached delegate values.
#[derive(Debug)]
pub struct Instance {
    compiled: Arc<CompiledType>,
    attrs: RwLock<IndexMap<String, Value>>,
    delegates: HashMap<String, LazyDelegate>,
    phase: Mutex<LifecyclePhase>,
    materialized: AtomicBool,
    runner: String,
}

impl Instance {
    pub fn new(compiled: Arc<CompiledType>) -> Self {
        let mut delegates = HashMap::new();
        for name in compiled.member_names() {
            if let Some((_, member)) = compiled.member(name) {
                if let Member::Delegate(spec) = &member.member {
                    delegates.insert(name.to_string(), LazyDelegate::new(spec.clone()));
                }
            }
        }

        Self {
            compiled,
            attrs: RwLock::new(IndexMap::new()),
            delegates,
            phase: Mutex::new(LifecyclePhase::Created),
            materialized: AtomicBool::new(false),
            runner: DEFAULT_RUNNER.to_string(),
        }
    }

    /// Use a different attribute path as the runner
    pub fn with_runner(mut self, path: &str) -> Self {
        self.runner = path.to_string();
        self
    }

    pub fn compiled(&self) -> &Arc<CompiledType> {
        &self.compiled
    }

    pub fn type_name(&self) -> &str {
        self.compiled.name()
    }

    pub fn runner(&self) -> &str {
        &self.runner
    }

    pub fn phase(&self) -> LifecyclePhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move from `expected` to `next`, failing if the instance is elsewhere.
    pub(crate) fn advance(&self, step: &str, expected: LifecyclePhase, next: LifecyclePhase) -> Result<()> {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if *phase != expected {
            return Err(Error::Lifecycle {
                phase: *phase,
                message: format!("{} needs the instance to be {}", step, expected),
            });
        }
        *phase = next;
        Ok(())
    }

    /// Mark deferred objects as built; only succeeds once.
    pub(crate) fn mark_materialized(&self) -> Result<()> {
        if self.materialized.swap(true, Ordering::SeqCst) {
            return Err(Error::Lifecycle {
                phase: self.phase(),
                message: "Deferred objects were already created".to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn is_materialized(&self) -> bool {
        self.materialized.load(Ordering::SeqCst)
    }

    pub(crate) fn place(&self, name: &str, value: Value) {
        self.attrs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
    }

    /// The delegate behind `name`, if the winning member is one
    pub fn delegate(&self, name: &str) -> Option<&DelegateSpec> {
        self.delegates.get(name).map(|cell| cell.spec())
    }

    /// Resolve a dot-path on this instance
    pub fn get(&self, path: &str) -> Result<Value> {
        resolve(self, path)
    }

    /// Set an attribute. Delegated names have their cached value forced instead.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if let Some(cell) = self.delegates.get(name) {
            cell.set(value);
            return Ok(());
        }
        if name.is_empty() || name.contains('.') {
            return Err(Error::Other(format!("Can only set plain attribute names, got '{}'", name)));
        }
        if !self.is_materialized() {
            if let Some((_, LayerMember { member: Member::Deferred, .. })) = self.compiled.member(name) {
                return Err(Error::Lifecycle {
                    phase: self.phase(),
                    message: format!("'{}' is created during bootstrap and can't be set before it", name),
                });
            }
        }
        self.place(name, value);
        Ok(())
    }

    /// Resolve `path` and call whatever it names
    pub fn call(&self, path: &str, args: Vec<Value>) -> Result<Value> {
        self.get(path)?.invoke(self, args)
    }

    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// Create, validate and install
    pub fn bootstrap(&self) -> Result<()> {
        Orchestrator::new(self).bootstrap()
    }

    /// Bootstrap, then hand control to the runner and return what it returns
    pub fn execute(&self) -> Result<Value> {
        Orchestrator::new(self).execute()
    }
}

impl Namespace for Instance {
    fn lookup(&self, name: &str) -> Result<Option<Value>> {
        let placed = self
            .attrs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned();
        if placed.is_some() {
            return Ok(placed);
        }

        match self.compiled.member(name) {
            Some((_, member)) => match &member.member {
                Member::Value(value) => Ok(Some(value.clone())),
                Member::Delegate(_) => match self.delegates.get(name) {
                    Some(cell) => cell.get(self).map(Some),
                    None => Ok(None),
                },
                Member::Deferred => Ok(None),
            },
            None => Ok(None),
        }
    }

    fn describe(&self) -> String {
        format!("<{} instance>", self.type_name())
    }
}
