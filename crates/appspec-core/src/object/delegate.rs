use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::kernel::error::{Error, ErrorContext, PathDesc, Result};
use crate::object::{resolve, Namespace, Value};
use crate::spec::Origin;

/// A generated method delegate: `identity` forwards to whatever `path` resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegateSpec {
    pub identity: String,
    pub path: String,
    pub origin: Origin,
}

impl DelegateSpec {
    pub fn new(identity: &str, path: &str, origin: Origin) -> Self {
        Self {
            identity: identity.to_string(),
            path: path.to_string(),
            origin,
        }
    }
}

#[derive(Debug)]
enum DelegateState {
    Unresolved,
    Resolving,
    Resolved(Value),
}

/// Lazily resolved, overridable reference cell.
///
/// One cell exists per (instance, identity). The first `get` resolves the
/// path against the owning instance and caches the result; `set` forces a
/// value regardless of state.
#[derive(Debug)]
pub struct LazyDelegate {
    spec: DelegateSpec,
    state: Mutex<DelegateState>,
}

impl LazyDelegate {
    pub fn new(spec: DelegateSpec) -> Self {
        Self {
            spec,
            state: Mutex::new(DelegateState::Unresolved),
        }
    }

    pub fn spec(&self) -> &DelegateSpec {
        &self.spec
    }

    fn state(&self) -> MutexGuard<'_, DelegateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self.state(), DelegateState::Resolved(_))
    }

    /// Return the cached value, resolving against `owner` on first use.
    pub fn get(&self, owner: &dyn Namespace) -> Result<Value> {
        {
            let mut state = self.state();
            match &*state {
                DelegateState::Resolved(value) => return Ok(value.clone()),
                DelegateState::Resolving => {
                    let context = ErrorContext::new()
                        .origin(&self.spec.origin)
                        .with("delegate_to", &self.spec.path)
                        .with("identity", &self.spec.identity);
                    return Err(Error::developer_with(
                        format!("Delegate '{}' refers back to itself while resolving", self.spec.identity),
                        context,
                    ));
                }
                DelegateState::Unresolved => *state = DelegateState::Resolving,
            }
        }

        // The lock is released while resolving; resolution walks the owner and
        // may hit other delegates on it.
        let resolved = resolve(owner, &self.spec.path);

        let mut state = self.state();
        match resolved {
            Ok(value) => match &*state {
                DelegateState::Resolved(forced) => Ok(forced.clone()),
                _ => {
                    *state = DelegateState::Resolved(value.clone());
                    Ok(value)
                }
            },
            Err(err) => {
                if matches!(*state, DelegateState::Resolving) {
                    *state = DelegateState::Unresolved;
                }
                Err(err.into_requirement(PathDesc::DelegateTo, &self.spec.identity, &self.spec.origin))
            }
        }
    }

    /// Force the cached value
    pub fn set(&self, value: Value) {
        *self.state() = DelegateState::Resolved(value);
    }
}
