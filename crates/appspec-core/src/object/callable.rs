use std::fmt;
use std::result::Result as StdResult;
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error as ThisError;

use crate::kernel::error::{BoxError, Error, PathDesc, Result};
use crate::kernel::Instance;
use crate::object::{resolve, Object, ObjectRef, Value};
use crate::spec::{Location, Origin};

/// Signature of native functions stored in callables and object methods.
pub type NativeFn = dyn Fn(&Instance, Vec<Value>) -> Result<Value> + Send + Sync;

/// Keyword arguments handed to a [`Factory`]
pub type Kwargs = IndexMap<String, Value>;

type BuildFn = dyn Fn(Kwargs) -> StdResult<Value, BoxError> + Send + Sync;

/// A named native function.
///
/// The optional `requires` marker lists dot-paths that must resolve on the
/// instance. They are resolved on every call and passed in as the leading
/// positional arguments, ahead of whatever the caller supplied.
#[derive(Clone)]
pub struct Callable {
    name: String,
    requires: Vec<String>,
    checker: bool,
    location: Option<Location>,
    func: Arc<NativeFn>,
}

impl Callable {
    #[track_caller]
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Instance, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            requires: Vec::new(),
            checker: true,
            location: Some(Location::caller()),
            func: Arc::new(func),
        }
    }

    /// Stand-in for an inherited attribute that a derived declaration nulled out.
    pub fn not_implemented(identity: &str, origin: &Origin) -> Self {
        let name = identity.to_string();
        let nulled_by = origin.clone();
        Self {
            name: identity.to_string(),
            requires: Vec::new(),
            checker: false,
            location: origin.location().cloned(),
            func: Arc::new(move |_cx: &Instance, _args: Vec<Value>| {
                Err(Error::NotImplemented {
                    identity: name.clone(),
                    origin: nulled_by.clone(),
                })
            }),
        }
    }

    /// Attach the `requires` marker
    pub fn requires<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Exclude this callable from the checker pass
    pub fn not_a_checker(mut self) -> Self {
        self.checker = false;
        self
    }

    /// Override the captured source location
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_paths(&self) -> &[String] {
        &self.requires
    }

    pub fn is_checker(&self) -> bool {
        self.checker
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn origin(&self) -> Origin {
        Origin::new(format!("callable '{}'", self.name), self.location.clone())
    }

    pub fn call(&self, cx: &Instance, args: Vec<Value>) -> Result<Value> {
        let mut positional = Vec::with_capacity(self.requires.len() + args.len());
        for path in &self.requires {
            let value = resolve(cx, path)
                .map_err(|err| err.into_requirement(PathDesc::Requires, &self.name, &self.origin()))?;
            positional.push(value);
        }
        positional.extend(args);
        (self.func)(cx, positional)
    }

    pub fn ptr_eq(&self, other: &Callable) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.func), Arc::as_ptr(&other.func))
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .field("checker", &self.checker)
            .field("location", &self.location)
            .finish()
    }
}

/// A method looked up on an object, remembered together with its receiver.
#[derive(Clone)]
pub struct BoundMethod {
    receiver: ObjectRef,
    name: String,
}

impl BoundMethod {
    pub fn new(receiver: ObjectRef, name: &str) -> Self {
        Self {
            receiver,
            name: name.to_string(),
        }
    }

    pub fn receiver(&self) -> &ObjectRef {
        &self.receiver
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, cx: &Instance, args: Vec<Value>) -> Result<Value> {
        self.receiver.call_method(&self.name, cx, args)
    }

    pub fn describe(&self) -> String {
        format!("<method {}.{}>", self.receiver.type_name(), self.name)
    }

    pub fn ptr_eq(&self, other: &BoundMethod) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.receiver), Arc::as_ptr(&other.receiver)) && self.name == other.name
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A declared constructor parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub default: Option<Value>,
}

/// Keyword arguments that don't fit a factory's declared parameters.
#[derive(Debug, ThisError)]
pub enum ArgumentError {
    #[error("{factory}() got an unexpected keyword argument '{name}'")]
    Unexpected { factory: String, name: String },
    #[error("{factory}() missing required argument '{name}'")]
    Missing { factory: String, name: String },
}

/// A constructible type: the `mainType` of a custom object, or a component class.
#[derive(Clone)]
pub struct Factory {
    name: String,
    params: Vec<Param>,
    requires: Vec<String>,
    location: Option<Location>,
    build: Arc<BuildFn>,
}

impl Factory {
    #[track_caller]
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(Kwargs) -> StdResult<Value, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: Vec::new(),
            requires: Vec::new(),
            location: Some(Location::caller()),
            build: Arc::new(build),
        }
    }

    /// Factory for a concrete [`Object`] type
    #[track_caller]
    pub fn object<O, F>(name: impl Into<String>, build: F) -> Self
    where
        O: Object + 'static,
        F: Fn(Kwargs) -> StdResult<O, BoxError> + Send + Sync + 'static,
    {
        Self::new(name, move |kwargs| build(kwargs).map(Value::object))
    }

    /// Declare a required keyword parameter
    pub fn param(mut self, name: &str) -> Self {
        self.params.push(Param {
            name: name.to_string(),
            default: None,
        });
        self
    }

    /// Declare a keyword parameter with a default
    pub fn param_with_default(mut self, name: &str, default: impl Into<Value>) -> Self {
        self.params.push(Param {
            name: name.to_string(),
            default: Some(default.into()),
        });
        self
    }

    /// Paths the constructed object needs on the instance it is placed on
    pub fn requires<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn required_paths(&self) -> &[String] {
        &self.requires
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// `Name(a, b=default)`
    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|param| match &param.default {
                Some(default) => format!("{}={}", param.name, default.describe()),
                None => param.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name, params)
    }

    /// Check keyword arguments against the declared parameters and fill in defaults.
    pub fn bind(&self, kwargs: &Kwargs) -> StdResult<Kwargs, ArgumentError> {
        if let Some(unexpected) = kwargs
            .keys()
            .find(|key| !self.params.iter().any(|param| &param.name == *key))
        {
            return Err(ArgumentError::Unexpected {
                factory: self.name.clone(),
                name: unexpected.clone(),
            });
        }

        let mut bound = Kwargs::new();
        for param in &self.params {
            match (kwargs.get(&param.name), &param.default) {
                (Some(value), _) => {
                    bound.insert(param.name.clone(), value.clone());
                }
                (None, Some(default)) => {
                    bound.insert(param.name.clone(), default.clone());
                }
                (None, None) => {
                    return Err(ArgumentError::Missing {
                        factory: self.name.clone(),
                        name: param.name.clone(),
                    });
                }
            }
        }
        Ok(bound)
    }

    pub fn construct(&self, kwargs: &Kwargs) -> StdResult<Value, BoxError> {
        let bound = self.bind(kwargs)?;
        (self.build)(bound)
    }

    pub fn ptr_eq(&self, other: &Factory) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.build), Arc::as_ptr(&other.build))
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("signature", &self.signature())
            .field("requires", &self.requires)
            .field("location", &self.location)
            .finish()
    }
}
