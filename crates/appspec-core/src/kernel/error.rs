//! # Appspec Kernel Errors
//!
//! Defines the error type shared by the whole engine.
//!
//! Every failure here is a developer or configuration mistake rather than a
//! transient fault, so nothing is retried and nothing is swallowed. The
//! variants carry enough structure (origin declaration, path that failed,
//! how far resolution got) to point at the exact layer and declaration that
//! caused a problem.
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::spec::Origin;

/// Boxed error used for failures coming out of user supplied code
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Keys always rendered before the rest of an [`ErrorContext`], in this order.
pub const SHOW_FIRST: [&str; 3] = ["origin", "added_by", "removed_by"];

/// Where a failed dot-path was being used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathDesc {
    /// A `requires` marker or requirement block
    Requires,
    /// A generated method delegate
    DelegateTo,
    /// An installer entry
    Installing,
}

impl PathDesc {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathDesc::Requires => "requires",
            PathDesc::DelegateTo => "delegate_to",
            PathDesc::Installing => "installing",
        }
    }
}

impl fmt::Display for PathDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a specific phase in an instance's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum LifecyclePhase {
    #[error("Created")]
    Created,
    #[error("Validated")]
    Validated,
    #[error("Installed")]
    Installed,
    #[error("Running")]
    Running,
}

/// A dot-path that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFound {
    /// The full path that was asked for
    pub path: String,
    /// Description of the object resolution started from
    pub root: String,
    /// The segments that did resolve, in order
    pub found: Vec<String>,
}

impl NotFound {
    pub fn found_path(&self) -> String {
        self.found.join(".")
    }
}

/// Structured `key='value'` context attached to developer errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    fields: BTreeMap<String, String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous value under the same key
    pub fn with(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.fields.insert(key.to_string(), value.to_string());
        self
    }

    /// Shorthand for `with("origin", origin)`
    pub fn origin(self, origin: &Origin) -> Self {
        self.with("origin", origin)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keys in display order: [`SHOW_FIRST`] then everything else sorted.
    pub fn ordered_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = SHOW_FIRST
            .iter()
            .copied()
            .filter(|key| self.fields.contains_key(*key))
            .collect();
        keys.extend(
            self.fields
                .keys()
                .map(|key| key.as_str())
                .filter(|key| !SHOW_FIRST.contains(key)),
        );
        keys
    }

    pub fn render(&self) -> String {
        self.ordered_keys()
            .into_iter()
            .map(|key| format!("{}='{}'", key, self.fields[key]))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn report(message: &str, context: &ErrorContext) -> String {
    if context.is_empty() {
        message.to_string()
    } else {
        format!("{}\n{}", message, context.render())
    }
}

fn requirement_report(
    desc: &PathDesc,
    path: &str,
    root: &str,
    found: &[String],
    identity: &str,
    origin: &Origin,
) -> String {
    let context = ErrorContext::new()
        .origin(origin)
        .with(desc.as_str(), path)
        .with("root", root)
        .with("found", found.join("."))
        .with("identity", identity);
    report("Requirement could not be resolved", &context)
}

fn attribute_report(
    desc: &PathDesc,
    path: &str,
    obj: &str,
    requires: &str,
    identity: &str,
    origin: &Origin,
) -> String {
    let context = ErrorContext::new()
        .origin(origin)
        .with(desc.as_str(), path)
        .with("obj", obj)
        .with("requires_obj_attribute", requires)
        .with("identity", identity);
    report("Requirement resolved but lacks a required attribute", &context)
}

fn unexpected_report(identity: &str, value: &str, context: &ErrorContext) -> String {
    report(&format!("Expected '{}' to be callable, got {}", identity, value), context)
}

/// Custom error type for the assembly engine
#[derive(Debug, ThisError)]
pub enum Error {
    /// A dot-path failed to resolve
    #[error("Couldn't find '{path}' on {root}, only resolved up to '{found}'", path = .0.path, root = .0.root, found = .0.found_path())]
    PathNotFound(NotFound),

    /// A spec violates a structural rule
    #[error("{}", report(.message, .context))]
    Developer {
        message: String,
        context: ErrorContext,
        #[source]
        source: Option<BoxError>,
    },

    /// A requirement path could not be resolved on the instance
    #[error("{}", requirement_report(.desc, .path, .root, .found, .identity, .origin))]
    Requirement {
        desc: PathDesc,
        path: String,
        root: String,
        found: Vec<String>,
        identity: String,
        origin: Origin,
    },

    /// A requirement resolved but the target lacks a needed capability
    #[error("{}", attribute_report(.desc, .path, .obj, .requires, .identity, .origin))]
    RequirementAttribute {
        desc: PathDesc,
        path: String,
        obj: String,
        requires: String,
        identity: String,
        origin: Origin,
    },

    /// A "methods" entry resolved to something that can't be called
    #[error("{}", unexpected_report(.identity, .value, .context))]
    UnexpectedValue {
        identity: String,
        value: String,
        context: ErrorContext,
    },

    /// An inherited attribute was explicitly nulled and then invoked
    #[error("'{identity}' is not implemented\norigin='{origin}'")]
    NotImplemented { identity: String, origin: Origin },

    #[error("'{target}' is not callable (found {value})")]
    NotCallable { target: String, value: String },

    #[error("{object} has no method '{method}'")]
    NoSuchMethod { object: String, method: String },

    /// User supplied code failed
    #[error("Call to '{target}' failed: {source}")]
    CallFailed {
        target: String,
        #[source]
        source: BoxError,
    },

    /// A lifecycle step was invoked out of order
    #[error("Lifecycle error during {phase}: {message}")]
    Lifecycle {
        phase: LifecyclePhase,
        message: String,
    },

    /// A spec document could not be parsed or interpreted
    #[error("Config error ({format}): {message}")]
    Config {
        format: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("I/O error during operation '{operation}' on path '{}': {source}", .path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
        operation: String,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// A developer error with no extra context
    pub fn developer(message: impl Into<String>) -> Self {
        Error::Developer {
            message: message.into(),
            context: ErrorContext::new(),
            source: None,
        }
    }

    /// A developer error with structured context
    pub fn developer_with(message: impl Into<String>, context: ErrorContext) -> Self {
        Error::Developer {
            message: message.into(),
            context,
            source: None,
        }
    }

    /// Turn a failed resolution into a requirement error tagged with who required it
    pub fn requirement(desc: PathDesc, not_found: NotFound, identity: &str, origin: &Origin) -> Self {
        Error::Requirement {
            desc,
            path: not_found.path,
            root: not_found.root,
            found: not_found.found,
            identity: identity.to_string(),
            origin: origin.clone(),
        }
    }

    pub fn config(format: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            format: format.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::Io {
            source,
            operation: operation.into(),
            path,
        }
    }

    /// Whether this error belongs to the developer error family
    pub fn is_developer_error(&self) -> bool {
        matches!(
            self,
            Error::Developer { .. }
                | Error::Requirement { .. }
                | Error::RequirementAttribute { .. }
                | Error::UnexpectedValue { .. }
        )
    }

    /// The context of a developer error, if it carries one
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Developer { context, .. } | Error::UnexpectedValue { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Map a path failure into a requirement error, leaving other errors alone
    pub fn into_requirement(self, desc: PathDesc, identity: &str, origin: &Origin) -> Self {
        match self {
            Error::PathNotFound(not_found) => Error::requirement(desc, not_found, identity, origin),
            other => other,
        }
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
