//! Source positions for declarations.
//!
//! Every block, member and callable remembers where it was written so that
//! errors can point back at the exact declaration that caused them.
use std::fmt;

/// A file and (optionally) a line number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    file: String,
    line: Option<u32>,
}

impl Location {
    /// Create a location from its parts
    pub fn new(file: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// The location of whoever called the `#[track_caller]` function we are in.
    #[track_caller]
    pub fn caller() -> Self {
        let caller = std::panic::Location::caller();
        Self {
            file: caller.file().to_string(),
            line: Some(caller.line()),
        }
    }

    /// Parse `file:line` or a bare `file`.
    pub fn parse(text: &str) -> Self {
        match text.rsplit_once(':') {
            Some((file, line)) => match line.trim().parse::<u32>() {
                Ok(line) => Self::new(file, Some(line)),
                Err(_) => Self::new(text, None),
            },
            None => Self::new(text, None),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.file, line),
            None => write!(f, "{}", self.file),
        }
    }
}

/// The declaration responsible for an attribute, requirement or installer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    label: String,
    location: Option<Location>,
}

impl Origin {
    pub fn new(label: impl Into<String>, location: Option<Location>) -> Self {
        Self {
            label: label.into(),
            location,
        }
    }

    /// A spec block declared on a type, e.g. `App.Install`
    pub fn declaration(type_name: &str, block: &str, location: Option<Location>) -> Self {
        Self::new(format!("{}.{}", type_name, block), location)
    }

    /// A type as a whole (used for members assigned by hand)
    pub fn of_type(type_name: &str, location: Option<Location>) -> Self {
        Self::new(type_name, location)
    }

    /// A member declared by hand on a type
    pub fn member(type_name: &str, name: &str, location: Option<Location>) -> Self {
        Self::new(format!("{}::{}", type_name, name), location)
    }

    pub fn unknown() -> Self {
        Self::new("Unknown", None)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {}", self.label, location),
            None => write!(f, "{}", self.label),
        }
    }
}
