use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::kernel::error::{Error, Result};

/// Supported spec document formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// One type as written in a spec document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDocument {
    pub name: String,
    /// Names of already loaded or registered types
    #[serde(default)]
    pub extends: Vec<String>,
    /// Block identity -> entries. Reserved `_` keys are block flags.
    #[serde(default)]
    pub blocks: IndexMap<String, IndexMap<String, serde_json::Value>>,
    /// Members declared by hand
    #[serde(default)]
    pub members: IndexMap<String, serde_json::Value>,
    /// `file:line` used in diagnostics
    #[serde(default)]
    pub location: Option<String>,
}

/// A whole spec file: types in the order they are compiled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecDocument {
    #[serde(default)]
    pub types: Vec<TypeDocument>,
}

impl SpecDocument {
    /// Parse a document from a string based on format
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Json => serde_json::from_str(text).map_err(|e| Error::Config {
                format: "JSON".to_string(),
                message: format!("Failed to parse spec document: {}", e),
                source: Some(Box::new(e)),
            }),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| Error::Config {
                format: "YAML".to_string(),
                message: format!("Failed to parse spec document: {}", e),
                source: Some(Box::new(e)),
            }),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(text).map_err(|e| Error::Config {
                format: "TOML".to_string(),
                message: format!("Failed to parse spec document: {}", e),
                source: Some(Box::new(e)),
            }),
        }
    }

    /// Read and parse a document, picking the format from the extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::config(
                "unknown",
                format!("Unsupported spec file extension: {}", path.display()),
            )
        })?;
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(e, "read_spec_document", path.to_path_buf()))?;
        Self::parse(&text, format)
    }

    /// Serialize to string based on format
    pub fn serialize(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| Error::config("JSON", format!("Failed to serialize spec document: {}", e))),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(self)
                .map_err(|e| Error::config("YAML", format!("Failed to serialize spec document: {}", e))),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config("TOML", format!("Failed to serialize spec document: {}", e))),
        }
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|doc| doc.name.as_str()).collect()
    }
}
