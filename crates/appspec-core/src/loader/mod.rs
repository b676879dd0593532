//! # Appspec Spec Loader
//!
//! Builds [`TypeSpec`]s from structured documents (JSON always, YAML and
//! TOML behind the `yaml-config` / `toml-config` features) and compiles them
//! in document order into a [`TypeRegistry`].
//!
//! Document values map onto [`Value`]s directly, except for single-key
//! tables:
//!
//! - `{ factory = "Name" }`: a factory registered in the [`Catalog`]
//! - `{ callable = "name" }`: a callable registered in the [`Catalog`]
//! - `{ suppress = true }`: a null entry (for formats without null)
//!
//! `_main` and `_main_type` also accept a bare factory name.
use std::path::Path;
use std::sync::Arc;

use crate::compiler::{CompiledType, Compiler};
use crate::kernel::constants::{FLAG_MAIN, FLAG_MAIN_TYPE};
use crate::kernel::error::{Error, Result};
use crate::object::Value;
use crate::spec::{Location, SpecBlock, TypeSpec};

pub mod catalog;
pub mod config;

pub use catalog::{Catalog, TypeRegistry};
pub use config::{ConfigFormat, SpecDocument, TypeDocument};

/// Turns spec documents into compiled types.
#[derive(Debug, Default)]
pub struct SpecLoader {
    compiler: Compiler,
    catalog: Catalog,
}

impl SpecLoader {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            compiler: Compiler::new(),
            catalog,
        }
    }

    pub fn with_compiler(compiler: Compiler, catalog: Catalog) -> Self {
        Self { compiler, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Parse `text` and compile every type it declares into `registry`.
    pub fn load_str(
        &self,
        text: &str,
        format: ConfigFormat,
        registry: &mut TypeRegistry,
    ) -> Result<Vec<Arc<CompiledType>>> {
        let document = SpecDocument::parse(text, format)?;
        self.load_document(&document, None, registry)
    }

    /// Read a spec file and compile every type it declares into `registry`.
    pub fn load_file(&self, path: &Path, registry: &mut TypeRegistry) -> Result<Vec<Arc<CompiledType>>> {
        log::info!("Loading spec document {}", path.display());
        let document = SpecDocument::from_file(path)?;
        let file = path.display().to_string();
        self.load_document(&document, Some(file.as_str()), registry)
    }

    pub fn load_document(
        &self,
        document: &SpecDocument,
        file: Option<&str>,
        registry: &mut TypeRegistry,
    ) -> Result<Vec<Arc<CompiledType>>> {
        let mut compiled = Vec::with_capacity(document.types.len());
        for doc in &document.types {
            if registry.contains(&doc.name) {
                return Err(Error::config(
                    "document",
                    format!("Type '{}' is declared more than once", doc.name),
                ));
            }
            let bases = doc
                .extends
                .iter()
                .map(|base| registry.get(base))
                .collect::<Result<Vec<_>>>()?;
            let spec = self.type_spec(doc, file)?;
            let compiled_type = self.compiler.compile(spec, &bases)?;
            registry.register(compiled_type.clone())?;
            compiled.push(compiled_type);
        }
        log::info!("Loaded {} type(s)", compiled.len());
        Ok(compiled)
    }

    /// Build the [`TypeSpec`] a document describes without compiling it.
    pub fn type_spec(&self, doc: &TypeDocument, file: Option<&str>) -> Result<TypeSpec> {
        let location = match (&doc.location, file) {
            (Some(location), _) => Some(Location::parse(location)),
            (None, Some(file)) => Some(Location::new(file, None)),
            (None, None) => None,
        };

        let mut spec = TypeSpec::new(&doc.name).located(location.clone());
        for (identity, entries) in &doc.blocks {
            let mut block = SpecBlock::new(identity).located(location.clone());
            for (key, raw) in entries {
                let value = match (key.as_str(), raw) {
                    (FLAG_MAIN | FLAG_MAIN_TYPE, serde_json::Value::String(name)) => {
                        Value::Factory(self.catalog.get_factory(name)?.clone())
                    }
                    _ => self.value(raw)?,
                };
                block = block.entry(key, value);
            }
            spec = spec.block(block);
        }
        for (name, raw) in &doc.members {
            spec = spec.member(name, self.value(raw)?);
        }
        Ok(spec)
    }

    /// Convert one document value.
    pub fn value(&self, raw: &serde_json::Value) -> Result<Value> {
        use serde_json::Value as Json;

        Ok(match raw {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(number) => match number.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(number.as_f64().unwrap_or_default()),
            },
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => Value::List(
                items
                    .iter()
                    .map(|item| self.value(item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Json::Object(table) => match table.iter().next() {
                Some((key, Json::String(name))) if table.len() == 1 && key == "factory" => {
                    Value::Factory(self.catalog.get_factory(name)?.clone())
                }
                Some((key, Json::String(name))) if table.len() == 1 && key == "callable" => {
                    Value::Callable(self.catalog.get_callable(name)?.clone())
                }
                Some((key, Json::Bool(true))) if table.len() == 1 && key == "suppress" => Value::Null,
                _ => {
                    return Err(Error::config(
                        "document",
                        format!(
                            "Unsupported table value {}; expected {{factory}}, {{callable}} or {{suppress}}",
                            raw
                        ),
                    ))
                }
            },
        })
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
