// crates/appspec-core/src/loader/tests/config_tests.rs
#![cfg(test)]

use std::path::Path;

use crate::kernel::error::Error;
use crate::loader::{ConfigFormat, SpecDocument};

const JSON_DOC: &str = r#"{
    "types": [
        {
            "name": "App",
            "location": "app.json:3",
            "blocks": {
                "Components": { "cli": { "factory": "Cli" } },
                "Install": { "cli": "components.cli", "_extend": false }
            }
        },
        { "name": "Child", "extends": ["App"], "members": { "title": "hi" } }
    ]
}"#;

#[test]
fn test_format_from_path() {
    assert_eq!(ConfigFormat::from_path(Path::new("spec.json")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("SPEC.JSON")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("spec.ini")), None);
    assert_eq!(ConfigFormat::from_path(Path::new("spec")), None);
    assert_eq!(ConfigFormat::Json.extension(), "json");
}

#[test]
fn test_parse_json_keeps_declaration_order() {
    let doc = SpecDocument::parse(JSON_DOC, ConfigFormat::Json).unwrap();
    assert_eq!(doc.type_names(), vec!["App", "Child"]);

    let app = &doc.types[0];
    assert_eq!(app.location.as_deref(), Some("app.json:3"));
    assert_eq!(app.blocks.keys().collect::<Vec<_>>(), vec!["Components", "Install"]);
    assert_eq!(
        app.blocks["Install"].keys().collect::<Vec<_>>(),
        vec!["cli", "_extend"]
    );

    let child = &doc.types[1];
    assert_eq!(child.extends, vec!["App".to_string()]);
    assert!(child.blocks.is_empty());
    assert_eq!(child.members["title"], serde_json::json!("hi"));
}

#[test]
fn test_parse_error_is_config_error() {
    let err = SpecDocument::parse("{ not json", ConfigFormat::Json).unwrap_err();
    match err {
        Error::Config { format, source, .. } => {
            assert_eq!(format, "JSON");
            assert!(source.is_some());
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_json_serialize_then_parse() {
    let doc = SpecDocument::parse(JSON_DOC, ConfigFormat::Json).unwrap();
    let text = doc.serialize(ConfigFormat::Json).unwrap();
    assert_eq!(SpecDocument::parse(&text, ConfigFormat::Json).unwrap(), doc);
}

#[test]
fn test_from_file_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spec.ini");
    std::fs::write(&path, "").unwrap();
    assert!(matches!(SpecDocument::from_file(&path), Err(Error::Config { .. })));
}

#[test]
fn test_from_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = SpecDocument::from_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io { ref operation, .. } if operation == "read_spec_document"));
}

#[cfg(feature = "toml-config")]
#[test]
fn test_parse_toml() {
    let text = r#"
[[types]]
name = "App"

[types.blocks.Components]
cli = { factory = "Cli" }
logger = { suppress = true }

[types.blocks.Strategy]
_main = "Utility"
log_startup = false

[[types]]
name = "Child"
extends = ["App"]
"#;
    let doc = SpecDocument::parse(text, ConfigFormat::Toml).unwrap();
    assert_eq!(doc.type_names(), vec!["App", "Child"]);
    let app = &doc.types[0];
    assert_eq!(app.blocks["Components"]["cli"], serde_json::json!({ "factory": "Cli" }));
    assert_eq!(app.blocks["Strategy"]["log_startup"], serde_json::json!(false));
    assert_eq!(ConfigFormat::from_path(Path::new("demo.toml")), Some(ConfigFormat::Toml));
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_parse_yaml() {
    let text = r#"
types:
  - name: App
    blocks:
      Methods:
        runner: strategy.runner
        get_title: ~
"#;
    let doc = SpecDocument::parse(text, ConfigFormat::Yaml).unwrap();
    let methods = &doc.types[0].blocks["Methods"];
    assert_eq!(methods["runner"], serde_json::json!("strategy.runner"));
    assert!(methods["get_title"].is_null());
    assert_eq!(ConfigFormat::from_path(Path::new("demo.yml")), Some(ConfigFormat::Yaml));
}
