// crates/appspec-core/src/compiler/tests/registry_tests.rs
#![cfg(test)]

use std::sync::{Arc, Mutex};

use crate::compiler::{BlockHandler, Compiler, HandlerContext, HandlerRegistry, Member};
use crate::kernel::error::Result;
use crate::kernel::Instance;
use crate::object::Value;
use crate::spec::{SpecBlock, TypeSpec};

/// Puts `<name>_<key>` attributes on the type and remembers when it ran
struct Prefixing {
    name: &'static str,
    order: Arc<Mutex<Vec<String>>>,
}

impl BlockHandler for Prefixing {
    fn name(&self) -> &str {
        self.name
    }

    fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<Vec<(String, Member)>> {
        self.order.lock().unwrap().push(self.name.to_string());
        Ok(cx
            .block
            .entries()
            .iter()
            .map(|(key, value)| (format!("{}_{}", self.name, key), Member::Value(value.clone())))
            .collect())
    }
}

#[test]
fn test_defaults_are_registered() {
    let registry = HandlerRegistry::with_defaults();
    assert_eq!(
        registry.names(),
        vec!["attrs", "checkers", "components", "install", "installers", "methods", "requires"]
    );
    assert!(registry.contains("Install"));
    assert!(registry.get("METHODS").is_some());
    assert_eq!(HandlerRegistry::new().count(), 0);
}

#[test]
fn test_duplicate_registration_fails() {
    let mut registry = HandlerRegistry::with_defaults();
    let err = registry
        .register(Box::new(Prefixing {
            name: "Attrs",
            order: Arc::default(),
        }))
        .unwrap_err();
    assert_eq!(err.to_string(), "Declaration for attrs specified twice");
}

#[test]
fn test_custom_handlers_run_in_name_order() {
    let order: Arc<Mutex<Vec<String>>> = Arc::default();
    let mut compiler = Compiler::with_registry(HandlerRegistry::new());
    for name in ["zeta", "alpha", "mid"] {
        compiler
            .registry_mut()
            .register(Box::new(Prefixing {
                name,
                order: order.clone(),
            }))
            .unwrap();
    }

    let compiled = compiler
        .compile(
            TypeSpec::new("App")
                .block(SpecBlock::new("Zeta").entry("a", 1))
                .block(SpecBlock::new("Mid").entry("b", 2))
                .block(SpecBlock::new("Alpha").entry("c", 3)),
            &[],
        )
        .unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["alpha", "mid", "zeta"]);
    let app = Instance::new(compiled.clone());
    assert_eq!(app.get("zeta_a").unwrap(), Value::Int(1));
    assert_eq!(
        compiled.own().bookkeeper().added_by("alpha_c").map(|o| o.label()),
        Some("App.Alpha")
    );
}

#[test]
fn test_unregistered_blocks_become_custom_objects() {
    // Without the built-ins "Attrs" is just another custom block
    let compiler = Compiler::with_registry(HandlerRegistry::new());
    let err = compiler
        .compile(TypeSpec::new("App").block(SpecBlock::new("Attrs").entry("a", 1)), &[])
        .unwrap_err();
    assert!(err.to_string().contains("Component Attrs needs to have a mainType"), "{}", err);
}
