// crates/appspec-core/src/tests/integration/demo_app_tests.rs
#![cfg(test)]

use std::sync::Arc;

use crate::compiler::CompiledType;
use crate::kernel::error::Error;
use crate::kernel::Instance;
use crate::object::{Callable, DynamicObject, Factory, Value};
use crate::spec::{SpecBlock, TypeSpec};
use crate::tests::fixtures::{compile, entries, journal, utility, Journal};

/// A toy component: optionally installable, with methods returning empty strings
fn toy(name: &str, journal: &Journal, installs: bool, methods: &[&str]) -> Factory {
    let name = name.to_string();
    let journal = journal.clone();
    let methods: Vec<String> = methods.iter().map(|m| m.to_string()).collect();
    Factory::new(name.clone(), move |_kwargs| {
        let mut object = DynamicObject::new(&name);
        if installs {
            let journal = journal.clone();
            let installed = name.clone();
            object = object.with_method("install", move |_cx, _args| {
                journal.lock().unwrap().push(format!("install {}", installed));
                Ok(Value::Null)
            });
        }
        for method in &methods {
            object = object.with_method(method, |_cx, _args| Ok(Value::from("")));
        }
        Ok(Value::object(object))
    })
}

fn empty() -> Factory {
    Factory::new("Empty", |_| {
        Ok(Value::object(
            DynamicObject::new("Empty").with_method("runner", |_cx, _args| Ok(Value::Null)),
        ))
    })
}

struct Demo {
    journal: Journal,
    app: Arc<CompiledType>,
    different: Arc<CompiledType>,
    better: Arc<CompiledType>,
}

fn demo() -> Demo {
    let journal = journal();
    let check_one = Callable::new("check_one", |cx, _args| match cx.get("one")? {
        Value::Int(1) => Ok(Value::Null),
        other => Err(Error::Other(format!("expected one to be 1, got {}", other))),
    });

    let app = compile(
        TypeSpec::new("App")
            .block(SpecBlock::new("Genie").main_type(toy("genie", &journal, true, &[])))
            .block(SpecBlock::new("Strategy").main_type(empty()))
            .block(SpecBlock::new("Attrs").entry("one", 1))
            .block(SpecBlock::new("Checkers").entry("check_one", check_one))
            .block(
                SpecBlock::new("Components")
                    .entry("cli", toy("cli", &journal, false, &["get_parser"]))
                    .entry("logging", toy("logging", &journal, false, &[]))
                    .entry("proctitle", toy("proctitle", &journal, true, &["get_title"]))
                    .entry("sigtermstop", toy("sigtermstop", &journal, true, &[]))
                    .entry("backgroundtasks", toy("backgroundtasks", &journal, true, &[])),
            )
            .block(
                SpecBlock::new("Methods")
                    .entry("runner", "strategy.runner")
                    .entry("get_title", "components.proctitle.get_title")
                    .entry("get_parser", "components.cli.get_parser"),
            )
            .block(
                SpecBlock::new("Install")
                    .entry("genie", "genie")
                    .entry("sigterm", "components.sigtermstop")
                    .entry("proctitle", "components.proctitle"),
            ),
        &[],
    );
    let different = compile(
        TypeSpec::new("DifferentApp")
            .block(SpecBlock::new("Strategy").main_type(utility()))
            .block(SpecBlock::new("Components").entry("blah", 3))
            .block(SpecBlock::new("Install").null("genie")),
        &[app.clone()],
    );

    let said = journal.clone();
    let action = Callable::new("action", move |_cx, args| {
        let blah = args.into_iter().next().unwrap_or(Value::Null);
        said.lock().unwrap().push(format!("joy to the world! : {}", blah));
        Ok(blah)
    })
    .requires(["components.blah"])
    .not_a_checker();
    let better = compile(TypeSpec::new("BetterApp").method(action), &[different.clone()]);

    Demo {
        journal,
        app,
        different,
        better,
    }
}

#[test]
fn test_app_with_empty_strategy() {
    let demo = demo();
    let app = Instance::new(demo.app);

    assert_eq!(app.execute().unwrap(), Value::Null);
    assert_eq!(
        entries(&demo.journal),
        vec!["install genie", "install sigtermstop", "install proctitle"]
    );
    assert_eq!(app.call("get_title", Vec::new()).unwrap(), Value::from(""));
    assert!(app.has("components.backgroundtasks"));
}

#[test]
fn test_better_app_runs_action() {
    let demo = demo();
    let app = Instance::new(demo.better);

    assert_eq!(app.execute().unwrap(), Value::Int(3));
    assert_eq!(
        entries(&demo.journal),
        vec!["install sigtermstop", "install proctitle", "joy to the world! : 3"]
    );
    // Genie is still built, just never installed
    assert!(app.has("genie"));
}

#[test]
fn test_different_app_lacks_action() {
    let demo = demo();
    let err = Instance::new(demo.different).bootstrap().unwrap_err();
    match err {
        Error::Requirement { path, identity, origin, .. } => {
            assert_eq!(path, "action");
            assert_eq!(identity, "strategy");
            assert_eq!(origin.label(), "DifferentApp.Strategy");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(entries(&demo.journal).is_empty());
}

#[test]
fn test_checker_sees_overridden_attribute() {
    let demo = demo();
    let broken = compile(
        TypeSpec::new("BrokenApp").block(SpecBlock::new("Attrs").entry("one", 2)),
        &[demo.better],
    );
    let err = Instance::new(broken).bootstrap().unwrap_err();
    assert_eq!(err.to_string(), "Error: expected one to be 1, got 2");
}

#[test]
fn test_provenance_across_the_chain() {
    let demo = demo();
    let ledger = demo.different.own().bookkeeper();
    assert_eq!(ledger.installers().map(|block| block.entries.get("genie").cloned()), Some(Some(None)));
    assert_eq!(
        demo.better.provenance("runner").added_by.map(|o| o.label().to_string()),
        Some("App.Methods".to_string())
    );
    assert_eq!(
        demo.better.provenance("strategy").added_by.map(|o| o.label().to_string()),
        Some("DifferentApp.Strategy".to_string())
    );
    let installers: Vec<String> = demo
        .better
        .installers()
        .into_iter()
        .map(|entry| entry.identity)
        .collect();
    assert_eq!(installers, vec!["sigterm", "proctitle"]);
}
