// crates/appspec-core/src/tests/integration/scenario_tests.rs
#![cfg(test)]

use crate::kernel::error::{Error, LifecyclePhase, PathDesc};
use crate::kernel::{Instance, Orchestrator};
use crate::object::Value;
use crate::spec::{SpecBlock, TypeSpec};
use crate::tests::fixtures::{action, compile, entries, installable, journal, scenario, Journal};

fn installer_layers(journal: &Journal, extend: bool) -> Instance {
    let a = compile(
        TypeSpec::new("A")
            .block(SpecBlock::new("Genie").main_type(installable("genie", journal)))
            .block(
                SpecBlock::new("Components")
                    .entry("proctitle", installable("proctitle", journal))
                    .entry("sigtermstop", installable("sigtermstop", journal)),
            )
            .block(
                SpecBlock::new("Install")
                    .entry("genie", "genie")
                    .entry("proctitle", "components.proctitle"),
            ),
        &[],
    );
    let d = compile(
        TypeSpec::new("D").block(
            SpecBlock::new("Install")
                .extend(extend)
                .entry("genie", "genie")
                .entry("sigterm", "components.sigtermstop"),
        ),
        &[a],
    );
    Instance::new(d)
}

#[test]
fn test_end_to_end_scenario() {
    let scenario = scenario();
    let app = Instance::new(scenario.leaf.clone());

    app.bootstrap().unwrap();
    assert_eq!(entries(&scenario.journal), vec!["install proctitle"]);

    let result = Orchestrator::new(&app).run().unwrap();
    assert_eq!(result, Value::Int(3));
    assert_eq!(entries(&scenario.journal), vec!["install proctitle"]);
    assert!(scenario.leaf.inherits_from(&scenario.derived));
    assert!(scenario.leaf.inherits_from(&scenario.base));
}

#[test]
fn test_installers_dedup_and_order() {
    let journal = journal();
    installer_layers(&journal, true).bootstrap().unwrap();
    assert_eq!(
        entries(&journal),
        vec!["install genie", "install sigtermstop", "install proctitle"]
    );
}

#[test]
fn test_installers_extend_false_hides_base() {
    let journal = journal();
    installer_layers(&journal, false).bootstrap().unwrap();
    assert_eq!(entries(&journal), vec!["install genie", "install sigtermstop"]);
}

#[test]
fn test_requirement_enforced_before_install_and_run() {
    let scenario = scenario();
    // Skips Derived, so nothing provides components.blah
    let lonely = compile(TypeSpec::new("Lonely").method(action()), &[scenario.base]);
    let app = Instance::new(lonely);

    let err = app.execute().unwrap_err();
    match &err {
        Error::Requirement { desc, path, identity, .. } => {
            assert_eq!(*desc, PathDesc::Requires);
            assert_eq!(path, "components.blah");
            assert_eq!(identity, "action");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(entries(&scenario.journal).is_empty());
    assert_eq!(app.phase(), LifecyclePhase::Validated);
}

#[test]
fn test_delegate_cells_are_per_instance() {
    let scenario = scenario();
    let first = Instance::new(scenario.leaf.clone());
    let second = Instance::new(scenario.leaf);
    first.bootstrap().unwrap();
    second.bootstrap().unwrap();

    let resolved = first.get("runner").unwrap();
    assert!(matches!(resolved, Value::Method(_)));
    first.set("runner", "overridden").unwrap();

    assert_eq!(first.get("runner").unwrap(), Value::from("overridden"));
    let other = second.get("runner").unwrap();
    assert!(matches!(other, Value::Method(_)));
    assert_ne!(other, resolved);
}

#[test]
fn test_null_suppression_fails_explicitly() {
    let scenario = scenario();
    let silenced = compile(
        TypeSpec::new("Silenced").block(SpecBlock::new("Methods").null("runner")),
        &[scenario.leaf],
    );
    let app = Instance::new(silenced.clone());

    let err = app.execute().unwrap_err();
    match err {
        Error::NotImplemented { identity, origin } => {
            assert_eq!(identity, "runner");
            assert_eq!(origin.label(), "Silenced.Methods");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(silenced.own().bookkeeper().all_removed(), vec!["runner".to_string()]);
}

#[test]
fn test_compiled_types_are_shared_read_only() {
    let scenario = scenario();
    let leaf = scenario.leaf;
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let leaf = leaf.clone();
            std::thread::spawn(move || {
                let app = Instance::new(leaf);
                app.execute().map_err(|e| e.to_string())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ok(Value::Int(3)));
    }
    assert_eq!(entries(&scenario.journal).len(), 4);
}
