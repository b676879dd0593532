// crates/appspec-core/src/object/tests/delegate_tests.rs
#![cfg(test)]

use crate::kernel::error::{Error, PathDesc};
use crate::kernel::Instance;
use crate::object::{DelegateSpec, LazyDelegate, Value};
use crate::spec::{Origin, SpecBlock, TypeSpec};
use crate::tests::fixtures::compile;

fn instance_with_target() -> Instance {
    Instance::new(compile(TypeSpec::new("Owner").member("target", 1), &[]))
}

fn cell(path: &str) -> LazyDelegate {
    LazyDelegate::new(DelegateSpec::new("alias", path, Origin::new("Owner.Methods", None)))
}

#[test]
fn test_first_get_resolves_and_caches() {
    let owner = instance_with_target();
    let delegate = cell("target");
    assert!(!delegate.is_resolved());

    assert_eq!(delegate.get(&owner).unwrap(), Value::Int(1));
    assert!(delegate.is_resolved());

    // Changing the target afterwards doesn't re-resolve
    owner.set("target", 2).unwrap();
    assert_eq!(delegate.get(&owner).unwrap(), Value::Int(1));
}

#[test]
fn test_set_forces_value() {
    let owner = instance_with_target();
    let delegate = cell("target");
    delegate.get(&owner).unwrap();

    delegate.set(Value::from("forced"));
    assert_eq!(delegate.get(&owner).unwrap(), Value::from("forced"));
}

#[test]
fn test_set_before_get_skips_resolution() {
    let owner = instance_with_target();
    let delegate = cell("does.not.exist");
    delegate.set(Value::Int(7));
    assert_eq!(delegate.get(&owner).unwrap(), Value::Int(7));
}

#[test]
fn test_failed_resolution_is_delegate_requirement_error() {
    let owner = instance_with_target();
    let delegate = cell("target.missing");

    match delegate.get(&owner).unwrap_err() {
        Error::Requirement {
            desc,
            path,
            found,
            identity,
            origin,
            ..
        } => {
            assert_eq!(desc, PathDesc::DelegateTo);
            assert_eq!(path, "target.missing");
            assert_eq!(found, vec!["target"]);
            assert_eq!(identity, "alias");
            assert_eq!(origin.label(), "Owner.Methods");
        }
        other => panic!("expected a requirement error, got {:?}", other),
    }
    assert!(!delegate.is_resolved());
}

#[test]
fn test_failed_resolution_can_succeed_later() {
    let owner = instance_with_target();
    let delegate = cell("late");
    assert!(delegate.get(&owner).is_err());

    owner.set("late", "here").unwrap();
    assert_eq!(delegate.get(&owner).unwrap(), Value::from("here"));
}

#[test]
fn test_delegate_pointing_at_itself_is_a_developer_error() {
    let compiled = compile(
        TypeSpec::new("Loop").block(SpecBlock::new("Methods").entry("spin", "spin")),
        &[],
    );
    let app = Instance::new(compiled);
    let err = app.get("spin").unwrap_err();
    assert!(err.is_developer_error());
    assert!(err.to_string().contains("refers back to itself"), "{}", err);
}

#[test]
fn test_instances_never_share_delegate_cells() {
    let compiled = compile(
        TypeSpec::new("Shared")
            .member("target", 1)
            .block(SpecBlock::new("Methods").entry("alias", "target")),
        &[],
    );
    let first = Instance::new(compiled.clone());
    let second = Instance::new(compiled);

    first.set("alias", "first only").unwrap();
    assert_eq!(first.get("alias").unwrap(), Value::from("first only"));
    assert_eq!(second.get("alias").unwrap(), Value::Int(1));
}
