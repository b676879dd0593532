// crates/appspec-core/src/compiler/tests/bookkeeper_tests.rs
#![cfg(test)]

use crate::compiler::{BookKeeper, InstallerBlock, Requirement};
use crate::kernel::error::{Error, PathDesc};
use crate::kernel::Instance;
use crate::object::{DynamicObject, Value};
use crate::spec::{Origin, TypeSpec};
use crate::tests::fixtures::compile;

fn origin(label: &str) -> Origin {
    Origin::new(label, None)
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_all_added_is_union_across_origins() {
    let mut bookkeeper = BookKeeper::new();
    bookkeeper.added_attributes(&origin("App.Attrs"), &names(&["one", "two"]));
    bookkeeper.added_attributes(&origin("App.Methods"), &names(&["runner"]));

    assert_eq!(bookkeeper.all_added(), names(&["one", "two", "runner"]));
    assert_eq!(bookkeeper.added_by("runner"), Some(&origin("App.Methods")));
    assert_eq!(bookkeeper.added_by("three"), None);
}

#[test]
fn test_name_is_added_under_one_origin_only() {
    let mut bookkeeper = BookKeeper::new();
    bookkeeper.added_attributes(&origin("first"), &names(&["x", "y"]));
    bookkeeper.added_attributes(&origin("second"), &names(&["x"]));

    assert_eq!(bookkeeper.added_by("x"), Some(&origin("second")));
    assert_eq!(bookkeeper.added().get(&origin("first")), Some(&names(&["y"])));
}

#[test]
fn test_removed_and_replaced_unions() {
    let mut bookkeeper = BookKeeper::new();
    bookkeeper.removed_attributes(&origin("a"), &names(&["x"]));
    bookkeeper.removed_attributes(&origin("b"), &names(&["y", "x"]));
    bookkeeper.replaced_attributes(&origin("c"), &names(&["z"]));

    assert_eq!(bookkeeper.all_removed(), names(&["x", "y"]));
    assert_eq!(bookkeeper.all_replaced(), names(&["z"]));
    assert_eq!(bookkeeper.removed_by("y"), Some(&origin("b")));
    assert_eq!(bookkeeper.replaced_by("z"), Some(&origin("c")));
}

#[test]
fn test_normalise_prunes_shadowed_additions() {
    let mut bookkeeper = BookKeeper::new();
    bookkeeper.added_attributes(&origin("App.Methods"), &names(&["runner", "get_title", "get_parser"]));
    bookkeeper.removed_attributes(&origin("App.Methods"), &names(&["get_title"]));
    bookkeeper.replaced_attributes(&origin("App"), &names(&["get_parser"]));
    bookkeeper.normalise();

    assert_eq!(bookkeeper.all_added(), names(&["runner"]));
    assert_eq!(bookkeeper.all_removed(), names(&["get_title"]));
}

#[test]
fn test_installers_may_only_be_set_once() {
    let mut bookkeeper = BookKeeper::new();
    let block = InstallerBlock {
        entries: Default::default(),
        extend: true,
        origin: origin("App.Install"),
    };
    bookkeeper.set_installers(block.clone()).unwrap();
    let err = bookkeeper.set_installers(block).unwrap_err();
    assert!(err.is_developer_error());
}

#[test]
fn test_requirements_keep_order() {
    let mut bookkeeper = BookKeeper::new();
    bookkeeper.add_requirement(["components.blah"], "action", &origin("App::action"));
    bookkeeper.add_requirement(Vec::<String>::new(), "quiet", &origin("App.Requires"));

    let requirements = bookkeeper.requirements();
    assert_eq!(requirements.len(), 2);
    assert_eq!(requirements[0].paths, names(&["components.blah"]));
    assert!(requirements[1].is_suppression());
}

#[test]
fn test_path_check() {
    let components = DynamicObject::new("components").with_attr("blah", 3);
    let app = Instance::new(compile(
        TypeSpec::new("App").member("components", Value::object(components)),
        &[],
    ));

    let ok = Requirement::new(["components.blah", "components"], "action", origin("App::action"));
    assert!(BookKeeper::path_check(&app, &ok).is_ok());

    let missing = Requirement::new(["components", "components.other"], "action", origin("App::action"));
    match BookKeeper::path_check(&app, &missing).unwrap_err() {
        Error::Requirement {
            desc, path, found, ..
        } => {
            assert_eq!(desc, PathDesc::Requires);
            assert_eq!(path, "components.other");
            assert_eq!(found, names(&["components"]));
        }
        other => panic!("expected a requirement error, got {:?}", other),
    }
}

#[test]
fn test_deferred_lists_components_before_custom() {
    let compiled = compile(
        TypeSpec::new("App")
            .block(crate::spec::SpecBlock::new("Strategy").main_type(crate::tests::fixtures::utility()))
            .block(crate::spec::SpecBlock::new("Components").entry("blah", 3)),
        &[],
    );
    let deferred = compiled.own().bookkeeper().deferred();
    let identities: Vec<&str> = deferred.iter().map(|item| item.identity()).collect();
    assert_eq!(identities, vec!["components", "strategy"]);
}
