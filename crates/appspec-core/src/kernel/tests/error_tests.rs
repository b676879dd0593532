// crates/appspec-core/src/kernel/tests/error_tests.rs
#![cfg(test)]

use crate::kernel::error::{Error, ErrorContext, NotFound, PathDesc};
use crate::spec::{Location, Origin};

fn not_found() -> NotFound {
    NotFound {
        path: "components.cli.get_parser".to_string(),
        root: "<App instance>".to_string(),
        found: vec!["components".to_string(), "cli".to_string()],
    }
}

#[test]
fn test_context_puts_provenance_first() {
    let context = ErrorContext::new()
        .with("zeta", 1)
        .with("removed_by", "Derived")
        .with("alpha", 2)
        .with("origin", "App.Methods")
        .with("added_by", "Base.Methods");

    assert_eq!(
        context.ordered_keys(),
        vec!["origin", "added_by", "removed_by", "alpha", "zeta"]
    );
    assert_eq!(
        context.render(),
        "origin='App.Methods'\nadded_by='Base.Methods'\nremoved_by='Derived'\nalpha='2'\nzeta='1'"
    );
}

#[test]
fn test_developer_error_display() {
    let plain = Error::developer("Something is off");
    assert_eq!(plain.to_string(), "Something is off");

    let origin = Origin::new("App.Install", Some(Location::new("app.toml", Some(4))));
    let detailed = Error::developer_with("Something is off", ErrorContext::new().origin(&origin));
    assert_eq!(detailed.to_string(), "Something is off\norigin='App.Install at app.toml:4'");
}

#[test]
fn test_path_not_found_display() {
    let err = Error::PathNotFound(not_found());
    assert_eq!(
        err.to_string(),
        "Couldn't find 'components.cli.get_parser' on <App instance>, only resolved up to 'components.cli'"
    );
    assert!(!err.is_developer_error());
}

#[test]
fn test_into_requirement() {
    let origin = Origin::new("App.Methods", None);
    let err = Error::PathNotFound(not_found()).into_requirement(PathDesc::DelegateTo, "get_parser", &origin);
    assert!(err.is_developer_error());
    assert_eq!(
        err.to_string(),
        "Requirement could not be resolved\n\
         origin='App.Methods'\n\
         delegate_to='components.cli.get_parser'\n\
         found='components.cli'\n\
         identity='get_parser'\n\
         root='<App instance>'"
    );

    let other = Error::Other("unrelated".into()).into_requirement(PathDesc::Requires, "x", &origin);
    assert!(matches!(other, Error::Other(_)));
}

#[test]
fn test_not_implemented_display() {
    let err = Error::NotImplemented {
        identity: "get_title".to_string(),
        origin: Origin::new("Derived.Methods", None),
    };
    assert_eq!(err.to_string(), "'get_title' is not implemented\norigin='Derived.Methods'");
}
