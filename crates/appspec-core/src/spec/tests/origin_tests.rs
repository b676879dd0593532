// crates/appspec-core/src/spec/tests/origin_tests.rs
#![cfg(test)]

use crate::spec::{Location, Origin};

#[test]
fn test_location_parse() {
    assert_eq!(Location::parse("src/app.rs:42"), Location::new("src/app.rs", Some(42)));
    assert_eq!(Location::parse("src/app.rs"), Location::new("src/app.rs", None));
    // A trailing segment that isn't a number belongs to the file name
    assert_eq!(Location::parse("C:thing"), Location::new("C:thing", None));
}

#[test]
fn test_location_caller() {
    let location = Location::caller();
    assert!(location.file().ends_with("origin_tests.rs"));
    assert!(location.line().unwrap() > 0);
}

#[test]
fn test_origin_labels() {
    let location = Some(Location::new("app.rs", Some(3)));
    assert_eq!(Origin::declaration("App", "Install", location.clone()).to_string(), "App.Install at app.rs:3");
    assert_eq!(Origin::member("App", "action", None).to_string(), "App::action");
    assert_eq!(Origin::of_type("App", location).label(), "App");
    assert_eq!(Origin::unknown().to_string(), "Unknown");
}
