pub mod bookkeeper_tests;
pub mod registry_tests;
