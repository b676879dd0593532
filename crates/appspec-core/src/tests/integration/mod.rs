#![cfg(test)]

pub mod demo_app_tests;
pub mod scenario_tests;
