pub mod delegate_tests;
