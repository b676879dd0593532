pub mod origin_tests;
