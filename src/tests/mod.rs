pub mod processor_tests;
