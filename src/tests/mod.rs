//! Integration-level tests exercising the full pipeline

mod solver_tests;
