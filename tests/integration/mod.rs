//! Integration tests for setup-doc.
//!
//! These tests drive the runner, the built-in battery, the formatters, and
//! the binary against temporary project trees.

pub mod cli_tests;
pub mod output_tests;
