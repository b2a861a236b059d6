//! Diagnostic engine module.
//!
//! Provides check definitions, sequential execution, and result aggregation.

pub mod check;
pub mod result;
pub mod runner;
