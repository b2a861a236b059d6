//! Mock projects for testing without a real checkout.
//!
//! Builds throwaway project trees with an injected environment so that
//! checks can be exercised against known-good and known-broken setups.

pub mod project;

pub use project::*;
