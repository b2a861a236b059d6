//! Platform abstraction layer.
//!
//! Provides the read-only inputs checks consume:
//! - Environment variables
//! - Network port probing

pub mod env;
pub mod network;
