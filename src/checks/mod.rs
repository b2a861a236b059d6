//! Built-in environment checks.
//!
//! - Filesystem: files and directories present
//! - Environment: variables set to real, non-placeholder values
//! - Port: a named port is free to bind
//! - Manifest: declared script entries present
//!
//! # Graceful Degradation
//!
//! Every predicate follows the same rules:
//! - Condition observed as unmet: `Ok(false)`
//! - Condition could not be observed (unreadable file, bad setting): `Err`
//!   with context, which the runner turns into a failure with a hint
//!
//! No predicate panics or holds a resource past its own evaluation.

pub mod env_vars;
pub mod filesystem;
pub mod manifest;
pub mod port;

pub use env_vars::EnvVarConfigured;
pub use filesystem::{DirectoryExists, FileExists};
pub use manifest::ScriptDeclared;
pub use port::{PortAvailable, PortSetting, DEFAULT_PORT};
