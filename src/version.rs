//! Build metadata embedded by `build.rs`.
//!
//! Reports carry the same metadata so a saved baseline can be traced back to
//! the binary that produced it.

use serde::Serialize;
use std::fmt;

/// Tool name used in reports and version output
pub const TOOL_NAME: &str = "setup-doc";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_date: Option<&'static str>,
    pub target: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rustc_version: Option<&'static str>,
}

impl BuildInfo {
    /// `0.1.0` or `0.1.0+abc1234` when the commit is known
    pub fn describe(&self) -> String {
        match self.commit {
            Some(commit) => format!("{}+{}", self.version, commit),
            None => self.version.to_string(),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", TOOL_NAME, self.describe())?;
        if let Some(date) = self.build_date {
            write!(f, " (built {})", date)?;
        }
        write!(f, "\ntarget: {}", self.target)?;
        if let Some(rustc) = self.rustc_version {
            write!(f, "\nrustc: {}", rustc)?;
        }
        Ok(())
    }
}

/// Metadata of the running binary
pub fn get_build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("SETUP_DOC_GIT_HASH"),
        build_date: option_env!("SETUP_DOC_BUILD_DATE"),
        target: env!("TARGET"),
        rustc_version: option_env!("SETUP_DOC_RUSTC_VERSION"),
    }
}
