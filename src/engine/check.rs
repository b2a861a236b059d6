//! Check definitions.
//!
//! A [`Check`] pairs a unique name with a [`Predicate`]. Predicates are
//! evaluated lazily by the runner and only ever see the read-only
//! [`CheckContext`], never global process state.

use crate::platform::env::{EnvSource, ProcessEnv};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// How much a failing check matters for the overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The environment is not usable without this
    #[default]
    Required,
    /// Nice to have; failure is reported but does not block
    Advisory,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Required => write!(f, "required"),
            Severity::Advisory => write!(f, "advisory"),
        }
    }
}

/// Read-only inputs available to every predicate.
#[derive(Clone)]
pub struct CheckContext {
    root: PathBuf,
    env: Arc<dyn EnvSource>,
}

impl CheckContext {
    pub fn new(root: impl Into<PathBuf>, env: Arc<dyn EnvSource>) -> Self {
        CheckContext {
            root: root.into(),
            env,
        }
    }

    /// Context rooted at the current directory reading the process environment
    pub fn from_process() -> Self {
        CheckContext::new(".", Arc::new(ProcessEnv))
    }

    /// Project root that relative paths are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn env(&self) -> &dyn EnvSource {
        self.env.as_ref()
    }

    /// Resolve a path relative to the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl fmt::Debug for CheckContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckContext")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// The evaluation logic behind a check.
///
/// `Ok(true)` passes, `Ok(false)` fails with the check's hint, and `Err`
/// fails with a hint derived from the error. Implementations that acquire an
/// exclusive resource must release it before returning.
#[async_trait]
pub trait Predicate: Send + Sync {
    async fn evaluate(&self, ctx: &CheckContext) -> anyhow::Result<bool>;
}

/// Adapter turning a synchronous closure into a [`Predicate`]
pub struct FnPredicate<F>(F);

#[async_trait]
impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&CheckContext) -> anyhow::Result<bool> + Send + Sync,
{
    async fn evaluate(&self, ctx: &CheckContext) -> anyhow::Result<bool> {
        (self.0)(ctx)
    }
}

/// Build a predicate from a closure
pub fn predicate_fn<F>(f: F) -> FnPredicate<F>
where
    F: Fn(&CheckContext) -> anyhow::Result<bool> + Send + Sync,
{
    FnPredicate(f)
}

/// A named unit of verification
pub struct Check {
    name: String,
    failure_hint: Option<String>,
    severity: Severity,
    timeout: Option<Duration>,
    predicate: Box<dyn Predicate>,
}

impl Check {
    pub fn new(name: impl Into<String>, predicate: impl Predicate + 'static) -> Self {
        Check {
            name: name.into(),
            failure_hint: None,
            severity: Severity::Required,
            timeout: None,
            predicate: Box::new(predicate),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.failure_hint = Some(hint.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn failure_hint(&self) -> Option<&str> {
        self.failure_hint.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn predicate(&self) -> &dyn Predicate {
        self.predicate.as_ref()
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("failure_hint", &self.failure_hint)
            .field("severity", &self.severity)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
