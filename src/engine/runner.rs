//! Diagnostic runner.
//!
//! Owns the ordered battery of checks and executes it.
//!
//! # Partial-failure tolerance
//!
//! - Predicate returns false: recorded as a failure with the check's hint
//! - Predicate returns an error: recorded as a failure, hint derived from the error
//! - Predicate panics: caught and recorded like an error
//! - Predicate exceeds its timeout: future dropped, recorded as a failure
//! - Run cancelled: remaining checks recorded as skipped
//!
//! Every registered check appears exactly once in the report, in
//! registration order. The only error surfaced to the caller is a duplicate
//! name at registration time.

use crate::engine::check::{Check, CheckContext, Predicate};
use crate::engine::result::{CheckResult, ResultAggregator, RunReport};
use crate::SetupDocError;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runner configuration
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Applied to checks that do not carry their own timeout
    pub default_timeout: Option<Duration>,
}

/// How a single predicate evaluation ended
enum Outcome {
    Completed(anyhow::Result<bool>),
    Panicked(String),
    TimedOut(Duration),
}

/// Sequential diagnostic runner
pub struct DiagnosticRunner {
    config: RunnerConfig,
    context: CheckContext,
    checks: Vec<Check>,
    names: HashSet<String>,
}

impl DiagnosticRunner {
    pub fn new(context: CheckContext) -> Self {
        Self::with_config(context, RunnerConfig::default())
    }

    pub fn with_config(context: CheckContext, config: RunnerConfig) -> Self {
        DiagnosticRunner {
            config,
            context,
            checks: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Register a check by name, predicate, and optional failure hint
    pub fn register_check(
        &mut self,
        name: impl Into<String>,
        predicate: impl Predicate + 'static,
        hint: Option<&str>,
    ) -> Result<(), SetupDocError> {
        let mut check = Check::new(name, predicate);
        if let Some(hint) = hint {
            check = check.with_hint(hint);
        }
        self.register(check)
    }

    /// Register a fully built check
    pub fn register(&mut self, check: Check) -> Result<(), SetupDocError> {
        if !self.names.insert(check.name().to_string()) {
            return Err(SetupDocError::DuplicateCheck {
                name: check.name().to_string(),
            });
        }
        self.checks.push(check);
        Ok(())
    }

    /// Registered checks in execution order
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Run every registered check in registration order
    pub async fn run(&self) -> RunReport {
        self.run_until_cancelled(&CancellationToken::new()).await
    }

    /// Run the battery, checking `cancel` between checks.
    ///
    /// Once the token fires, every check not yet started is recorded as
    /// skipped. A check already in flight is allowed to finish.
    pub async fn run_until_cancelled(&self, cancel: &CancellationToken) -> RunReport {
        let start = Instant::now();
        let mut aggregator = ResultAggregator::with_capacity(self.checks.len());

        for check in &self.checks {
            if cancel.is_cancelled() {
                debug!(check = check.name(), "skipping check, run cancelled");
                aggregator.record(CheckResult::skip(check.name(), check.severity()));
                continue;
            }
            aggregator.record(self.execute_check(check).await);
        }

        let report = aggregator.finish(start.elapsed().as_millis() as u64);
        info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            total = report.len(),
            "diagnostic run complete"
        );
        report
    }

    /// Evaluate one check and convert every possible ending into a result
    async fn execute_check(&self, check: &Check) -> CheckResult {
        debug!(check = check.name(), "running check");
        let start = Instant::now();

        let evaluation = AssertUnwindSafe(check.predicate().evaluate(&self.context)).catch_unwind();
        let outcome = match check.timeout().or(self.config.default_timeout) {
            Some(limit) => match tokio::time::timeout(limit, evaluation).await {
                Ok(Ok(result)) => Outcome::Completed(result),
                Ok(Err(payload)) => Outcome::Panicked(panic_message(payload.as_ref())),
                Err(_) => Outcome::TimedOut(limit),
            },
            None => match evaluation.await {
                Ok(result) => Outcome::Completed(result),
                Err(payload) => Outcome::Panicked(panic_message(payload.as_ref())),
            },
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let hint = check.failure_hint();

        match outcome {
            Outcome::Completed(Ok(true)) => {
                debug!(check = check.name(), duration_ms, "check passed");
                CheckResult::pass(check.name(), check.severity(), duration_ms)
            }
            Outcome::Completed(Ok(false)) => {
                debug!(check = check.name(), duration_ms, "check failed");
                CheckResult::fail(
                    check.name(),
                    check.severity(),
                    hint.map(str::to_string),
                    duration_ms,
                )
            }
            Outcome::Completed(Err(err)) => {
                let cause = format!("{:#}", err);
                warn!(check = check.name(), error = %cause, "check errored");
                CheckResult::fail(
                    check.name(),
                    check.severity(),
                    Some(combine_hint(hint, &cause)),
                    duration_ms,
                )
            }
            Outcome::Panicked(message) => {
                warn!(check = check.name(), panic = %message, "check panicked");
                CheckResult::fail(
                    check.name(),
                    check.severity(),
                    Some(combine_hint(hint, &format!("predicate panicked: {}", message))),
                    duration_ms,
                )
            }
            Outcome::TimedOut(limit) => {
                warn!(check = check.name(), timeout_ms = limit.as_millis() as u64, "check timed out");
                CheckResult::fail(
                    check.name(),
                    check.severity(),
                    Some(combine_hint(
                        hint,
                        &format!("timed out after {}ms", limit.as_millis()),
                    )),
                    duration_ms,
                )
            }
        }
    }
}

/// Merge the check's own hint with the cause of an abnormal failure
fn combine_hint(hint: Option<&str>, cause: &str) -> String {
    match hint {
        Some(hint) => format!("{} ({})", hint, cause),
        None => cause.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
