//! Result aggregation and reporting.
//!
//! Collects check results append-only, freezes them into a [`RunReport`],
//! and supports comparing a report against a saved baseline.

use crate::engine::check::Severity;
use crate::version::{get_build_info, TOOL_NAME};
use crate::SetupDocError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Hint recorded for a failed check that carries no remediation text
pub const DEFAULT_FAILURE_HINT: &str = "condition not met";

/// Hint recorded for checks that never ran because the run was cancelled
pub const SKIPPED_HINT: &str = "skipped: run cancelled";

/// Outcome of evaluating one check.
///
/// `hint` is present exactly when `passed` is false. Skipped checks are
/// never passed. Both rules are enforced when a result is deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CheckResultRecord")]
pub struct CheckResult {
    name: String,
    passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(default)]
    severity: Severity,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    skipped: bool,
    #[serde(default)]
    duration_ms: u64,
}

/// Wire form of a [`CheckResult`], validated before conversion
#[derive(Deserialize)]
struct CheckResultRecord {
    name: String,
    passed: bool,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    severity: Severity,
    #[serde(default)]
    skipped: bool,
    #[serde(default)]
    duration_ms: u64,
}

impl TryFrom<CheckResultRecord> for CheckResult {
    type Error = String;

    fn try_from(record: CheckResultRecord) -> Result<Self, Self::Error> {
        if record.passed == record.hint.is_some() {
            return Err(format!(
                "check '{}': a hint must be present exactly when the check failed",
                record.name
            ));
        }
        if record.passed && record.skipped {
            return Err(format!("check '{}' cannot be both passed and skipped", record.name));
        }
        Ok(CheckResult {
            name: record.name,
            passed: record.passed,
            hint: record.hint,
            severity: record.severity,
            skipped: record.skipped,
            duration_ms: record.duration_ms,
        })
    }
}

impl CheckResult {
    pub fn pass(name: impl Into<String>, severity: Severity, duration_ms: u64) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            hint: None,
            severity,
            skipped: false,
            duration_ms,
        }
    }

    pub fn fail(
        name: impl Into<String>,
        severity: Severity,
        hint: Option<String>,
        duration_ms: u64,
    ) -> Self {
        CheckResult {
            name: name.into(),
            passed: false,
            hint: Some(hint.unwrap_or_else(|| DEFAULT_FAILURE_HINT.to_string())),
            severity,
            skipped: false,
            duration_ms,
        }
    }

    pub fn skip(name: impl Into<String>, severity: Severity) -> Self {
        CheckResult {
            name: name.into(),
            passed: false,
            hint: Some(SKIPPED_HINT.to_string()),
            severity,
            skipped: true,
            duration_ms: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn skipped(&self) -> bool {
        self.skipped
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub passed: usize,
    pub failed: usize,
    /// Failed checks that are required (subset of `failed`)
    pub required_failed: usize,
    /// Checks not executed (subset of `failed`)
    pub skipped: usize,
    pub total: usize,
}

/// The complete, ordered, read-only outcome of one battery execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    results: Vec<CheckResult>,
    #[serde(default)]
    total_duration_ms: u64,
}

impl RunReport {
    /// Results in execution order
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.results.iter().filter(|r| r.skipped).count()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    /// Look up a result by check name
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        let mut summary = ResultSummary::default();

        for result in &self.results {
            summary.total += 1;
            if result.passed {
                summary.passed += 1;
                continue;
            }
            summary.failed += 1;
            if result.skipped {
                summary.skipped += 1;
            }
            if result.severity == Severity::Required {
                summary.required_failed += 1;
            }
        }

        summary
    }

    /// Compare against a baseline report, matching checks by name
    pub fn compare_to_baseline(&self, baseline: &RunReport) -> ComparisonResult {
        let mut comparison = ComparisonResult::default();

        let baseline_results: HashMap<&str, bool> = baseline
            .results
            .iter()
            .map(|r| (r.name.as_str(), r.passed))
            .collect();

        for result in &self.results {
            match (baseline_results.get(result.name.as_str()), result.passed) {
                (Some(true), false) => comparison.regressions.push(result.name.clone()),
                (Some(false), true) => comparison.resolved.push(result.name.clone()),
                (None, false) => comparison.new_failures.push(result.name.clone()),
                _ => comparison.unchanged.push(result.name.clone()),
            }
        }

        comparison
    }
}

/// Baseline comparison result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonResult {
    /// Passed in the baseline, failing now
    pub regressions: Vec<String>,
    /// Failed in the baseline, passing now
    pub resolved: Vec<String>,
    /// Not in the baseline and failing now
    pub new_failures: Vec<String>,
    pub unchanged: Vec<String>,
}

impl ComparisonResult {
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty() || !self.new_failures.is_empty()
    }
}

/// Append-only collector used while a run is in progress.
///
/// Results can only be added, never replaced; [`ResultAggregator::finish`]
/// consumes the aggregator so nothing can be recorded after the report is
/// frozen.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: Vec<CheckResult>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ResultAggregator {
            results: Vec::with_capacity(capacity),
        }
    }

    /// Add a completed check result
    pub fn record(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Freeze the collected results into a report
    pub fn finish(self, total_duration_ms: u64) -> RunReport {
        RunReport {
            results: self.results,
            total_duration_ms,
        }
    }
}

/// JSON document written by the JSON formatter and read back as a baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub tool: String,
    pub version: String,
    pub summary: ResultSummary,
    #[serde(flatten)]
    pub report: RunReport,
}

impl ReportDocument {
    pub fn new(report: &RunReport) -> Self {
        ReportDocument {
            tool: TOOL_NAME.to_string(),
            version: get_build_info().describe(),
            summary: report.summary(),
            report: report.clone(),
        }
    }
}

/// Save a report as a JSON baseline
pub fn save_baseline(report: &RunReport, path: &Path) -> Result<(), SetupDocError> {
    let json = serde_json::to_string_pretty(&ReportDocument::new(report)).map_err(|e| {
        SetupDocError::Parse {
            context: "save_baseline".to_string(),
            message: e.to_string(),
        }
    })?;

    std::fs::write(path, json).map_err(|e| SetupDocError::Io {
        context: format!("writing baseline {}", path.display()),
        message: e.to_string(),
    })
}

/// Load a report from a JSON baseline
pub fn load_baseline(path: &Path) -> Result<RunReport, SetupDocError> {
    let content = std::fs::read_to_string(path).map_err(|e| SetupDocError::Io {
        context: format!("reading baseline {}", path.display()),
        message: e.to_string(),
    })?;

    let document: ReportDocument =
        serde_json::from_str(&content).map_err(|e| SetupDocError::Parse {
            context: format!("baseline {}", path.display()),
            message: e.to_string(),
        })?;

    Ok(document.report)
}
