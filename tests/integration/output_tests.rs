//! Report formatting and baselines

use crate::mocks::MockProject;
use setup_doc::checks::FileExists;
use setup_doc::cli::args::OutputFormat;
use setup_doc::cli::output::{get_formatter, ALL_PASSED_MESSAGE, SOME_FAILED_MESSAGE};
use setup_doc::engine::result::{load_baseline, save_baseline, ReportDocument};
use setup_doc::{predicate_fn, summarize, DiagnosticRunner, RunReport};

async fn mixed_report(project: &MockProject) -> RunReport {
    let mut runner = DiagnosticRunner::new(project.context());
    runner
        .register_check("server.js exists", FileExists::new("server.js"), None)
        .unwrap();
    runner
        .register_check(
            "config <prod> & \"dev\"",
            predicate_fn(|_| Ok(false)),
            Some("fix <config>"),
        )
        .unwrap();
    runner.run().await
}

#[tokio::test]
async fn test_summarize_is_deterministic_for_identical_reports() {
    let project = MockProject::new().file("server.js", "");
    let report = mixed_report(&project).await;
    let copy = report.clone();

    assert_eq!(summarize(&report), summarize(&copy));
    assert!(summarize(&report).ends_with(SOME_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_summarize_all_passed() {
    let project = MockProject::new().file("server.js", "");
    let mut runner = DiagnosticRunner::new(project.context());
    runner
        .register_check("server.js exists", FileExists::new("server.js"), None)
        .unwrap();

    let text = summarize(&runner.run().await);

    assert_eq!(
        text,
        format!("[PASS] server.js exists\n\nPassed: 1  Failed: 0  Total: 1\n{}", ALL_PASSED_MESSAGE)
    );
}

#[tokio::test]
async fn test_json_output_parses_back() {
    let project = MockProject::new();
    let report = mixed_report(&project).await;

    let json = get_formatter(OutputFormat::Json, false, false, false).format(&report);
    let document: ReportDocument = serde_json::from_str(&json).unwrap();

    assert_eq!(document.tool, "setup-doc");
    assert_eq!(document.summary.total, 2);
    assert_eq!(document.summary.failed, 2);
    assert_eq!(document.report.results().len(), 2);
    assert_eq!(document.report.results()[1].hint(), Some("fix <config>"));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["results"][0]["name"], "server.js exists");
    assert_eq!(value["results"][0]["severity"], "required");
}

#[tokio::test]
async fn test_junit_output_counts_and_escapes() {
    let project = MockProject::new().file("server.js", "");
    let report = mixed_report(&project).await;

    let xml = get_formatter(OutputFormat::Junit, false, false, false).format(&report);

    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("tests=\"2\" failures=\"1\""));
    assert!(xml.contains("name=\"config &lt;prod&gt; &amp; &quot;dev&quot;\""));
    assert!(xml.contains("<failure message=\"fix &lt;config&gt;\">"));
    assert!(!xml.contains("<prod>"));
}

#[tokio::test]
async fn test_baseline_roundtrip_and_comparison() {
    let project = MockProject::new().file("server.js", "");
    let before = mixed_report(&project).await;
    let baseline_path = project.root().join("baseline.json");
    save_baseline(&before, &baseline_path).unwrap();

    let project = project.remove("server.js");
    let after = mixed_report(&project).await;
    let baseline = load_baseline(&baseline_path).unwrap();

    assert_eq!(baseline.results().len(), before.results().len());
    let comparison = after.compare_to_baseline(&baseline);
    assert_eq!(comparison.regressions, vec!["server.js exists".to_string()]);
    assert_eq!(comparison.unchanged, vec!["config <prod> & \"dev\"".to_string()]);
    assert!(comparison.has_regressions());
}
