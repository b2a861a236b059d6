//! Binary behaviour: exit codes, subcommands, and output selection

use crate::mocks::{free_port, MockProject};
use assert_cmd::Command;
use predicates::prelude::*;
use setup_doc::engine::result::ReportDocument;

fn setup_doc() -> Command {
    let mut cmd = Command::cargo_bin("setup-doc").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("SETUP_DOC_CONFIG")
        .env_remove("SETUP_DOC_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

/// A project whose battery is two files plus a port nothing listens on
fn project_with_config() -> MockProject {
    let config = format!(
        r#"
[[files]]
path = "app.py"
hint = "create the application entry point"

[[files]]
path = "NOTES.md"
severity = "advisory"

[port]
host = "127.0.0.1"
default = {}
"#,
        free_port()
    );
    MockProject::new().file("setup-doc.toml", &config)
}

#[test]
fn test_exit_zero_when_everything_passes() {
    let project = project_with_config().file("app.py", "").file("NOTES.md", "");

    setup_doc()
        .arg("--root")
        .arg(project.root())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[PASS] app.py exists"))
        .stdout(predicate::str::contains("All checks passed."));
}

#[test]
fn test_exit_one_when_required_check_fails() {
    let project = project_with_config().file("NOTES.md", "");

    setup_doc()
        .args(["check", "--root"])
        .arg(project.root())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "[FAIL] app.py exists - create the application entry point",
        ))
        .stdout(predicate::str::contains("Passed: 2  Failed: 1  Total: 3"));
}

#[test]
fn test_exit_two_when_only_advisory_checks_fail() {
    let project = project_with_config().file("app.py", "");

    setup_doc()
        .arg("--root")
        .arg(project.root())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[FAIL] NOTES.md exists"));
}

#[test]
fn test_exit_three_on_missing_config() {
    let project = MockProject::new();

    setup_doc()
        .arg("--root")
        .arg(project.root())
        .arg("--config")
        .arg(project.root().join("nope.toml"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn test_exit_three_on_bad_arguments() {
    setup_doc().args(["--format", "yaml"]).assert().code(3);
}

#[test]
fn test_quiet_prints_only_failures() {
    let project = project_with_config().file("app.py", "");

    setup_doc()
        .arg("--root")
        .arg(project.root())
        .arg("--quiet")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("app.py").not())
        .stdout(predicate::str::contains("[FAIL] NOTES.md exists"));
}

#[test]
fn test_json_format() {
    let project = project_with_config().file("app.py", "").file("NOTES.md", "");

    let output = setup_doc()
        .args(["--format", "json", "--root"])
        .arg(project.root())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let document: ReportDocument = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document.summary.total, 3);
    assert_eq!(document.summary.passed, 3);
}

#[test]
fn test_format_from_environment() {
    let project = project_with_config().file("app.py", "").file("NOTES.md", "");

    let output = setup_doc()
        .env("SETUP_DOC_FORMAT", "json")
        .arg("--root")
        .arg(project.root())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let document: ReportDocument = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document.summary.total, 3);
}

#[test]
fn test_verbose_adds_details_and_debug_logging() {
    let project = project_with_config().file("app.py", "").file("NOTES.md", "");

    setup_doc()
        .arg("--root")
        .arg(project.root())
        .arg("--verbose")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[PASS] app.py exists (required, "))
        .stdout(predicate::str::contains("Required failures: 0  Skipped: 0"))
        .stderr(predicate::str::contains("running check"));
}

#[test]
fn test_env_file_is_relative_to_working_directory() {
    let project = MockProject::new().file(
        "setup-doc.toml",
        "[[env]]\nname = \"SETUP_DOC_TEST_DEPLOY_KEY\"\n",
    );
    let workdir = MockProject::new().file("prod.env", "SETUP_DOC_TEST_DEPLOY_KEY=k-123\n");

    setup_doc()
        .current_dir(workdir.root())
        .arg("--root")
        .arg(project.root())
        .args(["--env-file", "prod.env"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[PASS] SETUP_DOC_TEST_DEPLOY_KEY is configured"));
}

#[test]
fn test_missing_env_file_is_a_usage_error() {
    let project = MockProject::new();

    setup_doc()
        .arg("--root")
        .arg(project.root())
        .args(["--env-file", "no-such.env"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no-such.env"));
}

#[test]
fn test_baseline_comparison_reports_regressions() {
    let project = project_with_config().file("app.py", "").file("NOTES.md", "");
    let baseline = project.root().join("baseline.json");

    let output = setup_doc()
        .args(["--format", "json", "--root"])
        .arg(project.root())
        .output()
        .unwrap();
    std::fs::write(&baseline, &output.stdout).unwrap();

    let project = project.remove("app.py");
    setup_doc()
        .arg("--root")
        .arg(project.root())
        .arg("--baseline")
        .arg(&baseline)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Regressions (1)"))
        .stderr(predicate::str::contains("- app.py exists"));
}

#[test]
fn test_list_shows_default_battery() {
    let project = MockProject::new();

    setup_doc()
        .arg("list")
        .arg("--root")
        .arg(project.root())
        .env("PORT", "4567")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Checks (11):"))
        .stdout(predicate::str::contains("[advisory] README.md exists"))
        .stdout(predicate::str::contains("port 4567 is available"));
}

#[test]
fn test_init_prints_loadable_config() {
    let output = setup_doc().arg("init").output().unwrap();

    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("[[files]]"));
    assert!(text.contains("node_modules"));
    let config = setup_doc::config::DoctorConfig::from_toml(&text).unwrap();
    assert_eq!(config, setup_doc::config::DoctorConfig::default());
}

#[test]
fn test_version_command() {
    setup_doc()
        .arg("version")
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("setup-doc "))
        .stdout(predicate::str::contains("target: "));
}

#[test]
fn test_version_as_json() {
    let output = setup_doc().args(["version", "--format", "json"]).output().unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    assert!(value["target"].is_string());
}
