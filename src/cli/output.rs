//! Output formatting for setup-doc.
//!
//! Provides terminal, JSON, and JUnit XML output formatters.
//!
//! # Graceful Degradation
//!
//! - Color disabled via `--no-color` or `NO_COLOR`
//! - Empty reports: produce valid output with zero checks
//! - Serialization failure (JSON): falls back to a minimal error document
//!
//! All formatters produce valid output for any `RunReport` input.

use crate::cli::args::OutputFormat;
use crate::engine::result::{CheckResult, ComparisonResult, ReportDocument, RunReport};
use console::Style;
use std::borrow::Cow;

/// Closing line when nothing failed
pub const ALL_PASSED_MESSAGE: &str = "All checks passed. The environment is ready.";

/// Closing line when at least one check failed
pub const SOME_FAILED_MESSAGE: &str = "Some checks failed. Fix the issues above and run again.";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a report into a string
    fn format(&self, report: &RunReport) -> String;
}

/// Render a report as plain text.
///
/// One line per result in execution order, a totals line, and a closing
/// line chosen only by whether anything failed. Identical reports always
/// render to identical text.
pub fn summarize(report: &RunReport) -> String {
    TerminalFormatter::new(false, false, false).format(report)
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter {
            color,
            verbose,
            quiet,
        }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn marker(&self, result: &CheckResult) -> String {
        if result.passed() {
            self.paint("[PASS]", Style::new().green())
        } else if result.skipped() {
            self.paint("[SKIP]", Style::new().dim())
        } else {
            self.paint("[FAIL]", Style::new().red())
        }
    }

    fn line(&self, result: &CheckResult) -> String {
        let mut line = format!("{} {}", self.marker(result), result.name());

        if self.verbose {
            line.push_str(&format!(" ({}, {}ms)", result.severity(), result.duration_ms()));
        }
        if let Some(hint) = result.hint() {
            line.push_str(" - ");
            line.push_str(hint);
        }

        line
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &RunReport) -> String {
        let mut output = String::new();

        for result in report.results() {
            if self.quiet && result.passed() {
                continue;
            }
            output.push_str(&self.line(result));
            output.push('\n');
        }

        if !output.is_empty() {
            output.push('\n');
        }

        output.push_str(&format!(
            "Passed: {}  Failed: {}  Total: {}\n",
            report.passed_count(),
            report.failed_count(),
            report.len()
        ));

        if self.verbose {
            let summary = report.summary();
            output.push_str(&format!(
                "Required failures: {}  Skipped: {}  Time: {:.1}s\n",
                summary.required_failed,
                summary.skipped,
                report.total_duration_ms() as f64 / 1000.0
            ));
        }

        if report.failed_count() == 0 {
            output.push_str(&self.paint(ALL_PASSED_MESSAGE, Style::new().green().bold()));
        } else {
            output.push_str(&self.paint(SOME_FAILED_MESSAGE, Style::new().red().bold()));
        }

        output
    }
}

/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &RunReport) -> String {
        let document = ReportDocument::new(report);
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };

        rendered.unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("failed to serialize report: {}", e) }).to_string()
        })
    }
}

/// JUnit XML formatter
pub struct JunitFormatter;

impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }
}

/// Escape text for use inside an XML attribute.
///
/// Newlines and tabs in hints become character references so attribute
/// normalization keeps them; other control characters are not
/// representable in XML 1.0 and are dropped.
fn xml_attr(text: &str) -> Cow<'_, str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>' | '"' | '\'') || c.is_control();
    if !text.contains(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

impl Default for JunitFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JunitFormatter {
    fn format(&self, report: &RunReport) -> String {
        let summary = report.summary();
        let time = report.total_duration_ms() as f64 / 1000.0;
        let failures = summary.failed - summary.skipped;

        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        output.push_str(&format!(
            "<testsuites tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
            summary.total, failures, summary.skipped, time
        ));
        output.push_str(&format!(
            "  <testsuite name=\"setup-doc\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
            summary.total, failures, summary.skipped, time
        ));

        for result in report.results() {
            output.push_str(&format!(
                "    <testcase name=\"{}\" classname=\"setup-doc.{}\" time=\"{:.3}\"",
                xml_attr(result.name()),
                result.severity(),
                result.duration_ms() as f64 / 1000.0
            ));

            let hint = xml_attr(result.hint().unwrap_or_default());
            if result.passed() {
                output.push_str(" />\n");
            } else if result.skipped() {
                output.push_str(">\n");
                output.push_str(&format!("      <skipped message=\"{}\" />\n", hint));
                output.push_str("    </testcase>\n");
            } else {
                output.push_str(">\n");
                output.push_str(&format!(
                    "      <failure message=\"{}\">{}</failure>\n",
                    hint, hint
                ));
                output.push_str("    </testcase>\n");
            }
        }

        output.push_str("  </testsuite>\n");
        output.push_str("</testsuites>");
        output
    }
}

/// Get a formatter based on the output format
pub fn get_formatter(
    format: OutputFormat,
    color: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(color, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Junit => Box::new(JunitFormatter::new()),
    }
}

/// Render a baseline comparison for the terminal
pub fn format_comparison(comparison: &ComparisonResult) -> String {
    let mut output = String::from("Baseline comparison:\n");

    let sections = [
        ("Regressions", &comparison.regressions),
        ("New failures", &comparison.new_failures),
        ("Resolved", &comparison.resolved),
    ];

    let mut any = false;
    for (title, names) in sections {
        if names.is_empty() {
            continue;
        }
        any = true;
        output.push_str(&format!("  {} ({}):\n", title, names.len()));
        for name in names {
            output.push_str(&format!("    - {}\n", name));
        }
    }

    if !any {
        output.push_str("  No changes since baseline\n");
    }

    output
}
