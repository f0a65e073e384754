//! Human and machine readable suite reports.

use crate::suite::{Outcome, SuiteSummary};

const RULE: &str = "────────────────────────────────────────────────────────────────────────\n";

/// Render a plain-text report: one line per case, then totals.
pub fn render_text(summary: &SuiteSummary) -> String {
    let mut report = String::new();

    report.push_str("VISUAL TEST COMPARISON\n");
    report.push_str(RULE);
    report.push_str(&format!("  {:<6} {:<44} {:>10}  STATUS\n", "KIND", "CASE", "DIFF"));
    report.push_str(RULE);

    for result in &summary.results {
        let (diff, status) = match &result.outcome {
            Outcome::Passed { diff } => (diff.to_string(), "✓ PASS".to_string()),
            Outcome::Failed { diff } => (diff.to_string(), "✗ FAIL".to_string()),
            Outcome::SizeMismatch { actual, expected } => (
                "-".to_string(),
                format!(
                    "✗ SIZE {}x{} != {}x{}",
                    actual.0, actual.1, expected.0, expected.1
                ),
            ),
            Outcome::Incomparable => ("-".to_string(), "✗ INCOMPARABLE".to_string()),
            Outcome::Missing => ("-".to_string(), "✗ MISSING".to_string()),
            Outcome::Errored { message } => ("-".to_string(), format!("✗ ERROR: {message}")),
        };
        report.push_str(&format!(
            "  {:<6} {:<44} {:>10}  {}\n",
            result.kind.label(),
            result.name,
            diff,
            status
        ));
    }

    report.push_str(RULE);
    report.push_str(&format!(
        "  {} passed, {} failed, {} total\n",
        summary.passed,
        summary.failed,
        summary.total()
    ));
    report
}

/// Render the summary as pretty-printed JSON.
pub fn render_json(summary: &SuiteSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}
