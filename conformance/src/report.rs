//! Conformance report types: results, severity levels, report aggregation,
//! and rendering.

use serde::Serialize;

/// Severity level of a conformance check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The property holds.
    Pass,
    /// The property could not be decided (non-blocking).
    Warning,
    /// The property is false (blocks conformance).
    Failure,
}

impl Severity {
    /// Four-letter tag used in text reports.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warning => "WARN",
            Self::Failure => "FAIL",
        }
    }
}

/// A single conformance check result.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Short identifier of the validator that produced this result.
    pub validator: String,
    /// Human-readable verdict, e.g. "W(3,3): SRG(40,12,2,4) confirmed".
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Counter-examples and other detail lines.
    pub details: Vec<String>,
}

impl TestResult {
    /// Creates a passing result.
    pub fn pass(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity: Severity::Pass,
            details: Vec::new(),
        }
    }

    /// Creates a failure result.
    pub fn fail(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity: Severity::Failure,
            details: Vec::new(),
        }
    }

    /// Creates a failure result with counter-example lines.
    pub fn fail_with_details(
        validator: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity: Severity::Failure,
            details,
        }
    }

    /// Creates a warning result.
    pub fn warn(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity: Severity::Warning,
            details: Vec::new(),
        }
    }

    /// Pass or fail depending on `ok`.
    pub fn check(validator: impl Into<String>, ok: bool, message: impl Into<String>) -> Self {
        if ok {
            Self::pass(validator, message)
        } else {
            Self::fail(validator, message)
        }
    }

    /// Attach detail lines.
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Returns true if this result represents a failure.
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Aggregated conformance report from all validators.
#[derive(Debug, Serialize)]
pub struct ConformanceReport {
    /// All individual test results across all validators.
    pub results: Vec<TestResult>,
}

impl ConformanceReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    /// Appends a result to this report.
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Extends this report with results from another report.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    /// Returns the count of results with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    /// Returns the count of failed checks.
    pub fn failure_count(&self) -> usize {
        self.count(Severity::Failure)
    }

    /// Returns true if all checks passed (no failures).
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}

impl Default for ConformanceReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-text rendering: one line per result, details indented, summary last.
pub fn render_text(report: &ConformanceReport) -> String {
    let mut out = String::new();
    out.push_str("fingeo Conformance Report\n");
    out.push_str("=========================\n\n");
    for result in &report.results {
        out.push_str(&format!(
            "[{}] {} - {}\n",
            result.severity.tag(),
            result.validator,
            result.message
        ));
        for detail in &result.details {
            out.push_str(&format!("       {detail}\n"));
        }
    }
    out.push_str(&format!(
        "\nSummary: {} passed, {} warnings, {} failed\n",
        report.count(Severity::Pass),
        report.count(Severity::Warning),
        report.count(Severity::Failure)
    ));
    out
}

/// JSON rendering of the whole report.
///
/// # Errors
///
/// Returns an error only if serialization fails.
pub fn render_json(report: &ConformanceReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_rendering() {
        let mut report = ConformanceReport::new();
        report.push(TestResult::pass("srg", "SRG(40,12,2,4) confirmed"));
        report.push(TestResult::warn("iso", "undetermined"));
        report.push(TestResult::fail_with_details(
            "srg",
            "not strongly regular",
            vec!["pair (0, 3): 0 common neighbours, expected 1".into()],
        ));
        assert_eq!(report.failure_count(), 1);
        assert!(!report.all_passed());
        let text = render_text(&report);
        assert!(text.contains("[PASS] srg - SRG(40,12,2,4) confirmed"));
        assert!(text.contains("       pair (0, 3)"));
        assert!(text.contains("Summary: 1 passed, 1 warnings, 1 failed"));
        let json = render_json(&report).unwrap();
        assert!(json.contains("\"severity\": \"failure\""));
    }
}
