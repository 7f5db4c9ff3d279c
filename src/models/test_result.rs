//! Outcome, verdict and report types
//!
//! Defines per-invocation outcomes, the aggregated verdict of a test case, and
//! the suite-level report handed to external reporters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::suite::SuiteError;
use crate::assertions::AssertionFailure;

/// Result of a single execution of a test body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum InvocationOutcome {
    Passed,
    Failed(AssertionFailure),
    Errored(String),
    TimedOut,
}

impl InvocationOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, InvocationOutcome::Passed)
    }

    /// Message carried by a non-passing outcome
    pub fn message(&self) -> Option<String> {
        match self {
            InvocationOutcome::Passed => None,
            InvocationOutcome::Failed(f) => Some(f.message.clone()),
            InvocationOutcome::Errored(cause) => Some(cause.clone()),
            InvocationOutcome::TimedOut => Some("timed out".to_string()),
        }
    }
}

/// Per-kind outcome counts for one test case
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub passed: u32,
    pub failed: u32,
    pub errored: u32,
    pub timed_out: u32,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: &InvocationOutcome) {
        match outcome {
            InvocationOutcome::Passed => self.passed += 1,
            InvocationOutcome::Failed(_) => self.failed += 1,
            InvocationOutcome::Errored(_) => self.errored += 1,
            InvocationOutcome::TimedOut => self.timed_out += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.passed + self.failed + self.errored + self.timed_out
    }
}

/// Aggregate of every invocation outcome of one test case
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestVerdict {
    /// First non-passing outcome by completion order
    pub first_failure: Option<InvocationOutcome>,
    pub counts: OutcomeCounts,
}

impl TestVerdict {
    pub fn is_passed(&self) -> bool {
        self.first_failure.is_none()
    }

    pub fn status(&self) -> TestStatus {
        match &self.first_failure {
            None => TestStatus::Passed,
            Some(InvocationOutcome::Failed(_)) => TestStatus::Failed,
            Some(InvocationOutcome::Errored(_)) => TestStatus::Errored,
            Some(InvocationOutcome::TimedOut) => TestStatus::TimedOut,
            Some(InvocationOutcome::Passed) => TestStatus::Passed,
        }
    }
}

/// Why a test case was not executed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Ignored,
    TagFiltered,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Ignored => write!(f, "ignored"),
            SkipReason::TagFiltered => write!(f, "tag filtered"),
        }
    }
}

/// Final status of one test case
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Errored,
    TimedOut,
    Skipped,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Passed => "✓",
            TestStatus::Failed => "✗",
            TestStatus::Errored => "!",
            TestStatus::TimedOut => "⏱",
            TestStatus::Skipped => "○",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TestStatus::Passed | TestStatus::Skipped)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Passed => write!(f, "PASS"),
            TestStatus::Failed => write!(f, "FAIL"),
            TestStatus::Errored => write!(f, "ERROR"),
            TestStatus::TimedOut => write!(f, "TIMEOUT"),
            TestStatus::Skipped => write!(f, "SKIP"),
        }
    }
}

/// Report entry for one declared test case
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestReport {
    pub name: String,
    pub status: TestStatus,
    pub counts: OutcomeCounts,
    pub failure: Option<InvocationOutcome>,
    pub skipped_reason: Option<SkipReason>,
    pub duration_ms: u64,
}

impl TestReport {
    pub fn skipped(name: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            counts: OutcomeCounts::default(),
            failure: None,
            skipped_reason: Some(reason),
            duration_ms: 0,
        }
    }

    pub fn from_verdict(name: impl Into<String>, verdict: TestVerdict, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            status: verdict.status(),
            counts: verdict.counts,
            failure: verdict.first_failure,
            skipped_reason: None,
            duration_ms,
        }
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.name,
            self.duration_ms
        )?;
        if let Some(reason) = &self.skipped_reason {
            write!(f, " - {reason}")?;
        } else if let Some(msg) = self.failure.as_ref().and_then(|o| o.message()) {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Report for a whole suite run, in declaration order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuiteReport {
    pub suite: String,
    pub started_at: DateTime<Utc>,
    pub tests: Vec<TestReport>,
    /// Failure raised by the after-all callback
    pub callback_error: Option<String>,
    pub total_duration_ms: u64,
}

impl SuiteReport {
    fn count(&self, status: TestStatus) -> usize {
        self.tests.iter().filter(|t| t.status == status).count()
    }

    pub fn passed(&self) -> usize {
        self.count(TestStatus::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(TestStatus::Failed)
    }

    pub fn errored(&self) -> usize {
        self.count(TestStatus::Errored)
    }

    pub fn timed_out(&self) -> usize {
        self.count(TestStatus::TimedOut)
    }

    pub fn skipped(&self) -> usize {
        self.count(TestStatus::Skipped)
    }

    pub fn get(&self, name: &str) -> Option<&TestReport> {
        self.tests.iter().find(|t| t.name == name)
    }

    pub fn is_success(&self) -> bool {
        self.callback_error.is_none() && self.tests.iter().all(|t| t.status.is_success())
    }

    /// Surface an after-all failure as an error for the external reporter
    pub fn into_result(self) -> Result<Self, SuiteError> {
        match &self.callback_error {
            Some(message) => Err(SuiteError::AfterAll(message.clone())),
            None => Ok(self),
        }
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Suite {}", self.suite)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for test in &self.tests {
            writeln!(f, "  {test}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Error: {} | Timeout: {} | Skip: {}",
            self.tests.len(),
            self.passed(),
            self.failed(),
            self.errored(),
            self.timed_out(),
            self.skipped()
        )?;
        if let Some(err) = &self.callback_error {
            writeln!(f, "After-all callback failed: {err}")?;
        }
        writeln!(f, "Duration: {}ms", self.total_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_record() {
        let mut counts = OutcomeCounts::default();
        counts.record(&InvocationOutcome::Passed);
        counts.record(&InvocationOutcome::Passed);
        counts.record(&InvocationOutcome::TimedOut);
        counts.record(&InvocationOutcome::Errored("boom".into()));

        assert_eq!(counts.passed, 2);
        assert_eq!(counts.timed_out, 1);
        assert_eq!(counts.errored, 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_verdict_status() {
        let passed = TestVerdict {
            first_failure: None,
            counts: OutcomeCounts::default(),
        };
        assert_eq!(passed.status(), TestStatus::Passed);

        let failed = TestVerdict {
            first_failure: Some(InvocationOutcome::Failed(AssertionFailure::new("x"))),
            counts: OutcomeCounts::default(),
        };
        assert_eq!(failed.status(), TestStatus::Failed);
        assert!(!failed.is_passed());
    }

    #[test]
    fn test_skipped_report() {
        let report = TestReport::skipped("tagged", SkipReason::TagFiltered);
        assert_eq!(report.status, TestStatus::Skipped);
        assert_eq!(report.to_string(), "○ tagged [0ms] - tag filtered");
    }

    #[test]
    fn test_suite_report_summary() {
        let report = SuiteReport {
            suite: "demo".to_string(),
            started_at: Utc::now(),
            tests: vec![
                TestReport::skipped("a", SkipReason::Ignored),
                TestReport::from_verdict(
                    "b",
                    TestVerdict {
                        first_failure: Some(InvocationOutcome::TimedOut),
                        counts: OutcomeCounts {
                            timed_out: 1,
                            ..Default::default()
                        },
                    },
                    50,
                ),
            ],
            callback_error: None,
            total_duration_ms: 50,
        };

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.timed_out(), 1);
        assert!(!report.is_success());
        assert_eq!(report.get("b").map(|t| t.status), Some(TestStatus::TimedOut));
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_value(InvocationOutcome::Errored("io".into())).unwrap();
        assert_eq!(json["kind"], "errored");
        assert_eq!(json["detail"], "io");
    }
}
