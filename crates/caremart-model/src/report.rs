use serde::{Deserialize, Serialize};

use crate::relation::RelationName;

/// How a failing data test affects the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestSeverity {
    /// Failing rows fail the run.
    Error,
    /// Failing rows are reported only.
    Warn,
}

impl TestSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestSeverity::Error => "error",
            TestSeverity::Warn => "warn",
        }
    }
}

/// Outcome of one data test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single data test against a materialized relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Stable test identifier (e.g. `not_null_stg_visits_visit_id`).
    pub name: String,
    pub relation: RelationName,
    /// Tested column (if the test is column-scoped).
    pub column: Option<String>,
    pub severity: TestSeverity,
    /// Number of offending rows.
    pub failures: u64,
    /// Human-readable description of what failed.
    pub message: Option<String>,
}

impl TestResult {
    pub fn status(&self) -> TestStatus {
        match (self.failures, self.severity) {
            (0, _) => TestStatus::Pass,
            (_, TestSeverity::Warn) => TestStatus::Warn,
            (_, TestSeverity::Error) => TestStatus::Fail,
        }
    }
}

/// All data test results of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestReport {
    pub results: Vec<TestResult>,
}

impl TestReport {
    pub fn add(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn passed_count(&self) -> usize {
        self.count_status(TestStatus::Pass)
    }

    pub fn warning_count(&self) -> usize {
        self.count_status(TestStatus::Warn)
    }

    pub fn failure_count(&self) -> usize {
        self.count_status(TestStatus::Fail)
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    fn count_status(&self, status: TestStatus) -> usize {
        self.results
            .iter()
            .filter(|result| result.status() == status)
            .count()
    }
}
