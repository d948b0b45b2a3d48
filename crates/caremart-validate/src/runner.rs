//! Suite execution.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::{debug, warn};

use caremart_model::{RelationName, TestReport, TestStatus};

use crate::checks;
use crate::suite::{DataTest, default_suite};

/// Run `tests` against the materialized relations.
pub fn run_tests(
    relations: &BTreeMap<RelationName, DataFrame>,
    tests: &[DataTest],
) -> TestReport {
    let mut report = TestReport::default();
    for test in tests {
        let result = checks::run(test, relations);
        match result.status() {
            TestStatus::Pass => debug!(test = %result.name, "pass"),
            TestStatus::Warn | TestStatus::Fail => warn!(
                test = %result.name,
                severity = result.severity.as_str(),
                failures = result.failures,
                message = result.message.as_deref().unwrap_or_default(),
                "data test failed"
            ),
        }
        report.add(result);
    }
    report
}

/// Run the project's default suite.
pub fn run_default_suite(relations: &BTreeMap<RelationName, DataFrame>) -> TestReport {
    run_tests(relations, &default_suite())
}
