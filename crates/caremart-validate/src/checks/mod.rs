//! Data test implementations.
//!
//! Each module evaluates one kind of test against a DataFrame and counts the
//! offending rows.

mod accepted_values;
mod expectations;
mod not_null;
mod relationships;
mod unique;

use std::collections::BTreeMap;

use polars::prelude::DataFrame;

use caremart_model::{RelationName, TestResult};

use crate::suite::{DataTest, TestKind};

/// Failing row count plus an explanation when non-zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    pub failures: u64,
    pub message: Option<String>,
}

impl CheckOutcome {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn fail(failures: u64, message: impl Into<String>) -> Self {
        if failures == 0 {
            return Self::pass();
        }
        Self {
            failures,
            message: Some(message.into()),
        }
    }

    fn missing(what: String) -> Self {
        Self {
            failures: 1,
            message: Some(format!("{what} not found")),
        }
    }
}

/// Evaluate one test against the materialized relations.
pub fn run(test: &DataTest, relations: &BTreeMap<RelationName, DataFrame>) -> TestResult {
    let outcome = match relations.get(&test.relation) {
        None => CheckOutcome::missing(format!("relation {}", test.relation)),
        Some(df) => evaluate(test, df, relations),
    };
    TestResult {
        name: test.name(),
        relation: test.relation,
        column: test.column.clone(),
        severity: test.severity,
        failures: outcome.failures,
        message: outcome.message,
    }
}

fn evaluate(
    test: &DataTest,
    df: &DataFrame,
    relations: &BTreeMap<RelationName, DataFrame>,
) -> CheckOutcome {
    let column = test.column.as_deref();
    let outcome = match (&test.kind, column) {
        (TestKind::NotNull, Some(column)) => not_null::check(df, column),
        (TestKind::Unique, Some(column)) => unique::check(df, column),
        (TestKind::AcceptedValues { values }, Some(column)) => {
            accepted_values::check(df, column, values)
        }
        (TestKind::Relationships { to, field }, Some(column)) => match relations.get(to) {
            Some(parent) => relationships::check(df, column, parent, field),
            None => return CheckOutcome::missing(format!("relation {to}")),
        },
        (TestKind::Expression(expectation), _) => {
            expectations::check(expectation, df, column, relations)
        }
        (_, None) => Some(CheckOutcome::fail(1, "test requires a column")),
    };
    outcome.unwrap_or_else(|| {
        CheckOutcome::missing(format!(
            "column {} in {}",
            column.unwrap_or("?"),
            test.relation
        ))
    })
}
