//! Expression tests tying derived columns back to their inputs.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;

use caremart_model::RelationName;
use caremart_transform::expressions::{age_group, is_abnormal, utilization_category};
use caremart_transform::staging::NUMERIC_TEST_TYPE;

use super::CheckOutcome;
use crate::suite::Expectation;
use crate::util::{flags, numbers, texts};

pub fn check(
    expectation: &Expectation,
    df: &DataFrame,
    column: Option<&str>,
    relations: &BTreeMap<RelationName, DataFrame>,
) -> Option<CheckOutcome> {
    match expectation {
        Expectation::Between { min, max } => between(df, column?, *min, *max),
        Expectation::AgeGroupMatchesAge => age_group_matches_age(df),
        Expectation::NumericOnlyForNumericTests => numeric_only_for_numeric_tests(df),
        Expectation::AbnormalMatchesRange => abnormal_matches_range(df),
        Expectation::UtilizationMatchesVisits => utilization_matches_visits(df),
        Expectation::RowCountMatches { relation, column } => {
            let other = relations.get(relation)?;
            row_count_matches(df, other, column)
        }
    }
}

fn between(df: &DataFrame, column: &str, min: Option<f64>, max: Option<f64>) -> Option<CheckOutcome> {
    let values = numbers(df, column)?;
    let outside = values
        .iter()
        .flatten()
        .filter(|v| min.is_some_and(|lo| **v < lo) || max.is_some_and(|hi| **v > hi))
        .count() as u64;
    let lo = min.map_or("-inf".to_string(), |v| v.to_string());
    let hi = max.map_or("inf".to_string(), |v| v.to_string());
    Some(CheckOutcome::fail(
        outside,
        format!("{outside} value(s) of {column} outside [{lo}, {hi}]"),
    ))
}

fn age_group_matches_age(df: &DataFrame) -> Option<CheckOutcome> {
    let ages = numbers(df, "age")?;
    let groups = texts(df, "age_group")?;
    let mismatched = ages
        .iter()
        .zip(&groups)
        .filter(|(age, group)| match age {
            Some(age) => group.as_deref() != Some(age_group(*age as i64).as_str()),
            None => group.is_some(),
        })
        .count() as u64;
    Some(CheckOutcome::fail(
        mismatched,
        format!("{mismatched} row(s) where age_group does not match age"),
    ))
}

fn numeric_only_for_numeric_tests(df: &DataFrame) -> Option<CheckOutcome> {
    let test_types = texts(df, "test_type")?;
    let values = numbers(df, "numeric_result_value")?;
    let abnormal = flags(df, "is_abnormal")?;
    let violations = test_types
        .iter()
        .zip(values.iter().zip(&abnormal))
        .filter(|(test_type, (value, flag))| {
            test_type.as_deref() != Some(NUMERIC_TEST_TYPE) && (value.is_some() || flag.is_some())
        })
        .count() as u64;
    Some(CheckOutcome::fail(
        violations,
        format!("{violations} non-numeric test(s) with a numeric value or abnormal flag"),
    ))
}

fn abnormal_matches_range(df: &DataFrame) -> Option<CheckOutcome> {
    let values = numbers(df, "numeric_result_value")?;
    let mins = numbers(df, "reference_range_min")?;
    let maxs = numbers(df, "reference_range_max")?;
    let abnormal = flags(df, "is_abnormal")?;
    let mismatched = (0..values.len())
        .filter(|&idx| is_abnormal(values[idx], mins[idx], maxs[idx]) != abnormal[idx])
        .count() as u64;
    Some(CheckOutcome::fail(
        mismatched,
        format!("{mismatched} row(s) where is_abnormal disagrees with the reference range"),
    ))
}

fn utilization_matches_visits(df: &DataFrame) -> Option<CheckOutcome> {
    let visits = numbers(df, "total_visits")?;
    let categories = texts(df, "utilization_category")?;
    let mismatched = visits
        .iter()
        .zip(&categories)
        .filter(|(total, category)| {
            let expected = utilization_category(total.unwrap_or(0.0) as i64);
            category.as_deref() != Some(expected.as_str())
        })
        .count() as u64;
    Some(CheckOutcome::fail(
        mismatched,
        format!("{mismatched} row(s) where utilization_category does not match total_visits"),
    ))
}

fn row_count_matches(df: &DataFrame, other: &DataFrame, column: &str) -> Option<CheckOutcome> {
    let distinct: BTreeSet<String> = texts(other, column)?.into_iter().flatten().collect();
    let expected = distinct.len() as u64;
    let actual = df.height() as u64;
    Some(CheckOutcome::fail(
        expected.abs_diff(actual),
        format!("expected {expected} row(s), found {actual}"),
    ))
}
