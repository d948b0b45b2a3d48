//! `relationships`: every non-null value exists in the parent relation.

use std::collections::HashSet;

use polars::prelude::DataFrame;

use super::CheckOutcome;
use crate::util::texts;

pub fn check(
    df: &DataFrame,
    column: &str,
    parent: &DataFrame,
    field: &str,
) -> Option<CheckOutcome> {
    let values = texts(df, column)?;
    let parent_values = texts(parent, field)?;
    let known: HashSet<&str> = parent_values.iter().flatten().map(String::as_str).collect();
    let orphans = values
        .iter()
        .flatten()
        .filter(|v| !known.contains(v.as_str()))
        .count() as u64;
    Some(CheckOutcome::fail(
        orphans,
        format!("{orphans} value(s) of {column} have no match in {field}"),
    ))
}
