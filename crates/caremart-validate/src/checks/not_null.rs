//! `not_null`: no null or blank values.

use polars::prelude::DataFrame;

use super::CheckOutcome;
use crate::util::texts;

pub fn check(df: &DataFrame, column: &str) -> Option<CheckOutcome> {
    let values = texts(df, column)?;
    let nulls = values.iter().filter(|v| v.is_none()).count() as u64;
    Some(CheckOutcome::fail(
        nulls,
        format!("{nulls} null value(s) in {column}"),
    ))
}
