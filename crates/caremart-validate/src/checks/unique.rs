//! `unique`: no repeated non-null values.

use std::collections::{BTreeMap, HashSet};

use polars::prelude::DataFrame;

use super::CheckOutcome;
use crate::util::texts;

pub fn check(df: &DataFrame, column: &str) -> Option<CheckOutcome> {
    let values = texts(df, column)?;
    let mut seen = HashSet::new();
    let mut duplicates: BTreeMap<&str, u64> = BTreeMap::new();
    for value in values.iter().flatten() {
        if !seen.insert(value.as_str()) {
            *duplicates.entry(value.as_str()).or_insert(0) += 1;
        }
    }
    let failures = duplicates.values().sum();
    let examples: Vec<&str> = duplicates.keys().take(5).copied().collect();
    Some(CheckOutcome::fail(
        failures,
        format!(
            "{failures} duplicate value(s) in {column}: {}",
            examples.join(", ")
        ),
    ))
}
