//! `accepted_values`: every non-null value is in the vocabulary.

use std::collections::{BTreeSet, HashSet};

use polars::prelude::DataFrame;

use super::CheckOutcome;
use crate::util::texts;

pub fn check(df: &DataFrame, column: &str, accepted: &[String]) -> Option<CheckOutcome> {
    let values = texts(df, column)?;
    let accepted: HashSet<&str> = accepted.iter().map(String::as_str).collect();
    let mut failures = 0u64;
    let mut unexpected = BTreeSet::new();
    for value in values.iter().flatten() {
        if !accepted.contains(value.as_str()) {
            failures += 1;
            if unexpected.len() < 5 {
                unexpected.insert(value.as_str());
            }
        }
    }
    let unexpected: Vec<&str> = unexpected.into_iter().collect();
    Some(CheckOutcome::fail(
        failures,
        format!(
            "{failures} value(s) outside the accepted set in {column}: {}",
            unexpected.join(", ")
        ),
    ))
}
