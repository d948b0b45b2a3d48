//! Polars value helpers.
//!
//! Helpers for pulling text values out of seed DataFrames regardless of the
//! physical column type, with case-insensitive column lookup.

use std::collections::HashMap;

use polars::prelude::{AnyValue, DataFrame};

use crate::csv::normalize_header;

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Converts AnyValue to a trimmed String, returning None if the result is blank.
pub fn any_to_string_non_empty(value: AnyValue<'_>) -> Option<String> {
    let s = any_to_string(value);
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Case-insensitive column lookup that preserves original names.
#[derive(Debug, Clone, Default)]
pub struct ColumnLookup {
    /// Maps lowercase normalized name -> original name
    inner: HashMap<String, String>,
}

impl ColumnLookup {
    pub fn from_frame(df: &DataFrame) -> Self {
        let inner = df
            .get_column_names()
            .into_iter()
            .map(|name| {
                (
                    normalize_header(name.as_str()).to_lowercase(),
                    name.to_string(),
                )
            })
            .collect();
        Self { inner }
    }

    /// Get the original column name for a logical name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(&normalize_header(name).to_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Extract a column as trimmed optional text (blank cells become `None`).
///
/// Returns `None` when the column does not exist.
pub fn text_column(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    let lookup = ColumnLookup::from_frame(df);
    let actual = lookup.get(name)?;
    let series = df.column(actual).ok()?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_string_non_empty(
            series.get(idx).unwrap_or(AnyValue::Null),
        ));
    }
    Some(values)
}
