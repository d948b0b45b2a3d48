//! Column access helpers for data tests.

use polars::prelude::{AnyValue, DataFrame};

use caremart_ingest::{ColumnLookup, any_to_string_non_empty};

/// Numeric view of a cell, whatever the physical type.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        other => any_to_string_non_empty(other).and_then(|s| s.parse::<f64>().ok()),
    }
}

/// Boolean view of a cell; text `true`/`false` is accepted.
pub fn any_to_bool(value: AnyValue<'_>) -> Option<bool> {
    match value {
        AnyValue::Boolean(b) => Some(b),
        other => match any_to_string_non_empty(other)?.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
    }
}

/// Trimmed text values of a column, `None` when the column is absent.
pub fn texts(df: &DataFrame, column: &str) -> Option<Vec<Option<String>>> {
    cells(df, column, any_to_string_non_empty)
}

pub fn numbers(df: &DataFrame, column: &str) -> Option<Vec<Option<f64>>> {
    cells(df, column, any_to_f64)
}

pub fn flags(df: &DataFrame, column: &str) -> Option<Vec<Option<bool>>> {
    cells(df, column, any_to_bool)
}

fn cells<T>(
    df: &DataFrame,
    column: &str,
    convert: impl Fn(AnyValue<'_>) -> Option<T>,
) -> Option<Vec<Option<T>>> {
    let lookup = ColumnLookup::from_frame(df);
    let series = df.column(lookup.get(column)?).ok()?;
    Some(
        (0..df.height())
            .map(|idx| convert(series.get(idx).unwrap_or(AnyValue::Null)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, NamedFrom, Series};

    #[test]
    fn reads_typed_and_text_columns() {
        let df = DataFrame::new(vec![
            Column::from(Series::new("Age".into(), vec![Some(30i64), None])),
            Column::from(Series::new("flag".into(), vec![Some("TRUE"), Some("x")])),
        ])
        .unwrap();
        assert_eq!(numbers(&df, "age"), Some(vec![Some(30.0), None]));
        assert_eq!(flags(&df, "flag"), Some(vec![Some(true), None]));
        assert_eq!(texts(&df, "missing"), None);
    }
}
