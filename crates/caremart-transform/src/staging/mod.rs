//! Staging layer: one cleaned relation per raw source.
//!
//! Each model filters rows on their identity and date keys first, then
//! normalizes text, casts typed fields and derives categories. A row is
//! dropped only when a key is missing or a key date is unreadable; any other
//! unreadable value becomes null. Both outcomes are counted in the returned
//! [`StageDiagnostics`].

mod lab_results;
mod patients;
mod visits;

pub use lab_results::{NUMERIC_TEST_TYPE, stg_lab_results};
pub use patients::stg_patients;
pub use visits::stg_visits;

use chrono::NaiveDate;

use caremart_model::{RejectReason, StageDiagnostics};

use crate::expressions::{clean_text, parse_date};

/// Output of a staging model.
#[derive(Debug, Clone, PartialEq)]
pub struct Staged<T> {
    pub rows: Vec<T>,
    pub diagnostics: StageDiagnostics,
}

impl<T> Staged<T> {
    fn finish(rows: Vec<T>, mut diagnostics: StageDiagnostics) -> Self {
        diagnostics.output_rows = rows.len();
        Self { rows, diagnostics }
    }
}

/// Trimmed key value, or a `MissingKey` rejection.
fn require_key(
    diagnostics: &mut StageDiagnostics,
    column: &str,
    value: Option<&str>,
) -> Option<String> {
    let key = clean_text(value);
    if key.is_none() {
        diagnostics.reject(column, RejectReason::MissingKey);
    }
    key
}

/// Parsed key date, or a `MissingKey`/`InvalidKeyDate` rejection.
fn require_date(
    diagnostics: &mut StageDiagnostics,
    column: &str,
    value: Option<&str>,
) -> Option<NaiveDate> {
    let Some(text) = clean_text(value) else {
        diagnostics.reject(column, RejectReason::MissingKey);
        return None;
    };
    let date = parse_date(&text);
    if date.is_none() {
        diagnostics.reject(column, RejectReason::InvalidKeyDate);
    }
    date
}

/// Parse a non-key field; present but unreadable values count as degraded.
fn degrade<T>(
    diagnostics: &mut StageDiagnostics,
    field: &str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let text = clean_text(value)?;
    let parsed = parse(&text);
    if parsed.is_none() {
        diagnostics.degrade(field);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expressions::parse_number;
    use caremart_model::RelationName;

    #[test]
    fn blank_values_are_not_degraded() {
        let mut diagnostics = StageDiagnostics::new(RelationName::StgVisits, 1);
        assert_eq!(degrade(&mut diagnostics, "total_cost", Some("  "), parse_number), None);
        assert_eq!(degrade(&mut diagnostics, "total_cost", None, parse_number), None);
        assert_eq!(diagnostics.degraded_values(), 0);

        assert_eq!(degrade(&mut diagnostics, "total_cost", Some("n/a"), parse_number), None);
        assert_eq!(diagnostics.degraded_fields.get("total_cost"), Some(&1));
    }

    #[test]
    fn key_date_reasons_are_distinguished() {
        let mut diagnostics = StageDiagnostics::new(RelationName::StgVisits, 2);
        assert!(require_date(&mut diagnostics, "visit_date", None).is_none());
        assert!(require_date(&mut diagnostics, "visit_date", Some("soon")).is_none());
        assert_eq!(diagnostics.missing_keys.get("visit_date"), Some(&1));
        assert_eq!(diagnostics.invalid_key_dates.get("visit_date"), Some(&1));
    }
}
