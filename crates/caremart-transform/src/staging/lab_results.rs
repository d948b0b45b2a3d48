//! `stg_lab_results`: cleaned lab results with numeric values and flags.

use caremart_model::{LabResult, RawLabResult, RelationName, StageDiagnostics};

use super::{Staged, degrade, require_date, require_key};
use crate::context::RunContext;
use crate::expressions::{
    clean_text, days_between, interpret_result, is_abnormal, parse_number,
};

/// Test type whose result values are cast to numbers.
pub const NUMERIC_TEST_TYPE: &str = "Numeric";

pub fn stg_lab_results(raw: &[RawLabResult], ctx: &RunContext) -> Staged<LabResult> {
    let mut diagnostics = StageDiagnostics::new(RelationName::StgLabResults, raw.len());
    let mut rows = Vec::with_capacity(raw.len());

    for record in raw {
        let Some(lab_result_id) = require_key(
            &mut diagnostics,
            "lab_result_id",
            record.lab_result_id.as_deref(),
        ) else {
            continue;
        };
        let Some(patient_id) =
            require_key(&mut diagnostics, "patient_id", record.patient_id.as_deref())
        else {
            continue;
        };
        let Some(test_date) =
            require_date(&mut diagnostics, "test_date", record.test_date.as_deref())
        else {
            continue;
        };

        let test_type = clean_text(record.test_type.as_deref());
        let result_value = clean_text(record.result_value.as_deref());
        let numeric_result_value = if test_type.as_deref() == Some(NUMERIC_TEST_TYPE) {
            degrade(
                &mut diagnostics,
                "numeric_result_value",
                result_value.as_deref(),
                parse_number,
            )
        } else {
            None
        };
        let reference_range_min = degrade(
            &mut diagnostics,
            "reference_range_min",
            record.reference_range_min.as_deref(),
            parse_number,
        );
        let reference_range_max = degrade(
            &mut diagnostics,
            "reference_range_max",
            record.reference_range_max.as_deref(),
            parse_number,
        );
        let result_interpretation = clean_text(record.result_interpretation.as_deref());
        let result_category = interpret_result(result_interpretation.as_deref());

        rows.push(LabResult {
            lab_result_id,
            patient_id,
            visit_id: clean_text(record.visit_id.as_deref()),
            test_date,
            test_name: clean_text(record.test_name.as_deref()),
            test_type,
            test_category: clean_text(record.test_category.as_deref()),
            result_value,
            numeric_result_value,
            result_unit: clean_text(record.result_unit.as_deref()),
            reference_range_min,
            reference_range_max,
            result_interpretation,
            lab_technician: clean_text(record.lab_technician.as_deref()),
            is_abnormal: is_abnormal(
                numeric_result_value,
                reference_range_min,
                reference_range_max,
            ),
            result_category,
            result_status: result_category.status(),
            days_since_test: days_between(test_date, ctx.reference_date),
        });
    }

    Staged::finish(rows, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caremart_model::{ResultCategory, ResultStatus};
    use chrono::{NaiveDate, Utc};

    fn ctx() -> RunContext {
        RunContext::new(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(), Utc::now())
    }

    fn numeric(id: &str, value: &str, min: &str, max: &str) -> RawLabResult {
        RawLabResult {
            lab_result_id: Some(id.to_string()),
            patient_id: Some("P1".to_string()),
            visit_id: Some("V1".to_string()),
            test_date: Some("2024-06-01".to_string()),
            test_type: Some("Numeric".to_string()),
            result_value: Some(value.to_string()),
            reference_range_min: Some(min.to_string()),
            reference_range_max: Some(max.to_string()),
            ..RawLabResult::default()
        }
    }

    #[test]
    fn flags_values_outside_range() {
        let rows = [
            numeric("L1", "150", "70", "100"),
            numeric("L2", "100", "70", "100"),
            numeric("L3", "69.5", "70", "100"),
        ];
        let staged = stg_lab_results(&rows, &ctx());
        let flags: Vec<_> = staged.rows.iter().map(|r| r.is_abnormal).collect();
        assert_eq!(flags, vec![Some(true), Some(false), Some(true)]);
        assert_eq!(staged.rows[0].days_since_test, 29);
    }

    #[test]
    fn non_numeric_text_keeps_the_row() {
        let record = RawLabResult {
            result_interpretation: Some("Pending".to_string()),
            ..numeric("L1", "abc", "70", "100")
        };
        let staged = stg_lab_results(&[record], &ctx());
        let lab = &staged.rows[0];

        assert_eq!(lab.result_value.as_deref(), Some("abc"));
        assert_eq!(lab.numeric_result_value, None);
        assert_eq!(lab.is_abnormal, None);
        assert_eq!(lab.result_category, ResultCategory::Unknown);
        assert_eq!(lab.result_status, ResultStatus::Unknown);
        assert_eq!(
            staged.diagnostics.degraded_fields.get("numeric_result_value"),
            Some(&1)
        );
    }

    #[test]
    fn qualitative_tests_are_never_cast() {
        let record = RawLabResult {
            test_type: Some("Qualitative".to_string()),
            result_interpretation: Some("Negative".to_string()),
            ..numeric("L1", "5", "1", "10")
        };
        let staged = stg_lab_results(&[record], &ctx());
        let lab = &staged.rows[0];

        assert_eq!(lab.numeric_result_value, None);
        assert_eq!(lab.is_abnormal, None);
        assert_eq!(lab.result_status, ResultStatus::Normal);
        assert_eq!(staged.diagnostics.degraded_values(), 0);
    }

    #[test]
    fn missing_bound_leaves_flag_unknown() {
        let record = RawLabResult {
            reference_range_max: None,
            ..numeric("L1", "500", "70", "")
        };
        let staged = stg_lab_results(&[record], &ctx());
        assert_eq!(staged.rows[0].reference_range_max, None);
        assert_eq!(staged.rows[0].is_abnormal, None);
    }
}
