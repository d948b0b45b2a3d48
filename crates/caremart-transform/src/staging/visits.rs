//! `stg_visits`: cleaned visits with care and length categories.

use caremart_model::{RawVisit, RelationName, StageDiagnostics, Visit};

use super::{Staged, degrade, require_date, require_key};
use crate::context::RunContext;
use crate::expressions::{
    care_category, clean_text, fiscal_quarter, parse_date, parse_flag, parse_integer,
    parse_number, upper_text, visit_length_category,
};

pub fn stg_visits(raw: &[RawVisit], ctx: &RunContext) -> Staged<Visit> {
    let mut diagnostics = StageDiagnostics::new(RelationName::StgVisits, raw.len());
    let mut rows = Vec::with_capacity(raw.len());

    for record in raw {
        let Some(visit_id) = require_key(&mut diagnostics, "visit_id", record.visit_id.as_deref())
        else {
            continue;
        };
        let Some(patient_id) =
            require_key(&mut diagnostics, "patient_id", record.patient_id.as_deref())
        else {
            continue;
        };
        let Some(visit_date) =
            require_date(&mut diagnostics, "visit_date", record.visit_date.as_deref())
        else {
            continue;
        };

        let duration_minutes = degrade(
            &mut diagnostics,
            "duration_minutes",
            record.duration_minutes.as_deref(),
            parse_integer,
        );
        let total_cost = degrade(
            &mut diagnostics,
            "total_cost",
            record.total_cost.as_deref(),
            parse_number,
        );
        let insurance_coverage = degrade(
            &mut diagnostics,
            "insurance_coverage",
            record.insurance_coverage.as_deref(),
            parse_number,
        );
        let patient_responsibility = degrade(
            &mut diagnostics,
            "patient_responsibility",
            record.patient_responsibility.as_deref(),
            parse_number,
        );
        let follow_up_required = degrade(
            &mut diagnostics,
            "follow_up_required",
            record.follow_up_required.as_deref(),
            parse_flag,
        );
        let follow_up_date = degrade(
            &mut diagnostics,
            "follow_up_date",
            record.follow_up_date.as_deref(),
            parse_date,
        );
        let visit_type = clean_text(record.visit_type.as_deref());

        rows.push(Visit {
            visit_id,
            patient_id,
            visit_date,
            visit_fiscal_quarter: fiscal_quarter(visit_date, ctx.fiscal_year_start_month),
            care_category: care_category(visit_type.as_deref()),
            visit_type,
            department: clean_text(record.department.as_deref()),
            doctor_id: clean_text(record.doctor_id.as_deref()),
            diagnosis_code: upper_text(record.diagnosis_code.as_deref()),
            chief_complaint: clean_text(record.chief_complaint.as_deref()),
            duration_minutes,
            total_cost,
            insurance_coverage,
            patient_responsibility,
            visit_status: clean_text(record.visit_status.as_deref()),
            follow_up_required,
            follow_up_date,
            visit_length_category: visit_length_category(duration_minutes),
            has_insurance_coverage: insurance_coverage.is_some_and(|amount| amount > 0.0),
            has_scheduled_followup: follow_up_required == Some(true) && follow_up_date.is_some(),
        });
    }

    Staged::finish(rows, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caremart_model::{CareCategory, VisitLengthCategory};
    use chrono::{NaiveDate, Utc};

    fn ctx() -> RunContext {
        RunContext::new(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(), Utc::now())
    }

    fn raw(id: &str, patient: &str, date: &str) -> RawVisit {
        RawVisit {
            visit_id: Some(id.to_string()),
            patient_id: Some(patient.to_string()),
            visit_date: Some(date.to_string()),
            ..RawVisit::default()
        }
    }

    #[test]
    fn derives_categories_and_flags() {
        let record = RawVisit {
            visit_type: Some("Emergency".to_string()),
            diagnosis_code: Some("j45.909".to_string()),
            duration_minutes: Some("75".to_string()),
            total_cost: Some("450.00".to_string()),
            insurance_coverage: Some("360.00".to_string()),
            follow_up_required: Some("TRUE".to_string()),
            follow_up_date: Some("2024-05-01".to_string()),
            ..raw("V1", "P1", "2024-04-15")
        };
        let staged = stg_visits(&[record], &ctx());
        let visit = &staged.rows[0];

        assert_eq!(visit.care_category, CareCategory::UrgentCare);
        assert_eq!(visit.diagnosis_code.as_deref(), Some("J45.909"));
        assert_eq!(visit.visit_length_category, Some(VisitLengthCategory::Extended));
        assert_eq!(visit.visit_fiscal_quarter, "FY2024 Q2");
        assert!(visit.has_insurance_coverage);
        assert!(visit.has_scheduled_followup);
    }

    #[test]
    fn malformed_fields_degrade_to_null() {
        let record = RawVisit {
            duration_minutes: Some("about an hour".to_string()),
            total_cost: Some("$$".to_string()),
            insurance_coverage: Some("0".to_string()),
            follow_up_required: Some("true".to_string()),
            follow_up_date: Some("next week".to_string()),
            ..raw("V1", "P1", "2024-04-15")
        };
        let staged = stg_visits(&[record], &ctx());
        let visit = &staged.rows[0];

        assert_eq!(visit.duration_minutes, None);
        assert_eq!(visit.visit_length_category, None);
        assert_eq!(visit.total_cost, None);
        assert!(!visit.has_insurance_coverage);
        assert!(!visit.has_scheduled_followup);
        assert_eq!(visit.care_category, CareCategory::Other);
        assert_eq!(staged.diagnostics.degraded_values(), 3);
    }

    #[test]
    fn drops_visit_without_patient() {
        let rows = [
            raw("V1", "P1", "2024-01-02"),
            RawVisit {
                patient_id: None,
                ..raw("V2", "", "2024-01-03")
            },
        ];
        let staged = stg_visits(&rows, &ctx());
        assert_eq!(staged.rows.len(), 1);
        assert_eq!(staged.rows[0].visit_id, "V1");
        assert_eq!(staged.diagnostics.missing_keys.get("patient_id"), Some(&1));
    }

    #[test]
    fn fiscal_quarter_follows_context() {
        let ctx = ctx().with_fiscal_year_start_month(7);
        let staged = stg_visits(&[raw("V1", "P1", "2024-08-01")], &ctx);
        assert_eq!(staged.rows[0].visit_fiscal_quarter, "FY2025 Q1");
    }
}
