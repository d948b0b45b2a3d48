//! DataFrame construction from typed records.
//!
//! Dates are written as ISO 8601 text (`YYYY-MM-DD`), categories as their
//! vocabulary strings, and staging relations get the `created_at` and
//! `updated_at` columns stamped with the run start time (RFC 3339).

use chrono::{NaiveDate, SecondsFormat};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use caremart_model::{
    CREATED_AT, DepartmentMetrics, LabResult, Patient, PatientSummary, RelationName, UPDATED_AT,
    Visit,
};

use crate::context::RunContext;
use crate::error::{Result, TransformError};
use crate::frame::RelationFrame;

/// Column-by-column frame assembly for one relation.
pub struct FrameBuilder {
    relation: RelationName,
    height: usize,
    columns: Vec<Column>,
}

impl FrameBuilder {
    pub fn new(relation: RelationName, height: usize) -> Self {
        Self {
            relation,
            height,
            columns: Vec::with_capacity(relation.columns().len()),
        }
    }

    pub fn text<I>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let values: Vec<Option<String>> = values.into_iter().collect();
        self.columns.push(Series::new(name.into(), values).into());
        self
    }

    pub fn int<I>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<i64>>,
    {
        let values: Vec<Option<i64>> = values.into_iter().collect();
        self.columns.push(Series::new(name.into(), values).into());
        self
    }

    pub fn float<I>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let values: Vec<Option<f64>> = values.into_iter().collect();
        self.columns.push(Series::new(name.into(), values).into());
        self
    }

    pub fn flag<I>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<bool>>,
    {
        let values: Vec<Option<bool>> = values.into_iter().collect();
        self.columns.push(Series::new(name.into(), values).into());
        self
    }

    pub fn date<I>(self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<NaiveDate>>,
    {
        self.text(
            name,
            values
                .into_iter()
                .map(|d| d.map(|d| d.format("%Y-%m-%d").to_string())),
        )
    }

    /// Append `created_at` and `updated_at`.
    pub fn metadata(self, ctx: &RunContext) -> Self {
        let stamp = ctx
            .run_started_at
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let height = self.height;
        self.text(CREATED_AT, vec![Some(stamp.clone()); height])
            .text(UPDATED_AT, vec![Some(stamp); height])
    }

    /// Assemble the frame and check it against the relation's column contract.
    pub fn finish(self) -> Result<RelationFrame> {
        let data = DataFrame::new(self.columns)?;
        let actual: Vec<&str> = data
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        if actual != self.relation.columns() {
            return Err(TransformError::Frame {
                relation: self.relation,
                message: format!(
                    "column order {actual:?} does not match {:?}",
                    self.relation.columns()
                ),
            });
        }
        Ok(RelationFrame::new(self.relation, data))
    }
}

fn texts<'a, T: 'a>(
    rows: &'a [T],
    get: impl Fn(&T) -> Option<&str> + 'a,
) -> impl Iterator<Item = Option<String>> + 'a {
    rows.iter().map(move |row| get(row).map(str::to_string))
}

fn labels<'a, T: 'a>(
    rows: &'a [T],
    get: impl Fn(&T) -> &'static str + 'a,
) -> impl Iterator<Item = Option<String>> + 'a {
    rows.iter().map(move |row| Some(get(row).to_string()))
}

pub fn patients_frame(rows: &[Patient], ctx: &RunContext) -> Result<RelationFrame> {
    FrameBuilder::new(RelationName::StgPatients, rows.len())
        .text("patient_id", texts(rows, |r| Some(r.patient_id.as_str())))
        .text("first_name", texts(rows, |r| r.first_name.as_deref()))
        .text("last_name", texts(rows, |r| r.last_name.as_deref()))
        .text("full_name", texts(rows, |r| r.full_name.as_deref()))
        .date("date_of_birth", rows.iter().map(|r| Some(r.date_of_birth)))
        .int("age", rows.iter().map(|r| Some(r.age)))
        .text("age_group", labels(rows, |r| r.age_group.as_str()))
        .text("gender", texts(rows, |r| r.gender.as_deref()))
        .text("email", texts(rows, |r| r.email.as_deref()))
        .text("phone", texts(rows, |r| r.phone.as_deref()))
        .text("address", texts(rows, |r| r.address.as_deref()))
        .text("city", texts(rows, |r| r.city.as_deref()))
        .text("state", texts(rows, |r| r.state.as_deref()))
        .text("zip_code", texts(rows, |r| r.zip_code.as_deref()))
        .text(
            "insurance_provider",
            texts(rows, |r| r.insurance_provider.as_deref()),
        )
        .text("insurance_id", texts(rows, |r| r.insurance_id.as_deref()))
        .text("blood_type", texts(rows, |r| r.blood_type.as_deref()))
        .text(
            "emergency_contact",
            texts(rows, |r| r.emergency_contact.as_deref()),
        )
        .flag("has_valid_email", rows.iter().map(|r| Some(r.has_valid_email)))
        .flag("has_valid_phone", rows.iter().map(|r| Some(r.has_valid_phone)))
        .metadata(ctx)
        .finish()
}

pub fn visits_frame(rows: &[Visit], ctx: &RunContext) -> Result<RelationFrame> {
    FrameBuilder::new(RelationName::StgVisits, rows.len())
        .text("visit_id", texts(rows, |r| Some(r.visit_id.as_str())))
        .text("patient_id", texts(rows, |r| Some(r.patient_id.as_str())))
        .date("visit_date", rows.iter().map(|r| Some(r.visit_date)))
        .text(
            "visit_fiscal_quarter",
            texts(rows, |r| Some(r.visit_fiscal_quarter.as_str())),
        )
        .text("visit_type", texts(rows, |r| r.visit_type.as_deref()))
        .text("department", texts(rows, |r| r.department.as_deref()))
        .text("doctor_id", texts(rows, |r| r.doctor_id.as_deref()))
        .text("diagnosis_code", texts(rows, |r| r.diagnosis_code.as_deref()))
        .text(
            "chief_complaint",
            texts(rows, |r| r.chief_complaint.as_deref()),
        )
        .int("duration_minutes", rows.iter().map(|r| r.duration_minutes))
        .float("total_cost", rows.iter().map(|r| r.total_cost))
        .float(
            "insurance_coverage",
            rows.iter().map(|r| r.insurance_coverage),
        )
        .float(
            "patient_responsibility",
            rows.iter().map(|r| r.patient_responsibility),
        )
        .text("visit_status", texts(rows, |r| r.visit_status.as_deref()))
        .flag(
            "follow_up_required",
            rows.iter().map(|r| r.follow_up_required),
        )
        .date("follow_up_date", rows.iter().map(|r| r.follow_up_date))
        .text("care_category", labels(rows, |r| r.care_category.as_str()))
        .text(
            "visit_length_category",
            rows.iter()
                .map(|r| r.visit_length_category.map(|c| c.as_str().to_string())),
        )
        .flag(
            "has_insurance_coverage",
            rows.iter().map(|r| Some(r.has_insurance_coverage)),
        )
        .flag(
            "has_scheduled_followup",
            rows.iter().map(|r| Some(r.has_scheduled_followup)),
        )
        .metadata(ctx)
        .finish()
}

pub fn lab_results_frame(rows: &[LabResult], ctx: &RunContext) -> Result<RelationFrame> {
    FrameBuilder::new(RelationName::StgLabResults, rows.len())
        .text("lab_result_id", texts(rows, |r| Some(r.lab_result_id.as_str())))
        .text("patient_id", texts(rows, |r| Some(r.patient_id.as_str())))
        .text("visit_id", texts(rows, |r| r.visit_id.as_deref()))
        .date("test_date", rows.iter().map(|r| Some(r.test_date)))
        .text("test_name", texts(rows, |r| r.test_name.as_deref()))
        .text("test_type", texts(rows, |r| r.test_type.as_deref()))
        .text("test_category", texts(rows, |r| r.test_category.as_deref()))
        .text("result_value", texts(rows, |r| r.result_value.as_deref()))
        .float(
            "numeric_result_value",
            rows.iter().map(|r| r.numeric_result_value),
        )
        .text("result_unit", texts(rows, |r| r.result_unit.as_deref()))
        .float(
            "reference_range_min",
            rows.iter().map(|r| r.reference_range_min),
        )
        .float(
            "reference_range_max",
            rows.iter().map(|r| r.reference_range_max),
        )
        .text(
            "result_interpretation",
            texts(rows, |r| r.result_interpretation.as_deref()),
        )
        .text("lab_technician", texts(rows, |r| r.lab_technician.as_deref()))
        .flag("is_abnormal", rows.iter().map(|r| r.is_abnormal))
        .text(
            "result_category",
            labels(rows, |r| r.result_category.as_str()),
        )
        .text("result_status", labels(rows, |r| r.result_status.as_str()))
        .int("days_since_test", rows.iter().map(|r| Some(r.days_since_test)))
        .metadata(ctx)
        .finish()
}

pub fn patient_summary_frame(rows: &[PatientSummary]) -> Result<RelationFrame> {
    FrameBuilder::new(RelationName::PatientSummary, rows.len())
        .text("patient_id", texts(rows, |r| Some(r.patient_id.as_str())))
        .text("full_name", texts(rows, |r| r.full_name.as_deref()))
        .int("age", rows.iter().map(|r| Some(r.age)))
        .text("age_group", labels(rows, |r| r.age_group.as_str()))
        .text("gender", texts(rows, |r| r.gender.as_deref()))
        .text(
            "insurance_provider",
            texts(rows, |r| r.insurance_provider.as_deref()),
        )
        .int("total_visits", rows.iter().map(|r| Some(r.total_visits)))
        .int(
            "unique_visit_days",
            rows.iter().map(|r| Some(r.unique_visit_days)),
        )
        .date("first_visit_date", rows.iter().map(|r| r.first_visit_date))
        .date("last_visit_date", rows.iter().map(|r| r.last_visit_date))
        .float(
            "avg_visit_duration",
            rows.iter().map(|r| r.avg_visit_duration),
        )
        .float(
            "total_visit_cost",
            rows.iter().map(|r| Some(r.total_visit_cost)),
        )
        .float(
            "total_insurance_coverage",
            rows.iter().map(|r| Some(r.total_insurance_coverage)),
        )
        .float(
            "total_patient_responsibility",
            rows.iter().map(|r| Some(r.total_patient_responsibility)),
        )
        .int(
            "emergency_visits",
            rows.iter().map(|r| Some(r.emergency_visits)),
        )
        .int("total_lab_tests", rows.iter().map(|r| Some(r.total_lab_tests)))
        .int(
            "abnormal_results",
            rows.iter().map(|r| Some(r.abnormal_results)),
        )
        .text(
            "utilization_category",
            labels(rows, |r| r.utilization_category.as_str()),
        )
        .text("lab_status", labels(rows, |r| r.lab_status.as_str()))
        .finish()
}

pub fn department_metrics_frame(rows: &[DepartmentMetrics]) -> Result<RelationFrame> {
    FrameBuilder::new(RelationName::DepartmentMetrics, rows.len())
        .text("department", texts(rows, |r| Some(r.department.as_str())))
        .int("total_visits", rows.iter().map(|r| Some(r.total_visits)))
        .int("unique_patients", rows.iter().map(|r| Some(r.unique_patients)))
        .int("unique_doctors", rows.iter().map(|r| Some(r.unique_doctors)))
        .float("total_revenue", rows.iter().map(|r| Some(r.total_revenue)))
        .float(
            "avg_revenue_per_visit",
            rows.iter().map(|r| r.avg_revenue_per_visit),
        )
        .float(
            "avg_visit_duration",
            rows.iter().map(|r| r.avg_visit_duration),
        )
        .int(
            "completed_visits",
            rows.iter().map(|r| Some(r.completed_visits)),
        )
        .int(
            "cancelled_visits",
            rows.iter().map(|r| Some(r.cancelled_visits)),
        )
        .int(
            "emergency_visits",
            rows.iter().map(|r| Some(r.emergency_visits)),
        )
        .float("completion_rate", rows.iter().map(|r| r.completion_rate))
        .float(
            "emergency_visit_percentage",
            rows.iter().map(|r| r.emergency_visit_percentage),
        )
        .int("total_lab_tests", rows.iter().map(|r| Some(r.total_lab_tests)))
        .int(
            "abnormal_lab_results",
            rows.iter().map(|r| Some(r.abnormal_lab_results)),
        )
        .text(
            "efficiency_category",
            rows.iter()
                .map(|r| r.efficiency_category.map(|c| c.as_str().to_string())),
        )
        .text(
            "emergency_category",
            labels(rows, |r| r.emergency_category.as_str()),
        )
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn builder_rejects_wrong_column_order() {
        let err = FrameBuilder::new(RelationName::DepartmentMetrics, 0)
            .int("total_visits", Vec::new())
            .text("department", Vec::new())
            .finish()
            .unwrap_err();
        assert!(matches!(err, TransformError::Frame { .. }));
    }

    #[test]
    fn empty_marts_keep_their_columns() {
        let frame = department_metrics_frame(&[]).unwrap();
        assert_eq!(frame.record_count(), 0);
        assert_eq!(frame.column_names(), RelationName::DepartmentMetrics.columns());
    }

    #[test]
    fn staging_frames_carry_run_timestamp() {
        let started = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        let ctx = RunContext::new(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(), started);
        let frame = patients_frame(&[], &ctx).unwrap();
        assert_eq!(frame.column_names(), RelationName::StgPatients.columns());
        assert_eq!(
            frame.without_metadata().width(),
            RelationName::StgPatients.columns().len() - 2
        );
    }
}
