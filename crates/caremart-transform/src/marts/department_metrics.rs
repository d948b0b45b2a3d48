//! `department_metrics`: one row per department.
//!
//! Lab counts reach a department through the visit a lab result is linked
//! to; labs without a matching `visit_id` are not attributed to any
//! department.

use std::collections::BTreeMap;

use caremart_model::{DepartmentMetrics, LabResult, Visit};

use super::money;
use crate::expressions::{
    efficiency_category, emergency_category, is_cancelled_status, is_completed_status,
    is_emergency_visit, percentage, safe_divide,
};
use crate::relational::{count_distinct, count_where, group_by, mean, sum};

/// Department label for visits without one.
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

/// Lab counts for one visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitLabAggregate {
    pub total_lab_tests: i64,
    pub abnormal_lab_results: i64,
}

pub fn labs_by_visit(labs: &[LabResult]) -> BTreeMap<String, VisitLabAggregate> {
    let with_visit: Vec<&LabResult> = labs.iter().filter(|l| l.visit_id.is_some()).collect();
    group_by(&with_visit, |l| l.visit_id.clone().unwrap_or_default())
        .into_iter()
        .map(|(visit_id, rows)| {
            let aggregate = VisitLabAggregate {
                total_lab_tests: rows.len() as i64,
                abnormal_lab_results: rows
                    .iter()
                    .filter(|l| l.is_abnormal == Some(true))
                    .count() as i64,
            };
            (visit_id, aggregate)
        })
        .collect()
}

/// Metrics for one department from its visits.
///
/// An empty `visits` slice yields zero counts, null ratios and
/// `Low Emergency`.
pub fn department_row(
    department: &str,
    visits: &[&Visit],
    labs: &BTreeMap<String, VisitLabAggregate>,
) -> DepartmentMetrics {
    let total_visits = visits.len() as i64;
    let total_revenue = money(sum(visits.iter().map(|v| v.total_cost)));
    let completed_visits = count_where(visits, |v| is_completed_status(v.visit_status.as_deref()));
    let cancelled_visits = count_where(visits, |v| is_cancelled_status(v.visit_status.as_deref()));
    let emergency_visits = count_where(visits, |v| is_emergency_visit(v.visit_type.as_deref()));
    let avg_visit_duration =
        mean(visits.iter().map(|v| v.duration_minutes.map(|d| d as f64))).map(money);
    let emergency_visit_percentage = percentage(emergency_visits as f64, total_visits as f64);
    let lab_totals = visits
        .iter()
        .filter_map(|v| labs.get(&v.visit_id))
        .fold(VisitLabAggregate::default(), |acc, l| VisitLabAggregate {
            total_lab_tests: acc.total_lab_tests + l.total_lab_tests,
            abnormal_lab_results: acc.abnormal_lab_results + l.abnormal_lab_results,
        });

    DepartmentMetrics {
        department: department.to_string(),
        total_visits,
        unique_patients: count_distinct(visits.iter().map(|v| Some(v.patient_id.as_str()))),
        unique_doctors: count_distinct(visits.iter().map(|v| v.doctor_id.as_deref())),
        total_revenue,
        avg_revenue_per_visit: safe_divide(total_revenue, total_visits as f64).map(money),
        avg_visit_duration,
        completed_visits,
        cancelled_visits,
        emergency_visits,
        completion_rate: percentage(completed_visits as f64, total_visits as f64),
        emergency_visit_percentage,
        total_lab_tests: lab_totals.total_lab_tests,
        abnormal_lab_results: lab_totals.abnormal_lab_results,
        efficiency_category: efficiency_category(avg_visit_duration),
        emergency_category: emergency_category(emergency_visit_percentage),
    }
}

/// Build `department_metrics`, sorted by department.
///
/// Every name in `roster` is reported, with zero visits if none were seen.
pub fn department_metrics(
    visits: &[Visit],
    labs: &[LabResult],
    roster: &[String],
) -> Vec<DepartmentMetrics> {
    let lab_aggregates = labs_by_visit(labs);
    let mut groups = group_by(visits, |v| {
        v.department
            .clone()
            .unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string())
    });
    for department in roster {
        let name = department.trim();
        if !name.is_empty() {
            groups.entry(name.to_string()).or_default();
        }
    }

    groups
        .iter()
        .map(|(department, rows)| department_row(department, rows, &lab_aggregates))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use caremart_model::{
        CareCategory, EfficiencyCategory, EmergencyCategory, ResultCategory, ResultStatus,
    };
    use chrono::NaiveDate;

    fn visit(id: &str, department: Option<&str>, visit_type: &str, status: &str) -> Visit {
        Visit {
            visit_id: id.to_string(),
            patient_id: format!("P-{id}"),
            visit_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            visit_fiscal_quarter: "FY2024 Q1".to_string(),
            visit_type: Some(visit_type.to_string()),
            department: department.map(str::to_string),
            doctor_id: Some("D1".to_string()),
            diagnosis_code: None,
            chief_complaint: None,
            duration_minutes: Some(20),
            total_cost: Some(150.0),
            insurance_coverage: None,
            patient_responsibility: None,
            visit_status: Some(status.to_string()),
            follow_up_required: None,
            follow_up_date: None,
            care_category: CareCategory::Other,
            visit_length_category: None,
            has_insurance_coverage: false,
            has_scheduled_followup: false,
        }
    }

    fn lab(visit_id: Option<&str>, abnormal: Option<bool>) -> LabResult {
        LabResult {
            lab_result_id: "L".to_string(),
            patient_id: "P".to_string(),
            visit_id: visit_id.map(str::to_string),
            test_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            test_name: None,
            test_type: None,
            test_category: None,
            result_value: None,
            numeric_result_value: None,
            result_unit: None,
            reference_range_min: None,
            reference_range_max: None,
            result_interpretation: None,
            lab_technician: None,
            is_abnormal: abnormal,
            result_category: ResultCategory::Unknown,
            result_status: ResultStatus::Unknown,
            days_since_test: 0,
        }
    }

    #[test]
    fn rolls_labs_up_through_visits() {
        let visits = [
            visit("V1", Some("Cardiology"), "Emergency", "Completed"),
            visit("V2", Some("Cardiology"), "Consultation", "Cancelled"),
            visit("V3", None, "Consultation", "Completed"),
        ];
        let labs = [
            lab(Some("V1"), Some(true)),
            lab(Some("V1"), Some(false)),
            lab(Some("V3"), None),
            lab(None, Some(true)),
        ];
        let metrics = department_metrics(&visits, &labs, &[]);
        assert_eq!(metrics.len(), 2);

        let cardiology = &metrics[0];
        assert_eq!(cardiology.department, "Cardiology");
        assert_eq!(cardiology.total_visits, 2);
        assert_eq!(cardiology.total_revenue, 300.0);
        assert_eq!(cardiology.avg_revenue_per_visit, Some(150.0));
        assert_eq!(cardiology.completion_rate, Some(50.0));
        assert_eq!(cardiology.emergency_visit_percentage, Some(50.0));
        assert_eq!(cardiology.emergency_category, EmergencyCategory::HighEmergency);
        assert_eq!(cardiology.efficiency_category, Some(EfficiencyCategory::Efficient));
        assert_eq!(cardiology.total_lab_tests, 2);
        assert_eq!(cardiology.abnormal_lab_results, 1);
        assert_eq!(cardiology.unique_doctors, 1);

        let unknown = &metrics[1];
        assert_eq!(unknown.department, UNKNOWN_DEPARTMENT);
        assert_eq!(unknown.total_lab_tests, 1);
        assert_eq!(unknown.abnormal_lab_results, 0);
    }

    #[test]
    fn roster_department_without_visits() {
        let metrics = department_metrics(&[], &[], &["Oncology".to_string()]);
        let row = &metrics[0];
        assert_eq!(row.department, "Oncology");
        assert_eq!(row.total_visits, 0);
        assert_eq!(row.total_revenue, 0.0);
        assert_eq!(row.avg_revenue_per_visit, None);
        assert_eq!(row.completion_rate, None);
        assert_eq!(row.emergency_visit_percentage, None);
        assert_eq!(row.avg_visit_duration, None);
        assert_eq!(row.efficiency_category, None);
        assert_eq!(row.emergency_category, EmergencyCategory::LowEmergency);
    }
}
