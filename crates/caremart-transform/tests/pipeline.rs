//! End-to-end tests of the staging and mart layers over in-memory seeds.

use chrono::{NaiveDate, TimeZone, Utc};
use polars::prelude::*;

use caremart_ingest::{SeedSet, SeedTable};
use caremart_model::{
    AgeGroup, EmergencyCategory, LabStatus, RelationName, ResultStatus, Source,
    UtilizationCategory,
};
use caremart_transform::{RunContext, run_pipeline};

fn table(source: Source, columns: &[(&str, Vec<Option<&str>>)]) -> SeedTable {
    let columns: Vec<Column> = columns
        .iter()
        .map(|(name, values)| Series::new((*name).into(), values.clone()).into())
        .collect();
    SeedTable::from_frame(source, DataFrame::new(columns).unwrap())
}

fn ctx() -> RunContext {
    RunContext::new(
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 30, 8, 0, 0).unwrap(),
    )
}

/// P1: 12 visits (3 emergency), P2: no visits, P3: one visit.
fn seeds() -> SeedSet {
    let patients = table(
        Source::Patients,
        &[
            ("patient_id", vec![Some("P1"), Some("P2"), Some("P3"), None]),
            (
                "first_name",
                vec![Some("alice"), Some("BOB"), Some("Cara"), Some("Ghost")],
            ),
            (
                "last_name",
                vec![Some("smith"), Some("jones"), None, Some("Row")],
            ),
            (
                "date_of_birth",
                vec![
                    Some("1950-03-10"),
                    Some("2012-11-30"),
                    Some("1990-06-30"),
                    Some("1970-01-01"),
                ],
            ),
            (
                "email",
                vec![Some("ALICE@EXAMPLE.COM"), Some("bob-at-example"), None, None],
            ),
            (
                "phone",
                vec![Some("(555) 111-2222"), Some("555-1234"), None, None],
            ),
        ],
    );

    let mut visit_ids = Vec::new();
    let mut visit_patients = Vec::new();
    let mut visit_dates = Vec::new();
    let mut visit_types = Vec::new();
    let mut departments = Vec::new();
    let mut statuses = Vec::new();
    for idx in 0..12 {
        visit_ids.push(format!("V{idx:02}"));
        visit_patients.push("P1");
        visit_dates.push(format!("2024-01-{:02}", idx + 1));
        visit_types.push(if idx < 3 { "Emergency" } else { "Routine Checkup" });
        departments.push("Cardiology");
        statuses.push(if idx == 11 { "Cancelled" } else { "Completed" });
    }
    visit_ids.push("V12".to_string());
    visit_patients.push("P3");
    visit_dates.push("2024-02-01".to_string());
    visit_types.push("Consultation");
    departments.push("Neurology");
    statuses.push("Completed");
    // A visit without a patient is dropped at staging.
    visit_ids.push("V13".to_string());
    visit_patients.push("");
    visit_dates.push("2024-02-02".to_string());
    visit_types.push("Emergency");
    departments.push("Neurology");
    statuses.push("Completed");

    let visits = table(
        Source::Visits,
        &[
            ("visit_id", visit_ids.iter().map(|v| Some(v.as_str())).collect()),
            ("patient_id", visit_patients.iter().map(|v| Some(*v)).collect()),
            ("visit_date", visit_dates.iter().map(|v| Some(v.as_str())).collect()),
            ("visit_type", visit_types.iter().map(|v| Some(*v)).collect()),
            ("department", departments.iter().map(|v| Some(*v)).collect()),
            ("visit_status", statuses.iter().map(|v| Some(*v)).collect()),
            ("duration_minutes", vec![Some("45"); visit_ids.len()]),
            ("total_cost", vec![Some("100.50"); visit_ids.len()]),
        ],
    );

    let lab_results = table(
        Source::LabResults,
        &[
            ("lab_result_id", vec![Some("L1"), Some("L2"), Some("L3"), Some("L4")]),
            ("patient_id", vec![Some("P1"), Some("P1"), Some("P3"), Some("P3")]),
            ("visit_id", vec![Some("V00"), Some("V01"), Some("V12"), None]),
            (
                "test_date",
                vec![
                    Some("2024-01-01"),
                    Some("2024-01-02"),
                    Some("2024-02-01"),
                    Some("2024-02-01"),
                ],
            ),
            (
                "test_type",
                vec![
                    Some("Numeric"),
                    Some("Numeric"),
                    Some("Numeric"),
                    Some("Qualitative"),
                ],
            ),
            (
                "result_value",
                vec![Some("180"), Some("abc"), Some("95"), Some("Positive")],
            ),
            (
                "reference_range_min",
                vec![Some("70"), Some("70"), Some("70"), None],
            ),
            (
                "reference_range_max",
                vec![Some("140"), Some("140"), Some("100"), None],
            ),
            (
                "result_interpretation",
                vec![Some("High"), None, Some("Normal"), Some("Abnormal?")],
            ),
        ],
    );

    SeedSet {
        patients,
        visits,
        lab_results,
    }
}

#[test]
fn age_group_agrees_with_age() {
    let output = run_pipeline(&seeds(), &ctx()).unwrap();
    for patient in &output.staged.patients.rows {
        let expected = match patient.age {
            a if a < 18 => AgeGroup::Pediatric,
            a if a < 65 => AgeGroup::Adult,
            _ => AgeGroup::Senior,
        };
        assert_eq!(patient.age_group, expected, "{}", patient.patient_id);
    }
    let p3 = &output.staged.patients.rows[2];
    assert_eq!(p3.age, 34);
}

#[test]
fn non_numeric_labs_have_no_numeric_value_or_flag() {
    let output = run_pipeline(&seeds(), &ctx()).unwrap();
    for lab in &output.staged.lab_results.rows {
        if lab.test_type.as_deref() != Some("Numeric") {
            assert_eq!(lab.numeric_result_value, None);
            assert_eq!(lab.is_abnormal, None);
        }
    }
}

#[test]
fn abnormal_matches_reference_range() {
    let output = run_pipeline(&seeds(), &ctx()).unwrap();
    for lab in &output.staged.lab_results.rows {
        if let (Some(v), Some(lo), Some(hi)) = (
            lab.numeric_result_value,
            lab.reference_range_min,
            lab.reference_range_max,
        ) {
            assert_eq!(lab.is_abnormal, Some(v < lo || v > hi));
        }
    }
    assert_eq!(output.staged.lab_results.rows[0].is_abnormal, Some(true));
    assert_eq!(output.staged.lab_results.rows[2].is_abnormal, Some(false));
}

#[test]
fn unreadable_numeric_result_is_retained_as_unknown() {
    let output = run_pipeline(&seeds(), &ctx()).unwrap();
    let lab = output
        .staged
        .lab_results
        .rows
        .iter()
        .find(|l| l.lab_result_id == "L2")
        .unwrap();
    assert_eq!(lab.result_value.as_deref(), Some("abc"));
    assert_eq!(lab.numeric_result_value, None);
    assert_eq!(lab.is_abnormal, None);
    assert_eq!(lab.result_status, ResultStatus::Unknown);
}

#[test]
fn visit_without_patient_is_dropped_and_counted() {
    let output = run_pipeline(&seeds(), &ctx()).unwrap();
    let visits = &output.staged.visits;
    assert_eq!(visits.rows.len(), 13);
    assert!(visits.rows.iter().all(|v| v.visit_id != "V13"));
    assert_eq!(visits.diagnostics.missing_keys.get("patient_id"), Some(&1));
    for diagnostics in output.diagnostics() {
        assert!(diagnostics.is_balanced(), "{}", diagnostics.relation);
    }
}

#[test]
fn summary_has_one_row_per_staged_patient() {
    let output = run_pipeline(&seeds(), &ctx()).unwrap();
    assert_eq!(output.staged.patients.rows.len(), 3);
    assert_eq!(
        output.marts.patient_summary.len(),
        output.staged.patients.rows.len()
    );
    let frame = output.frame(RelationName::PatientSummary).unwrap();
    assert_eq!(frame.record_count(), 3);
}

#[test]
fn twelve_visit_patient_is_high_utilizer() {
    let output = run_pipeline(&seeds(), &ctx()).unwrap();
    let p1 = &output.marts.patient_summary[0];
    assert_eq!(p1.patient_id, "P1");
    assert_eq!(p1.total_visits, 12);
    assert_eq!(p1.emergency_visits, 3);
    assert_eq!(p1.unique_visit_days, 12);
    assert_eq!(p1.total_visit_cost, 1206.0);
    assert_eq!(p1.utilization_category, UtilizationCategory::HighUtilizer);
    assert_eq!(p1.total_lab_tests, 2);
    assert_eq!(p1.lab_status, LabStatus::HasAbnormalResults);
}

#[test]
fn patient_without_visits_has_zero_aggregates() {
    let output = run_pipeline(&seeds(), &ctx()).unwrap();
    let p2 = &output.marts.patient_summary[1];
    assert_eq!(p2.patient_id, "P2");
    assert_eq!(p2.total_visits, 0);
    assert_eq!(p2.total_visit_cost, 0.0);
    assert_eq!(p2.first_visit_date, None);
    assert_eq!(p2.avg_visit_duration, None);
    assert_eq!(p2.utilization_category, UtilizationCategory::NoVisits);
    assert_eq!(p2.lab_status, LabStatus::NoLabTests);
}

#[test]
fn roster_department_without_visits_has_null_ratios() {
    let ctx = ctx().with_departments(["Dermatology"]);
    let output = run_pipeline(&seeds(), &ctx).unwrap();
    let names: Vec<&str> = output
        .marts
        .department_metrics
        .iter()
        .map(|d| d.department.as_str())
        .collect();
    assert_eq!(names, vec!["Cardiology", "Dermatology", "Neurology"]);

    let dermatology = &output.marts.department_metrics[1];
    assert_eq!(dermatology.total_visits, 0);
    assert_eq!(dermatology.avg_revenue_per_visit, None);
    assert_eq!(dermatology.completion_rate, None);
    assert_eq!(dermatology.emergency_visit_percentage, None);
    assert_eq!(dermatology.emergency_category, EmergencyCategory::LowEmergency);

    let cardiology = &output.marts.department_metrics[0];
    assert_eq!(cardiology.emergency_visit_percentage, Some(25.0));
    assert_eq!(cardiology.emergency_category, EmergencyCategory::HighEmergency);
    assert_eq!(cardiology.completion_rate, Some(91.67));
    assert_eq!(cardiology.total_lab_tests, 2);
    assert_eq!(cardiology.abnormal_lab_results, 1);

    let frame = output.frame(RelationName::DepartmentMetrics).unwrap();
    let categories = frame.data.column("emergency_category").unwrap().str().unwrap();
    assert_eq!(categories.get(1), Some("Low Emergency"));
    let rates = frame.data.column("completion_rate").unwrap().f64().unwrap();
    assert_eq!(rates.get(1), None);
}

#[test]
fn reruns_are_identical_apart_from_timestamps() {
    let seeds = seeds();
    let first = run_pipeline(&seeds, &ctx()).unwrap();
    let mut later = ctx();
    later.run_started_at = Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap();
    let second = run_pipeline(&seeds, &later).unwrap();

    assert_eq!(first.staged, second.staged);
    assert_eq!(first.marts, second.marts);
    for name in RelationName::ALL {
        let a = first.frame(name).unwrap();
        let b = second.frame(name).unwrap();
        assert!(
            a.without_metadata().equals_missing(&b.without_metadata()),
            "{name} differs between runs"
        );
    }
    let stamps = first
        .frame(RelationName::StgVisits)
        .unwrap()
        .data
        .column("created_at")
        .unwrap()
        .str()
        .unwrap()
        .get(0)
        .map(str::to_string);
    assert_eq!(stamps.as_deref(), Some("2024-06-30T08:00:00Z"));
}

#[test]
fn reference_date_drives_age_and_days_since_test() {
    let seeds = seeds();
    let output = run_pipeline(
        &seeds,
        &ctx().with_reference_date(NaiveDate::from_ymd_opt(2031, 1, 1).unwrap()),
    )
    .unwrap();
    let p2 = &output.staged.patients.rows[1];
    assert_eq!(p2.age, 18);
    assert_eq!(p2.age_group, AgeGroup::Adult);
    assert_eq!(output.staged.lab_results.rows[0].days_since_test, 2557);
}
