//! `patient_summary`: one row per staged patient.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use caremart_model::{LabResult, Patient, PatientSummary, Visit};

use super::money;
use crate::expressions::{is_emergency_visit, lab_status, utilization_category};
use crate::relational::{count_distinct, count_where, group_by, mean, sum};

/// Visit aggregates for one patient.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientVisitAggregate {
    pub total_visits: i64,
    pub unique_visit_days: i64,
    pub first_visit_date: Option<NaiveDate>,
    pub last_visit_date: Option<NaiveDate>,
    pub avg_visit_duration: Option<f64>,
    pub total_visit_cost: f64,
    pub total_insurance_coverage: f64,
    pub total_patient_responsibility: f64,
    pub emergency_visits: i64,
}

/// Lab aggregates for one patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatientLabAggregate {
    pub total_lab_tests: i64,
    pub abnormal_results: i64,
}

pub fn visit_aggregates_by_patient(visits: &[Visit]) -> BTreeMap<String, PatientVisitAggregate> {
    group_by(visits, |v| v.patient_id.clone())
        .into_iter()
        .map(|(patient_id, rows)| {
            let aggregate = PatientVisitAggregate {
                total_visits: rows.len() as i64,
                unique_visit_days: count_distinct(rows.iter().map(|v| Some(v.visit_date))),
                first_visit_date: rows.iter().map(|v| v.visit_date).min(),
                last_visit_date: rows.iter().map(|v| v.visit_date).max(),
                avg_visit_duration: mean(
                    rows.iter().map(|v| v.duration_minutes.map(|d| d as f64)),
                )
                .map(money),
                total_visit_cost: money(sum(rows.iter().map(|v| v.total_cost))),
                total_insurance_coverage: money(sum(rows.iter().map(|v| v.insurance_coverage))),
                total_patient_responsibility: money(sum(
                    rows.iter().map(|v| v.patient_responsibility),
                )),
                emergency_visits: count_where(&rows, |v| {
                    is_emergency_visit(v.visit_type.as_deref())
                }),
            };
            (patient_id, aggregate)
        })
        .collect()
}

pub fn lab_aggregates_by_patient(labs: &[LabResult]) -> BTreeMap<String, PatientLabAggregate> {
    group_by(labs, |l| l.patient_id.clone())
        .into_iter()
        .map(|(patient_id, rows)| {
            let aggregate = PatientLabAggregate {
                total_lab_tests: rows.len() as i64,
                abnormal_results: count_where(&rows, |l| l.is_abnormal == Some(true)),
            };
            (patient_id, aggregate)
        })
        .collect()
}

/// Build `patient_summary`, keeping the first row of a duplicated patient id.
pub fn patient_summary(
    patients: &[Patient],
    visits: &[Visit],
    labs: &[LabResult],
) -> Vec<PatientSummary> {
    let visit_aggregates = visit_aggregates_by_patient(visits);
    let lab_aggregates = lab_aggregates_by_patient(labs);
    let mut seen = BTreeSet::new();

    patients
        .iter()
        .filter(|patient| seen.insert(patient.patient_id.as_str()))
        .map(|patient| {
            let visits = visit_aggregates.get(&patient.patient_id);
            let labs = lab_aggregates
                .get(&patient.patient_id)
                .copied()
                .unwrap_or(PatientLabAggregate {
                    total_lab_tests: 0,
                    abnormal_results: 0,
                });
            let total_visits = visits.map_or(0, |a| a.total_visits);

            PatientSummary {
                patient_id: patient.patient_id.clone(),
                full_name: patient.full_name.clone(),
                age: patient.age,
                age_group: patient.age_group,
                gender: patient.gender.clone(),
                insurance_provider: patient.insurance_provider.clone(),
                total_visits,
                unique_visit_days: visits.map_or(0, |a| a.unique_visit_days),
                first_visit_date: visits.and_then(|a| a.first_visit_date),
                last_visit_date: visits.and_then(|a| a.last_visit_date),
                avg_visit_duration: visits.and_then(|a| a.avg_visit_duration),
                total_visit_cost: visits.map_or(0.0, |a| a.total_visit_cost),
                total_insurance_coverage: visits.map_or(0.0, |a| a.total_insurance_coverage),
                total_patient_responsibility: visits
                    .map_or(0.0, |a| a.total_patient_responsibility),
                emergency_visits: visits.map_or(0, |a| a.emergency_visits),
                total_lab_tests: labs.total_lab_tests,
                abnormal_results: labs.abnormal_results,
                utilization_category: utilization_category(total_visits),
                lab_status: lab_status(labs.total_lab_tests, labs.abnormal_results),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use caremart_model::{AgeGroup, CareCategory, LabStatus, ResultCategory, ResultStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn patient(id: &str) -> Patient {
        Patient {
            patient_id: id.to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            full_name: Some("Ada Lovelace".to_string()),
            date_of_birth: date(1980, 1, 1),
            age: 44,
            age_group: AgeGroup::Adult,
            gender: Some("F".to_string()),
            email: None,
            phone: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            insurance_provider: Some("Aetna".to_string()),
            insurance_id: None,
            blood_type: None,
            emergency_contact: None,
            has_valid_email: false,
            has_valid_phone: false,
        }
    }

    fn visit(id: &str, patient_id: &str, day: NaiveDate, visit_type: &str) -> Visit {
        Visit {
            visit_id: id.to_string(),
            patient_id: patient_id.to_string(),
            visit_date: day,
            visit_fiscal_quarter: "FY2024 Q1".to_string(),
            visit_type: Some(visit_type.to_string()),
            department: Some("Cardiology".to_string()),
            doctor_id: Some("D1".to_string()),
            diagnosis_code: None,
            chief_complaint: None,
            duration_minutes: Some(30),
            total_cost: Some(100.0),
            insurance_coverage: Some(80.0),
            patient_responsibility: Some(20.0),
            visit_status: Some("Completed".to_string()),
            follow_up_required: None,
            follow_up_date: None,
            care_category: CareCategory::Other,
            visit_length_category: None,
            has_insurance_coverage: true,
            has_scheduled_followup: false,
        }
    }

    fn lab(id: &str, patient_id: &str, abnormal: Option<bool>) -> LabResult {
        LabResult {
            lab_result_id: id.to_string(),
            patient_id: patient_id.to_string(),
            visit_id: None,
            test_date: date(2024, 1, 1),
            test_name: None,
            test_type: Some("Numeric".to_string()),
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
    fn aggregates_visits_and_labs_independently() {
        let patients = [patient("P1")];
        let visits = [
            visit("V1", "P1", date(2024, 1, 5), "Emergency"),
            visit("V2", "P1", date(2024, 1, 5), "Consultation"),
            visit("V3", "P1", date(2024, 2, 9), "Consultation"),
        ];
        let labs = [lab("L1", "P1", Some(false)), lab("L2", "P1", None)];

        let summary = patient_summary(&patients, &visits, &labs);
        let row = &summary[0];
        assert_eq!(row.total_visits, 3);
        assert_eq!(row.unique_visit_days, 2);
        assert_eq!(row.first_visit_date, Some(date(2024, 1, 5)));
        assert_eq!(row.last_visit_date, Some(date(2024, 2, 9)));
        assert_eq!(row.avg_visit_duration, Some(30.0));
        assert_eq!(row.total_visit_cost, 300.0);
        assert_eq!(row.total_insurance_coverage, 240.0);
        assert_eq!(row.emergency_visits, 1);
        assert_eq!(row.total_lab_tests, 2);
        assert_eq!(row.abnormal_results, 0);
        assert_eq!(row.lab_status, LabStatus::AllNormalResults);
    }

    #[test]
    fn duplicate_patient_ids_yield_one_row() {
        let patients = [patient("P1"), patient("P1"), patient("P2")];
        let summary = patient_summary(&patients, &[], &[]);
        assert_eq!(summary.len(), 2);
    }
}
