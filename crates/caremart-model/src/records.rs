//! Row types for source, staging and mart relations.
//!
//! Raw records mirror the seed files: every field is optional text exactly as
//! loaded. Staged and mart records carry typed, derived values. The two
//! metadata timestamps (`created_at`, `updated_at`) are not part of these
//! records; they are attached when a relation is materialized so that the
//! records themselves stay deterministic for a given reference date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::{
    AgeGroup, CareCategory, EfficiencyCategory, EmergencyCategory, LabStatus, ResultCategory,
    ResultStatus, UtilizationCategory, VisitLengthCategory,
};

/// A row of `patients.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPatient {
    pub patient_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_id: Option<String>,
    pub blood_type: Option<String>,
    pub emergency_contact: Option<String>,
}

/// A row of `visits.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVisit {
    pub visit_id: Option<String>,
    pub patient_id: Option<String>,
    pub visit_date: Option<String>,
    pub visit_type: Option<String>,
    pub department: Option<String>,
    pub doctor_id: Option<String>,
    pub diagnosis_code: Option<String>,
    pub chief_complaint: Option<String>,
    pub duration_minutes: Option<String>,
    pub total_cost: Option<String>,
    pub insurance_coverage: Option<String>,
    pub patient_responsibility: Option<String>,
    pub visit_status: Option<String>,
    pub follow_up_required: Option<String>,
    pub follow_up_date: Option<String>,
}

/// A row of `lab_results.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLabResult {
    pub lab_result_id: Option<String>,
    pub patient_id: Option<String>,
    pub visit_id: Option<String>,
    pub test_date: Option<String>,
    pub test_name: Option<String>,
    pub test_type: Option<String>,
    pub test_category: Option<String>,
    pub result_value: Option<String>,
    pub result_unit: Option<String>,
    pub reference_range_min: Option<String>,
    pub reference_range_max: Option<String>,
    pub result_interpretation: Option<String>,
    pub lab_technician: Option<String>,
}

/// A row of `stg_patients`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: NaiveDate,
    pub age: i64,
    pub age_group: AgeGroup,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_id: Option<String>,
    pub blood_type: Option<String>,
    pub emergency_contact: Option<String>,
    pub has_valid_email: bool,
    pub has_valid_phone: bool,
}

/// A row of `stg_visits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub visit_id: String,
    pub patient_id: String,
    pub visit_date: NaiveDate,
    pub visit_fiscal_quarter: String,
    pub visit_type: Option<String>,
    pub department: Option<String>,
    pub doctor_id: Option<String>,
    pub diagnosis_code: Option<String>,
    pub chief_complaint: Option<String>,
    pub duration_minutes: Option<i64>,
    pub total_cost: Option<f64>,
    pub insurance_coverage: Option<f64>,
    pub patient_responsibility: Option<f64>,
    pub visit_status: Option<String>,
    pub follow_up_required: Option<bool>,
    pub follow_up_date: Option<NaiveDate>,
    pub care_category: CareCategory,
    pub visit_length_category: Option<VisitLengthCategory>,
    pub has_insurance_coverage: bool,
    pub has_scheduled_followup: bool,
}

/// A row of `stg_lab_results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub lab_result_id: String,
    pub patient_id: String,
    pub visit_id: Option<String>,
    pub test_date: NaiveDate,
    pub test_name: Option<String>,
    pub test_type: Option<String>,
    pub test_category: Option<String>,
    pub result_value: Option<String>,
    pub numeric_result_value: Option<f64>,
    pub result_unit: Option<String>,
    pub reference_range_min: Option<f64>,
    pub reference_range_max: Option<f64>,
    pub result_interpretation: Option<String>,
    pub lab_technician: Option<String>,
    /// Tri-state: `None` when the value or a bound is unavailable.
    pub is_abnormal: Option<bool>,
    pub result_category: ResultCategory,
    pub result_status: ResultStatus,
    pub days_since_test: i64,
}

/// A row of `patient_summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub patient_id: String,
    pub full_name: Option<String>,
    pub age: i64,
    pub age_group: AgeGroup,
    pub gender: Option<String>,
    pub insurance_provider: Option<String>,
    pub total_visits: i64,
    pub unique_visit_days: i64,
    pub first_visit_date: Option<NaiveDate>,
    pub last_visit_date: Option<NaiveDate>,
    pub avg_visit_duration: Option<f64>,
    pub total_visit_cost: f64,
    pub total_insurance_coverage: f64,
    pub total_patient_responsibility: f64,
    pub emergency_visits: i64,
    pub total_lab_tests: i64,
    pub abnormal_results: i64,
    pub utilization_category: UtilizationCategory,
    pub lab_status: LabStatus,
}

/// A row of `department_metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentMetrics {
    pub department: String,
    pub total_visits: i64,
    pub unique_patients: i64,
    pub unique_doctors: i64,
    pub total_revenue: f64,
    pub avg_revenue_per_visit: Option<f64>,
    pub avg_visit_duration: Option<f64>,
    pub completed_visits: i64,
    pub cancelled_visits: i64,
    pub emergency_visits: i64,
    pub completion_rate: Option<f64>,
    pub emergency_visit_percentage: Option<f64>,
    pub total_lab_tests: i64,
    pub abnormal_lab_results: i64,
    pub efficiency_category: Option<EfficiencyCategory>,
    pub emergency_category: EmergencyCategory,
}
