//! Relation catalog: names, layers, lineage and column contracts.
//!
//! The five output relation names and their column lists are read by
//! downstream consumers, so they are fixed here in one place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw seed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Patients,
    Visits,
    LabResults,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Patients, Source::Visits, Source::LabResults];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Patients => "patients",
            Source::Visits => "visits",
            Source::LabResults => "lab_results",
        }
    }

    /// Seed file name inside the seed directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Source::Patients => "patients.csv",
            Source::Visits => "visits.csv",
            Source::LabResults => "lab_results.csv",
        }
    }

    /// Columns that must exist in the seed file. A null value in any of them
    /// rejects the row at staging.
    pub fn key_columns(&self) -> &'static [&'static str] {
        match self {
            Source::Patients => &["patient_id", "date_of_birth"],
            Source::Visits => &["visit_id", "patient_id", "visit_date"],
            Source::LabResults => &["lab_result_id", "patient_id", "test_date"],
        }
    }

    /// All columns the staging layer reads from this source.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Source::Patients => &[
                "patient_id",
                "first_name",
                "last_name",
                "date_of_birth",
                "gender",
                "email",
                "phone",
                "address",
                "city",
                "state",
                "zip_code",
                "insurance_provider",
                "insurance_id",
                "blood_type",
                "emergency_contact",
            ],
            Source::Visits => &[
                "visit_id",
                "patient_id",
                "visit_date",
                "visit_type",
                "department",
                "doctor_id",
                "diagnosis_code",
                "chief_complaint",
                "duration_minutes",
                "total_cost",
                "insurance_coverage",
                "patient_responsibility",
                "visit_status",
                "follow_up_required",
                "follow_up_date",
            ],
            Source::LabResults => &[
                "lab_result_id",
                "patient_id",
                "visit_id",
                "test_date",
                "test_name",
                "test_type",
                "test_category",
                "result_value",
                "result_unit",
                "reference_range_min",
                "reference_range_max",
                "result_interpretation",
                "lab_technician",
            ],
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline layer a relation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Staging,
    Mart,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Staging => "staging",
            Layer::Mart => "mart",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream node of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Upstream {
    Source(Source),
    Relation(RelationName),
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upstream::Source(source) => write!(f, "source.{source}"),
            Upstream::Relation(relation) => write!(f, "{relation}"),
        }
    }
}

/// Column name shared by every staging relation: row creation time.
pub const CREATED_AT: &str = "created_at";
/// Column name shared by every staging relation: row update time.
pub const UPDATED_AT: &str = "updated_at";

/// One of the five output relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationName {
    StgPatients,
    StgVisits,
    StgLabResults,
    PatientSummary,
    DepartmentMetrics,
}

impl RelationName {
    /// All relations in a valid topological order.
    pub const ALL: [RelationName; 5] = [
        RelationName::StgPatients,
        RelationName::StgVisits,
        RelationName::StgLabResults,
        RelationName::PatientSummary,
        RelationName::DepartmentMetrics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationName::StgPatients => "stg_patients",
            RelationName::StgVisits => "stg_visits",
            RelationName::StgLabResults => "stg_lab_results",
            RelationName::PatientSummary => "patient_summary",
            RelationName::DepartmentMetrics => "department_metrics",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|relation| relation.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn layer(&self) -> Layer {
        match self {
            RelationName::StgPatients | RelationName::StgVisits | RelationName::StgLabResults => {
                Layer::Staging
            }
            RelationName::PatientSummary | RelationName::DepartmentMetrics => Layer::Mart,
        }
    }

    pub fn depends_on(&self) -> Vec<Upstream> {
        match self {
            RelationName::StgPatients => vec![Upstream::Source(Source::Patients)],
            RelationName::StgVisits => vec![Upstream::Source(Source::Visits)],
            RelationName::StgLabResults => vec![Upstream::Source(Source::LabResults)],
            RelationName::PatientSummary => vec![
                Upstream::Relation(RelationName::StgPatients),
                Upstream::Relation(RelationName::StgVisits),
                Upstream::Relation(RelationName::StgLabResults),
            ],
            RelationName::DepartmentMetrics => vec![
                Upstream::Relation(RelationName::StgVisits),
                Upstream::Relation(RelationName::StgLabResults),
            ],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RelationName::StgPatients => "Cleaned patient demographics with age groups and contact validity",
            RelationName::StgVisits => "Cleaned visits with care, length and follow-up categories",
            RelationName::StgLabResults => "Cleaned lab results with numeric values and abnormal flags",
            RelationName::PatientSummary => "One row per patient with visit and lab aggregates",
            RelationName::DepartmentMetrics => "One row per department with volume, revenue and rates",
        }
    }

    /// Output columns in materialization order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            RelationName::StgPatients => &[
                "patient_id",
                "first_name",
                "last_name",
                "full_name",
                "date_of_birth",
                "age",
                "age_group",
                "gender",
                "email",
                "phone",
                "address",
                "city",
                "state",
                "zip_code",
                "insurance_provider",
                "insurance_id",
                "blood_type",
                "emergency_contact",
                "has_valid_email",
                "has_valid_phone",
                CREATED_AT,
                UPDATED_AT,
            ],
            RelationName::StgVisits => &[
                "visit_id",
                "patient_id",
                "visit_date",
                "visit_fiscal_quarter",
                "visit_type",
                "department",
                "doctor_id",
                "diagnosis_code",
                "chief_complaint",
                "duration_minutes",
                "total_cost",
                "insurance_coverage",
                "patient_responsibility",
                "visit_status",
                "follow_up_required",
                "follow_up_date",
                "care_category",
                "visit_length_category",
                "has_insurance_coverage",
                "has_scheduled_followup",
                CREATED_AT,
                UPDATED_AT,
            ],
            RelationName::StgLabResults => &[
                "lab_result_id",
                "patient_id",
                "visit_id",
                "test_date",
                "test_name",
                "test_type",
                "test_category",
                "result_value",
                "numeric_result_value",
                "result_unit",
                "reference_range_min",
                "reference_range_max",
                "result_interpretation",
                "lab_technician",
                "is_abnormal",
                "result_category",
                "result_status",
                "days_since_test",
                CREATED_AT,
                UPDATED_AT,
            ],
            RelationName::PatientSummary => &[
                "patient_id",
                "full_name",
                "age",
                "age_group",
                "gender",
                "insurance_provider",
                "total_visits",
                "unique_visit_days",
                "first_visit_date",
                "last_visit_date",
                "avg_visit_duration",
                "total_visit_cost",
                "total_insurance_coverage",
                "total_patient_responsibility",
                "emergency_visits",
                "total_lab_tests",
                "abnormal_results",
                "utilization_category",
                "lab_status",
            ],
            RelationName::DepartmentMetrics => &[
                "department",
                "total_visits",
                "unique_patients",
                "unique_doctors",
                "total_revenue",
                "avg_revenue_per_visit",
                "avg_visit_duration",
                "completed_visits",
                "cancelled_visits",
                "emergency_visits",
                "completion_rate",
                "emergency_visit_percentage",
                "total_lab_tests",
                "abnormal_lab_results",
                "efficiency_category",
                "emergency_category",
            ],
        }
    }

    /// Output file name for CSV materialization.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.as_str())
    }
}

impl fmt::Display for RelationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
