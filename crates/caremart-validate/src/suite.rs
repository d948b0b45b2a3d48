//! Declarative data tests.
//!
//! A [`DataTest`] names a relation, optionally a column, a severity and the
//! kind of check. [`default_suite`] is the test suite shipped with the
//! project: key integrity for every relation, vocabulary checks for every
//! categorical column, referential checks from facts to patients, and
//! expectations that tie derived columns back to their inputs.

use serde::{Deserialize, Serialize};

use caremart_model::{
    AgeGroup, CareCategory, EfficiencyCategory, EmergencyCategory, LabStatus, RelationName,
    ResultCategory, ResultStatus, TestSeverity, UtilizationCategory, VisitLengthCategory,
};

/// Row-level expectations that relate several columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expect", rename_all = "snake_case")]
pub enum Expectation {
    /// Non-null values lie within the inclusive range.
    Between { min: Option<f64>, max: Option<f64> },
    /// `age_group` is the bucket of `age`.
    AgeGroupMatchesAge,
    /// Non-`Numeric` lab tests carry no numeric value and no abnormal flag.
    NumericOnlyForNumericTests,
    /// `is_abnormal` agrees with the value and reference range.
    AbnormalMatchesRange,
    /// `utilization_category` is the bucket of `total_visits`.
    UtilizationMatchesVisits,
    /// Row count equals the number of distinct `column` values of another relation.
    RowCountMatches { relation: RelationName, column: String },
}

impl Expectation {
    pub fn slug(&self) -> &'static str {
        match self {
            Expectation::Between { .. } => "between",
            Expectation::AgeGroupMatchesAge => "age_group_matches_age",
            Expectation::NumericOnlyForNumericTests => "numeric_only_for_numeric_tests",
            Expectation::AbnormalMatchesRange => "abnormal_matches_range",
            Expectation::UtilizationMatchesVisits => "utilization_matches_visits",
            Expectation::RowCountMatches { .. } => "row_count_matches",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestKind {
    NotNull,
    Unique,
    AcceptedValues { values: Vec<String> },
    /// Every non-null value exists in `field` of `to`.
    Relationships { to: RelationName, field: String },
    Expression(Expectation),
}

/// One data test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTest {
    pub relation: RelationName,
    pub column: Option<String>,
    pub severity: TestSeverity,
    pub kind: TestKind,
}

impl DataTest {
    fn column_test(relation: RelationName, column: &str, kind: TestKind) -> Self {
        Self {
            relation,
            column: Some(column.to_string()),
            severity: TestSeverity::Error,
            kind,
        }
    }

    pub fn not_null(relation: RelationName, column: &str) -> Self {
        Self::column_test(relation, column, TestKind::NotNull)
    }

    pub fn unique(relation: RelationName, column: &str) -> Self {
        Self::column_test(relation, column, TestKind::Unique)
    }

    pub fn accepted_values<I, S>(relation: RelationName, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self::column_test(relation, column, TestKind::AcceptedValues { values })
    }

    pub fn relationships(
        relation: RelationName,
        column: &str,
        to: RelationName,
        field: &str,
    ) -> Self {
        Self::column_test(
            relation,
            column,
            TestKind::Relationships {
                to,
                field: field.to_string(),
            },
        )
    }

    pub fn between(
        relation: RelationName,
        column: &str,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        Self::column_test(
            relation,
            column,
            TestKind::Expression(Expectation::Between { min, max }),
        )
    }

    pub fn expect(relation: RelationName, expectation: Expectation) -> Self {
        Self {
            relation,
            column: None,
            severity: TestSeverity::Error,
            kind: TestKind::Expression(expectation),
        }
    }

    pub fn warn(mut self) -> Self {
        self.severity = TestSeverity::Warn;
        self
    }

    /// Stable identifier, e.g. `not_null_stg_visits_visit_id`.
    pub fn name(&self) -> String {
        let kind = match &self.kind {
            TestKind::NotNull => "not_null".to_string(),
            TestKind::Unique => "unique".to_string(),
            TestKind::AcceptedValues { .. } => "accepted_values".to_string(),
            TestKind::Relationships { .. } => "relationships".to_string(),
            TestKind::Expression(expectation) => format!("expect_{}", expectation.slug()),
        };
        let mut name = format!("{kind}_{}", self.relation);
        if let Some(column) = &self.column {
            name.push('_');
            name.push_str(column);
        }
        if let TestKind::Relationships { to, field } = &self.kind {
            name.push_str(&format!("__{field}__{to}"));
        }
        name
    }
}

fn labels<T: Copy>(all: &[T], as_str: fn(&T) -> &'static str) -> Vec<String> {
    all.iter().map(|v| as_str(v).to_string()).collect()
}

/// The project's data test suite.
pub fn default_suite() -> Vec<DataTest> {
    use RelationName::{
        DepartmentMetrics, PatientSummary, StgLabResults, StgPatients, StgVisits,
    };

    let mut suite = Vec::new();

    // stg_patients
    suite.push(DataTest::not_null(StgPatients, "patient_id"));
    suite.push(DataTest::unique(StgPatients, "patient_id"));
    suite.push(DataTest::not_null(StgPatients, "date_of_birth"));
    suite.push(DataTest::accepted_values(
        StgPatients,
        "age_group",
        labels(&AgeGroup::ALL, AgeGroup::as_str),
    ));
    suite.push(DataTest::between(StgPatients, "age", Some(0.0), Some(130.0)).warn());
    suite.push(DataTest::expect(StgPatients, Expectation::AgeGroupMatchesAge));

    // stg_visits
    suite.push(DataTest::not_null(StgVisits, "visit_id"));
    suite.push(DataTest::unique(StgVisits, "visit_id"));
    suite.push(DataTest::not_null(StgVisits, "patient_id"));
    suite.push(DataTest::not_null(StgVisits, "visit_date"));
    suite.push(
        DataTest::relationships(StgVisits, "patient_id", StgPatients, "patient_id").warn(),
    );
    suite.push(DataTest::accepted_values(
        StgVisits,
        "care_category",
        labels(&CareCategory::ALL, CareCategory::as_str),
    ));
    suite.push(DataTest::accepted_values(
        StgVisits,
        "visit_length_category",
        labels(&VisitLengthCategory::ALL, VisitLengthCategory::as_str),
    ));
    suite.push(DataTest::between(StgVisits, "total_cost", Some(0.0), None).warn());

    // stg_lab_results
    suite.push(DataTest::not_null(StgLabResults, "lab_result_id"));
    suite.push(DataTest::unique(StgLabResults, "lab_result_id"));
    suite.push(DataTest::not_null(StgLabResults, "patient_id"));
    suite.push(DataTest::not_null(StgLabResults, "test_date"));
    suite.push(
        DataTest::relationships(StgLabResults, "patient_id", StgPatients, "patient_id").warn(),
    );
    suite.push(
        DataTest::relationships(StgLabResults, "visit_id", StgVisits, "visit_id").warn(),
    );
    suite.push(DataTest::accepted_values(
        StgLabResults,
        "result_category",
        labels(&ResultCategory::ALL, ResultCategory::as_str),
    ));
    suite.push(DataTest::accepted_values(
        StgLabResults,
        "result_status",
        labels(&ResultStatus::ALL, ResultStatus::as_str),
    ));
    suite.push(DataTest::expect(
        StgLabResults,
        Expectation::NumericOnlyForNumericTests,
    ));
    suite.push(DataTest::expect(
        StgLabResults,
        Expectation::AbnormalMatchesRange,
    ));

    // patient_summary
    suite.push(DataTest::not_null(PatientSummary, "patient_id"));
    suite.push(DataTest::unique(PatientSummary, "patient_id"));
    suite.push(DataTest::relationships(
        PatientSummary,
        "patient_id",
        StgPatients,
        "patient_id",
    ));
    suite.push(DataTest::accepted_values(
        PatientSummary,
        "utilization_category",
        labels(&UtilizationCategory::ALL, UtilizationCategory::as_str),
    ));
    suite.push(DataTest::accepted_values(
        PatientSummary,
        "lab_status",
        labels(&LabStatus::ALL, LabStatus::as_str),
    ));
    suite.push(DataTest::between(PatientSummary, "total_visits", Some(0.0), None));
    suite.push(DataTest::expect(
        PatientSummary,
        Expectation::UtilizationMatchesVisits,
    ));
    suite.push(DataTest::expect(
        PatientSummary,
        Expectation::RowCountMatches {
            relation: StgPatients,
            column: "patient_id".to_string(),
        },
    ));

    // department_metrics
    suite.push(DataTest::not_null(DepartmentMetrics, "department"));
    suite.push(DataTest::unique(DepartmentMetrics, "department"));
    suite.push(DataTest::accepted_values(
        DepartmentMetrics,
        "efficiency_category",
        labels(&EfficiencyCategory::ALL, EfficiencyCategory::as_str),
    ));
    suite.push(DataTest::accepted_values(
        DepartmentMetrics,
        "emergency_category",
        labels(&EmergencyCategory::ALL, EmergencyCategory::as_str),
    ));
    suite.push(DataTest::between(
        DepartmentMetrics,
        "completion_rate",
        Some(0.0),
        Some(100.0),
    ));
    suite.push(DataTest::between(
        DepartmentMetrics,
        "emergency_visit_percentage",
        Some(0.0),
        Some(100.0),
    ));

    suite
}
