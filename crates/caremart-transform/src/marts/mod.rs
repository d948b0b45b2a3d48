//! Mart layer: aggregates over the staging relations.
//!
//! Each source relation is aggregated on its own and the aggregates are then
//! left-joined onto the driving dimension. Visits and labs are never joined
//! row-to-row before aggregation.

mod department_metrics;
mod patient_summary;

pub use department_metrics::{
    UNKNOWN_DEPARTMENT, VisitLabAggregate, department_metrics, department_row, labs_by_visit,
};
pub use patient_summary::{
    PatientLabAggregate, PatientVisitAggregate, lab_aggregates_by_patient, patient_summary,
    visit_aggregates_by_patient,
};

use crate::expressions::round_to;

/// Monetary totals and averages are reported to the cent.
fn money(value: f64) -> f64 {
    round_to(value, 2)
}
