//! Pipeline driver: sources, then staging, then marts.
//!
//! The driver enforces the topological order of the relation catalog. The two
//! marts only read staged records, never each other, and run one after the
//! other in catalog order.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info, info_span, warn};

use caremart_ingest::SeedSet;
use caremart_model::{
    DepartmentMetrics, LabResult, Patient, PatientSummary, RelationName, StageDiagnostics, Visit,
};

use crate::context::RunContext;
use crate::error::Result;
use crate::frame::RelationFrame;
use crate::frame_builder::{
    department_metrics_frame, lab_results_frame, patient_summary_frame, patients_frame,
    visits_frame,
};
use crate::marts::{department_metrics, patient_summary};
use crate::source::{raw_lab_results, raw_patients, raw_visits};
use crate::staging::{Staged, stg_lab_results, stg_patients, stg_visits};

/// The three staged relations.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedRelations {
    pub patients: Staged<Patient>,
    pub visits: Staged<Visit>,
    pub lab_results: Staged<LabResult>,
}

impl StagedRelations {
    pub fn diagnostics(&self) -> [&StageDiagnostics; 3] {
        [
            &self.patients.diagnostics,
            &self.visits.diagnostics,
            &self.lab_results.diagnostics,
        ]
    }
}

/// The two mart relations.
#[derive(Debug, Clone, PartialEq)]
pub struct MartRelations {
    pub patient_summary: Vec<PatientSummary>,
    pub department_metrics: Vec<DepartmentMetrics>,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub staged: StagedRelations,
    pub marts: MartRelations,
    pub frames: BTreeMap<RelationName, RelationFrame>,
}

impl PipelineOutput {
    pub fn frame(&self, name: RelationName) -> Option<&RelationFrame> {
        self.frames.get(&name)
    }

    /// Frames in catalog order.
    pub fn ordered_frames(&self) -> Vec<&RelationFrame> {
        RelationName::ALL
            .iter()
            .filter_map(|name| self.frames.get(name))
            .collect()
    }

    pub fn diagnostics(&self) -> Vec<StageDiagnostics> {
        self.staged.diagnostics().into_iter().cloned().collect()
    }
}

fn log_stage(diagnostics: &StageDiagnostics, started: Instant) {
    let rejected = diagnostics.rejected_rows();
    let degraded = diagnostics.degraded_values();
    info!(
        relation = %diagnostics.relation,
        input_rows = diagnostics.input_rows,
        rows = diagnostics.output_rows,
        rejected,
        degraded,
        duration_ms = started.elapsed().as_millis(),
        "staged"
    );
    if rejected > 0 {
        warn!(
            relation = %diagnostics.relation,
            missing_keys = ?diagnostics.missing_keys,
            invalid_key_dates = ?diagnostics.invalid_key_dates,
            "rows dropped for missing or unreadable keys"
        );
    }
    if degraded > 0 {
        debug!(
            relation = %diagnostics.relation,
            fields = ?diagnostics.degraded_fields,
            "unreadable values set to null"
        );
    }
}

/// Build the staging layer from loaded seeds.
pub fn run_staging(seeds: &SeedSet, ctx: &RunContext) -> StagedRelations {
    info_span!("staging").in_scope(|| {
        let start = Instant::now();
        let patients = stg_patients(&raw_patients(&seeds.patients), ctx);
        log_stage(&patients.diagnostics, start);

        let start = Instant::now();
        let visits = stg_visits(&raw_visits(&seeds.visits), ctx);
        log_stage(&visits.diagnostics, start);

        let start = Instant::now();
        let lab_results = stg_lab_results(&raw_lab_results(&seeds.lab_results), ctx);
        log_stage(&lab_results.diagnostics, start);

        StagedRelations {
            patients,
            visits,
            lab_results,
        }
    })
}

/// Build the mart layer from staged relations.
pub fn run_marts(staged: &StagedRelations, ctx: &RunContext) -> MartRelations {
    info_span!("marts").in_scope(|| {
        let start = Instant::now();
        let patient_summary = patient_summary(
            &staged.patients.rows,
            &staged.visits.rows,
            &staged.lab_results.rows,
        );
        info!(
            relation = %RelationName::PatientSummary,
            rows = patient_summary.len(),
            duration_ms = start.elapsed().as_millis(),
            "aggregated"
        );

        let start = Instant::now();
        let department_metrics = department_metrics(
            &staged.visits.rows,
            &staged.lab_results.rows,
            &ctx.departments,
        );
        info!(
            relation = %RelationName::DepartmentMetrics,
            rows = department_metrics.len(),
            duration_ms = start.elapsed().as_millis(),
            "aggregated"
        );

        MartRelations {
            patient_summary,
            department_metrics,
        }
    })
}

/// Render every relation as a DataFrame.
pub fn build_frames(
    staged: &StagedRelations,
    marts: &MartRelations,
    ctx: &RunContext,
) -> Result<BTreeMap<RelationName, RelationFrame>> {
    let frames = [
        patients_frame(&staged.patients.rows, ctx)?,
        visits_frame(&staged.visits.rows, ctx)?,
        lab_results_frame(&staged.lab_results.rows, ctx)?,
        patient_summary_frame(&marts.patient_summary)?,
        department_metrics_frame(&marts.department_metrics)?,
    ];
    Ok(frames
        .into_iter()
        .map(|frame| (frame.name, frame))
        .collect())
}

/// Run staging and marts over loaded seeds.
pub fn run_pipeline(seeds: &SeedSet, ctx: &RunContext) -> Result<PipelineOutput> {
    let start = Instant::now();
    let staged = run_staging(seeds, ctx);
    let marts = run_marts(&staged, ctx);
    let frames = build_frames(&staged, &marts, ctx)?;
    debug!(
        reference_date = %ctx.reference_date,
        relations = frames.len(),
        duration_ms = start.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(PipelineOutput {
        staged,
        marts,
        frames,
    })
}
