//! Staging and mart transformations for the caremart pipeline.
//!
//! - **expressions**: the single definition of every derived value
//! - **relational**: grouping, left joins and null-skipping aggregates
//! - **staging**: `stg_patients`, `stg_visits`, `stg_lab_results`
//! - **marts**: `patient_summary`, `department_metrics`
//! - **frame_builder**: typed records to Polars DataFrames
//! - **pipeline**: the run driver

pub mod context;
mod error;
pub mod expressions;
pub mod frame;
pub mod frame_builder;
pub mod marts;
pub mod pipeline;
pub mod relational;
pub mod source;
pub mod staging;

pub use context::RunContext;
pub use error::{Result, TransformError};
pub use frame::RelationFrame;
pub use pipeline::{
    MartRelations, PipelineOutput, StagedRelations, build_frames, run_marts, run_pipeline,
    run_staging,
};
pub use staging::Staged;
