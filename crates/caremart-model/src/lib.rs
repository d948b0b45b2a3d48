//! Data model for the caremart healthcare analytics pipeline.
//!
//! - **records**: raw seed rows, staged rows and mart rows
//! - **enums**: derived-value vocabularies (age groups, categories, statuses)
//! - **relation**: relation catalog with lineage and column contracts
//! - **diagnostics**: row rejection and field degradation counters
//! - **config**: `caremart.toml` project configuration
//! - **report** / **manifest**: data test results and run metadata

pub mod config;
pub mod diagnostics;
pub mod enums;
pub mod error;
pub mod manifest;
pub mod records;
pub mod relation;
pub mod report;

pub use config::{
    CONFIG_FILE_NAME, MartsConfig, ProjectConfig, RefreshCadence, TargetConfig, Vars,
};
pub use diagnostics::{RejectReason, StageDiagnostics};
pub use enums::{
    AgeGroup, CareCategory, EfficiencyCategory, EmergencyCategory, LabStatus, ResultCategory,
    ResultStatus, UtilizationCategory, VisitLengthCategory,
};
pub use error::{ConfigError, Result};
pub use manifest::{RelationEntry, RunManifest, SeedEntry};
pub use records::{
    DepartmentMetrics, LabResult, Patient, PatientSummary, RawLabResult, RawPatient, RawVisit,
    Visit,
};
pub use relation::{CREATED_AT, Layer, RelationName, Source, UPDATED_AT, Upstream};
pub use report::{TestReport, TestResult, TestSeverity, TestStatus};
