use std::path::PathBuf;

use caremart_model::{RelationEntry, StageDiagnostics, TestReport};

/// Outcome of `run`, `test` and `build`.
#[derive(Debug)]
pub struct RunOutcome {
    pub project: String,
    pub target: String,
    pub reference_date: chrono::NaiveDate,
    /// `None` when nothing was written (`test`).
    pub output_dir: Option<PathBuf>,
    pub relations: Vec<RelationEntry>,
    pub diagnostics: Vec<StageDiagnostics>,
    pub manifest: Option<PathBuf>,
    pub tests: Option<TestReport>,
    pub run_results: Option<PathBuf>,
}

impl RunOutcome {
    /// Error-severity data tests failed.
    pub fn has_failures(&self) -> bool {
        self.tests.as_ref().is_some_and(TestReport::has_failures)
    }
}

/// One seed file as reported by `seed` and `debug`.
#[derive(Debug)]
pub struct SeedStatus {
    pub path: PathBuf,
    pub exists: bool,
}
