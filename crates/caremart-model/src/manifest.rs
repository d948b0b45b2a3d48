//! Run manifest written next to the materialized relations.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::diagnostics::StageDiagnostics;
use crate::relation::{Layer, RelationName, Source, Upstream};

/// A loaded seed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedEntry {
    pub source: Source,
    pub path: PathBuf,
    pub sha256: String,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// A materialized relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationEntry {
    pub name: RelationName,
    pub layer: Layer,
    pub depends_on: Vec<Upstream>,
    pub description: String,
    pub path: Option<PathBuf>,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Everything a consumer needs to audit one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub project: String,
    pub target: String,
    pub dataset: String,
    pub location: String,
    pub reference_date: NaiveDate,
    pub run_started_at: DateTime<Utc>,
    pub seeds: Vec<SeedEntry>,
    pub relations: Vec<RelationEntry>,
    pub diagnostics: Vec<StageDiagnostics>,
}
