//! Run stages shared by the `run`, `test` and `build` commands.
//!
//! 1. **Seed**: load and checksum the seed files
//! 2. **Transform**: staging then marts, in catalog order
//! 3. **Write**: one CSV per relation, plus `manifest.json`
//! 4. **Test**: the data test suite, written to `run_results.json`

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use serde::Serialize;
use tracing::{info, info_span, trace};

use caremart_ingest::{SeedSet, any_to_string, load_seed_dir};
use caremart_model::{RelationEntry, RelationName, RunManifest, TestReport};
use caremart_transform::{PipelineOutput, RunContext, run_pipeline};
use caremart_validate::run_default_suite;

use crate::logging::redact_value;
use crate::project::ResolvedProject;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const RUN_RESULTS_FILE: &str = "run_results.json";

/// Load the three seed files.
pub fn load_seeds(seed_dir: &Path) -> Result<SeedSet> {
    info_span!("seed", seed_dir = %seed_dir.display()).in_scope(|| {
        let start = Instant::now();
        let seeds = load_seed_dir(seed_dir)
            .with_context(|| format!("load seeds from {}", seed_dir.display()))?;
        for table in seeds.tables() {
            trace_first_row(table.source.as_str(), &table.data);
        }
        info!(
            rows = seeds.tables().iter().map(|t| t.row_count()).sum::<usize>(),
            duration_ms = start.elapsed().as_millis(),
            "seeds loaded"
        );
        Ok(seeds)
    })
}

fn trace_first_row(source: &str, df: &DataFrame) {
    if df.height() == 0 {
        return;
    }
    for column in df.get_columns() {
        let value = column.get(0).map(any_to_string).unwrap_or_default();
        trace!(
            source,
            column = %column.name(),
            value = redact_value(&value),
            "first row"
        );
    }
}

/// Execute staging and marts in memory.
pub fn transform(seeds: &SeedSet, ctx: &RunContext) -> Result<PipelineOutput> {
    run_pipeline(seeds, ctx).context("transform relations")
}

/// Relations keyed by name, as the data tests read them.
pub fn relation_map(output: &PipelineOutput) -> BTreeMap<RelationName, DataFrame> {
    output
        .frames
        .iter()
        .map(|(name, frame)| (*name, frame.data.clone()))
        .collect()
}

/// Run the default data test suite over the pipeline output.
pub fn run_data_tests(output: &PipelineOutput) -> TestReport {
    info_span!("test").in_scope(|| {
        let start = Instant::now();
        let report = run_default_suite(&relation_map(output));
        info!(
            passed = report.passed_count(),
            warnings = report.warning_count(),
            failures = report.failure_count(),
            duration_ms = start.elapsed().as_millis(),
            "data tests complete"
        );
        report
    })
}

/// Write every relation as `<output_dir>/<relation>.csv`.
pub fn write_relations(output: &PipelineOutput, output_dir: &Path) -> Result<Vec<RelationEntry>> {
    info_span!("write", output_dir = %output_dir.display()).in_scope(|| {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("create {}", output_dir.display()))?;
        let mut entries = Vec::new();
        for frame in output.ordered_frames() {
            let start = Instant::now();
            let path = output_dir.join(frame.name.file_name());
            let mut data = frame.data.clone();
            write_csv(&path, &mut data)?;
            info!(
                relation = %frame.name,
                rows = frame.record_count(),
                path = %path.display(),
                duration_ms = start.elapsed().as_millis(),
                "relation written"
            );
            entries.push(relation_entry(
                frame.name,
                Some(path),
                frame.column_names(),
                frame.record_count(),
            ));
        }
        Ok(entries)
    })
}

fn write_csv(path: &Path, data: &mut DataFrame) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(data)
        .with_context(|| format!("write {}", path.display()))
}

/// Catalog entries for relations that were computed but not written.
pub fn unwritten_entries(output: &PipelineOutput) -> Vec<RelationEntry> {
    output
        .ordered_frames()
        .into_iter()
        .map(|frame| relation_entry(frame.name, None, frame.column_names(), frame.record_count()))
        .collect()
}

fn relation_entry(
    name: RelationName,
    path: Option<PathBuf>,
    columns: Vec<String>,
    rows: usize,
) -> RelationEntry {
    RelationEntry {
        name,
        layer: name.layer(),
        depends_on: name.depends_on(),
        description: name.description().to_string(),
        path,
        rows,
        columns,
    }
}

pub fn build_manifest(
    project: &ResolvedProject,
    ctx: &RunContext,
    seeds: &SeedSet,
    output: &PipelineOutput,
    relations: Vec<RelationEntry>,
) -> RunManifest {
    RunManifest {
        project: project.config.name.clone(),
        target: project.target_name.clone(),
        dataset: project.target.dataset.clone(),
        location: project.target.location.clone(),
        reference_date: ctx.reference_date,
        run_started_at: ctx.run_started_at,
        seeds: seeds.entries(),
        relations,
        diagnostics: output.diagnostics(),
    }
}

/// Pretty JSON with a trailing newline.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    fs::write(path, format!("{json}\n")).with_context(|| format!("write {}", path.display()))
}
