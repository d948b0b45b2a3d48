use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use comfy_table::Table;
use tracing::{info, info_span};

use caremart_cli::pipeline::{
    MANIFEST_FILE, RUN_RESULTS_FILE, build_manifest, load_seeds, run_data_tests, transform,
    unwritten_entries, write_json, write_relations,
};
use caremart_cli::project::ResolvedProject;
use caremart_model::{RelationName, SeedEntry, Source};

use crate::cli::{ProjectArgs, RunArgs};
use crate::summary::apply_table_style;
use crate::types::{RunOutcome, SeedStatus};

/// What `run`, `test` and `build` do after transforming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Run,
    Test,
    Build,
}

impl RunMode {
    fn writes(self) -> bool {
        matches!(self, RunMode::Run | RunMode::Build)
    }

    fn tests(self) -> bool {
        matches!(self, RunMode::Test | RunMode::Build)
    }
}

pub fn run_models() {
    let mut table = Table::new();
    table.set_header(vec!["Relation", "Layer", "Depends on", "Description"]);
    apply_table_style(&mut table);
    for relation in RelationName::ALL {
        let depends_on = relation
            .depends_on()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            relation.as_str().to_string(),
            relation.layer().to_string(),
            depends_on,
            relation.description().to_string(),
        ]);
    }
    println!("{table}");
}

pub fn seed_status(project: &ResolvedProject) -> Vec<SeedStatus> {
    Source::ALL
        .iter()
        .map(|source| {
            let path = project.seed_dir.join(source.file_name());
            SeedStatus {
                exists: path.is_file(),
                path,
            }
        })
        .collect()
}

pub fn run_debug(args: &ProjectArgs) -> Result<(ResolvedProject, Vec<SeedStatus>)> {
    let project = ResolvedProject::load(&args.project_dir, &args.overrides())?;
    let seeds = seed_status(&project);
    Ok((project, seeds))
}

pub fn run_seed(args: &ProjectArgs) -> Result<Vec<SeedEntry>> {
    let project = ResolvedProject::load(&args.project_dir, &args.overrides())?;
    let seeds = load_seeds(&project.seed_dir)?;
    Ok(seeds.entries())
}

pub fn run_pipeline_command(args: &RunArgs, mode: RunMode) -> Result<RunOutcome> {
    let project = ResolvedProject::load(&args.project.project_dir, &args.overrides())?;
    let started = Utc::now();
    let ctx = project.run_context(started);
    let span = info_span!(
        "run",
        project = %project.config.name,
        target = %project.target_name,
        reference_date = %ctx.reference_date
    );
    let _guard = span.enter();
    let start = Instant::now();

    let seeds = load_seeds(&project.seed_dir)?;
    let output = transform(&seeds, &ctx)?;

    let (relations, output_dir, manifest) = if mode.writes() {
        let relations = write_relations(&output, &project.output_dir)?;
        let manifest_path = project.output_dir.join(MANIFEST_FILE);
        let manifest = build_manifest(&project, &ctx, &seeds, &output, relations.clone());
        write_json(&manifest_path, &manifest)?;
        (relations, Some(project.output_dir.clone()), Some(manifest_path))
    } else {
        (unwritten_entries(&output), None, None)
    };

    let tests = mode.tests().then(|| run_data_tests(&output));
    let run_results = match (&tests, &output_dir) {
        (Some(report), Some(dir)) => {
            let path = dir.join(RUN_RESULTS_FILE);
            write_json(&path, report)?;
            Some(path)
        }
        _ => None,
    };

    info!(
        relations = relations.len(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(RunOutcome {
        project: project.config.name.clone(),
        target: project.target_name.clone(),
        reference_date: ctx.reference_date,
        output_dir,
        relations,
        diagnostics: output.diagnostics(),
        manifest,
        tests,
        run_results,
    })
}
