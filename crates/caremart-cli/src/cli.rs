//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use caremart_cli::project::Overrides;

#[derive(Parser)]
#[command(
    name = "caremart",
    version,
    about = "Healthcare analytics pipeline - stage and aggregate patient, visit and lab data",
    long_about = "Build the caremart relations from seed CSV files.\n\n\
                  Staging cleans patients, visits and lab results; the marts\n\
                  aggregate them into patient_summary and department_metrics."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient-level values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load the seed files and report their shape and checksums.
    Seed(ProjectArgs),

    /// Run the pipeline and write every relation plus manifest.json.
    Run(RunArgs),

    /// Run the pipeline in memory and execute the data tests.
    Test(RunArgs),

    /// Run, then test, writing run_results.json next to the relations.
    Build(RunArgs),

    /// List the relations with their layer, dependencies and description.
    Models,

    /// Show the resolved configuration and seed file status.
    Debug(ProjectArgs),
}

#[derive(Args, Clone)]
pub struct ProjectArgs {
    /// Project directory containing caremart.toml.
    #[arg(long = "project-dir", value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Target from caremart.toml (default: the configured default target).
    #[arg(long = "target", short = 't', value_name = "NAME")]
    pub target: Option<String>,

    /// Seed directory (overrides seed_dir).
    #[arg(long = "seed-dir", value_name = "DIR")]
    pub seed_dir: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Output directory (overrides the target's output_dir).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Reference date for ages and day counts, YYYY-MM-DD (default: today).
    #[arg(long = "as-of", value_name = "DATE")]
    pub as_of: Option<NaiveDate>,
}

impl ProjectArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            target: self.target.clone(),
            seed_dir: self.seed_dir.clone(),
            ..Overrides::default()
        }
    }
}

impl RunArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            output_dir: self.output_dir.clone(),
            as_of: self.as_of,
            ..self.project.overrides()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
