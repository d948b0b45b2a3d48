//! Project resolution: configuration file plus command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};

use caremart_model::{CONFIG_FILE_NAME, ProjectConfig, TargetConfig};
use caremart_transform::RunContext;

/// Command-line values that take precedence over `caremart.toml`.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub target: Option<String>,
    pub seed_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub as_of: Option<NaiveDate>,
}

/// A project with its target selected and every path made absolute against
/// the project directory.
#[derive(Debug, Clone)]
pub struct ResolvedProject {
    pub project_dir: PathBuf,
    /// The configuration file, when one was found.
    pub config_path: Option<PathBuf>,
    pub config: ProjectConfig,
    pub target_name: String,
    pub target: TargetConfig,
    pub seed_dir: PathBuf,
    pub output_dir: PathBuf,
    pub reference_date: Option<NaiveDate>,
}

impl ResolvedProject {
    pub fn load(project_dir: &Path, overrides: &Overrides) -> Result<Self> {
        let config = ProjectConfig::load(project_dir)
            .with_context(|| format!("load configuration from {}", project_dir.display()))?;
        let config_path = project_dir.join(CONFIG_FILE_NAME);
        let config_path = config_path.exists().then_some(config_path);
        Self::from_config(project_dir, config_path, config, overrides)
    }

    pub fn from_config(
        project_dir: &Path,
        config_path: Option<PathBuf>,
        config: ProjectConfig,
        overrides: &Overrides,
    ) -> Result<Self> {
        let (target_name, target) = config
            .resolve_target(overrides.target.as_deref())
            .context("select target")?;
        let target_name = target_name.to_string();
        let target = target.clone();
        let seed_dir = project_dir.join(overrides.seed_dir.as_ref().unwrap_or(&config.seed_dir));
        let output_dir =
            project_dir.join(overrides.output_dir.as_ref().unwrap_or(&target.output_dir));
        let reference_date = overrides.as_of.or(config.vars.reference_date);
        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            config_path,
            config,
            target_name,
            target,
            seed_dir,
            output_dir,
            reference_date,
        })
    }

    /// Run context for a run starting at `started`.
    ///
    /// Without a pinned reference date the local calendar date is used.
    pub fn run_context(&self, started: DateTime<Utc>) -> RunContext {
        let today = started.with_timezone(&Local).date_naive();
        let ctx = RunContext::from_config(&self.config, today, started);
        match self.reference_date {
            Some(date) => ctx.with_reference_date(date),
            None => ctx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn overrides_win_over_config() {
        let mut config = ProjectConfig::default();
        config.vars.reference_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        let overrides = Overrides {
            target: Some("prod".to_string()),
            seed_dir: Some(PathBuf::from("data")),
            output_dir: None,
            as_of: NaiveDate::from_ymd_opt(2024, 6, 30),
        };
        let project =
            ResolvedProject::from_config(Path::new("/proj"), None, config, &overrides).unwrap();
        assert_eq!(project.target_name, "prod");
        assert_eq!(project.seed_dir, PathBuf::from("/proj/data"));
        assert_eq!(project.output_dir, PathBuf::from("/proj/target/prod"));

        let started = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();
        let ctx = project.run_context(started);
        assert_eq!(ctx.reference_date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(ctx.run_started_at, started);
    }

    #[test]
    fn unknown_target_is_an_error() {
        let overrides = Overrides {
            target: Some("qa".to_string()),
            ..Overrides::default()
        };
        let err = ResolvedProject::from_config(
            Path::new("."),
            None,
            ProjectConfig::default(),
            &overrides,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("unknown target 'qa'"));
    }
}
