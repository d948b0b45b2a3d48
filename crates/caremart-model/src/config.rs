//! Project configuration (`caremart.toml`).
//!
//! The configuration selects the deployment target (dev/prod), where the seed
//! files live, where relations are materialized, and the variables the
//! transforms read (reference date, fiscal year start, department roster).
//! A missing file is not an error: built-in defaults describe the standard
//! dev/prod layout.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default configuration file name inside a project directory.
pub const CONFIG_FILE_NAME: &str = "caremart.toml";

/// How often the orchestrator is expected to refresh the relations.
///
/// Informational only: the pipeline itself always performs one full run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshCadence {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Manual,
}

impl RefreshCadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshCadence::Hourly => "hourly",
            RefreshCadence::Daily => "daily",
            RefreshCadence::Weekly => "weekly",
            RefreshCadence::Manual => "manual",
        }
    }
}

/// A deployment target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Logical dataset name the relations are published under.
    pub dataset: String,
    /// Warehouse location label.
    #[serde(default = "default_location")]
    pub location: String,
    /// Directory the relations are written to, relative to the project root.
    pub output_dir: PathBuf,
    #[serde(default)]
    pub refresh: RefreshCadence,
}

fn default_location() -> String {
    "US".to_string()
}

/// Variables consumed by the transforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vars {
    /// The "current date" for age and day-difference calculations.
    /// `None` means the local date at run time.
    pub reference_date: Option<NaiveDate>,
    /// First month (1-12) of the fiscal year.
    pub fiscal_year_start_month: u32,
}

impl Default for Vars {
    fn default() -> Self {
        Self {
            reference_date: None,
            fiscal_year_start_month: 1,
        }
    }
}

/// Mart-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MartsConfig {
    /// Departments that must appear in `department_metrics` even without visits.
    pub departments: Vec<String>,
}

/// Top-level project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub seed_dir: PathBuf,
    pub default_target: String,
    pub targets: BTreeMap<String, TargetConfig>,
    pub vars: Vars,
    pub marts: MartsConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let mut targets = BTreeMap::new();
        targets.insert(
            "dev".to_string(),
            TargetConfig {
                dataset: "healthcare_data_dev".to_string(),
                location: default_location(),
                output_dir: PathBuf::from("target/dev"),
                refresh: RefreshCadence::Daily,
            },
        );
        targets.insert(
            "prod".to_string(),
            TargetConfig {
                dataset: "healthcare_data_prod".to_string(),
                location: default_location(),
                output_dir: PathBuf::from("target/prod"),
                refresh: RefreshCadence::Daily,
            },
        );
        Self {
            name: "healthcare_analytics".to_string(),
            seed_dir: PathBuf::from("seeds"),
            default_target: "dev".to_string(),
            targets,
            vars: Vars::default(),
            marts: MartsConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ProjectConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: None,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `caremart.toml` from a project directory, falling back to defaults
    /// when the file does not exist.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_file(&path)
    }

    /// Load and validate a specific configuration file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ProjectConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(ConfigError::Invalid {
                message: "at least one target must be defined".to_string(),
            });
        }
        if !self.targets.contains_key(&self.default_target) {
            return Err(ConfigError::UnknownTarget {
                name: self.default_target.clone(),
                available: self.target_names().join(", "),
            });
        }
        if !(1..=12).contains(&self.vars.fiscal_year_start_month) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "fiscal_year_start_month must be between 1 and 12, got {}",
                    self.vars.fiscal_year_start_month
                ),
            });
        }
        for (name, target) in &self.targets {
            if target.dataset.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    message: format!("target '{name}' has an empty dataset name"),
                });
            }
        }
        Ok(())
    }

    pub fn target_names(&self) -> Vec<String> {
        self.targets.keys().cloned().collect()
    }

    /// Resolve a target by name, or the default target when `name` is `None`.
    pub fn resolve_target(&self, name: Option<&str>) -> Result<(&str, &TargetConfig)> {
        let name = name.unwrap_or(&self.default_target);
        self.targets
            .get_key_value(name)
            .map(|(key, target)| (key.as_str(), target))
            .ok_or_else(|| ConfigError::UnknownTarget {
                name: name.to_string(),
                available: self.target_names().join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_dev_and_prod() {
        let config = ProjectConfig::default();
        assert!(config.validate().is_ok());
        let (name, target) = config.resolve_target(None).unwrap();
        assert_eq!(name, "dev");
        assert_eq!(target.dataset, "healthcare_data_dev");
        let (_, prod) = config.resolve_target(Some("prod")).unwrap();
        assert_eq!(prod.output_dir, PathBuf::from("target/prod"));
    }

    #[test]
    fn parses_partial_file() {
        let config = ProjectConfig::from_toml_str(
            r#"
name = "clinic"
default_target = "local"

[targets.local]
dataset = "clinic_local"
output_dir = "out"
refresh = "manual"

[vars]
reference_date = "2024-06-30"
fiscal_year_start_month = 7

[marts]
departments = ["Cardiology", "Oncology"]
"#,
        )
        .unwrap();
        assert_eq!(config.name, "clinic");
        assert_eq!(config.seed_dir, PathBuf::from("seeds"));
        let (_, target) = config.resolve_target(None).unwrap();
        assert_eq!(target.location, "US");
        assert_eq!(target.refresh, RefreshCadence::Manual);
        assert_eq!(
            config.vars.reference_date,
            NaiveDate::from_ymd_opt(2024, 6, 30)
        );
        assert_eq!(config.vars.fiscal_year_start_month, 7);
        assert_eq!(config.marts.departments.len(), 2);
    }

    #[test]
    fn rejects_unknown_default_target() {
        let err = ProjectConfig::from_toml_str(r#"default_target = "staging""#).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTarget { .. }));
    }

    #[test]
    fn rejects_bad_fiscal_month() {
        let err = ProjectConfig::from_toml_str("[vars]\nfiscal_year_start_month = 13").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn unknown_target_lists_available() {
        let config = ProjectConfig::default();
        let err = config.resolve_target(Some("qa")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown target 'qa' (available: dev, prod)"
        );
    }
}
