//! Run context shared by every transformation.
//!
//! The reference date stands in for "today" in age and day-difference
//! calculations; the run start timestamp is only ever written to the
//! `created_at`/`updated_at` columns.

use chrono::{DateTime, NaiveDate, Utc};

use caremart_model::ProjectConfig;

/// Runtime inputs of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    /// The "current date" for age and day-difference calculations.
    pub reference_date: NaiveDate,
    /// Wall-clock start of the run, stamped on staged rows.
    pub run_started_at: DateTime<Utc>,
    /// First month (1-12) of the fiscal year.
    pub fiscal_year_start_month: u32,
    /// Departments always reported in `department_metrics`.
    pub departments: Vec<String>,
}

impl RunContext {
    /// Create a context with a calendar fiscal year and no department roster.
    pub fn new(reference_date: NaiveDate, run_started_at: DateTime<Utc>) -> Self {
        Self {
            reference_date,
            run_started_at,
            fiscal_year_start_month: 1,
            departments: Vec::new(),
        }
    }

    /// Build the context from project configuration.
    ///
    /// `today` is used when the configuration does not pin a reference date.
    pub fn from_config(
        config: &ProjectConfig,
        today: NaiveDate,
        run_started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            reference_date: config.vars.reference_date.unwrap_or(today),
            run_started_at,
            fiscal_year_start_month: config.vars.fiscal_year_start_month,
            departments: config.marts.departments.clone(),
        }
    }

    pub fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = reference_date;
        self
    }

    pub fn with_fiscal_year_start_month(mut self, month: u32) -> Self {
        self.fiscal_year_start_month = month;
        self
    }

    pub fn with_departments<I, S>(mut self, departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.departments = departments.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_reference_date_wins_over_today() {
        let mut config = ProjectConfig::default();
        let pinned = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        config.vars.reference_date = Some(pinned);
        config.marts.departments = vec!["Cardiology".to_string()];

        let ctx = RunContext::from_config(&config, today, Utc::now());
        assert_eq!(ctx.reference_date, pinned);
        assert_eq!(ctx.departments, vec!["Cardiology".to_string()]);

        config.vars.reference_date = None;
        let ctx = RunContext::from_config(&config, today, Utc::now());
        assert_eq!(ctx.reference_date, today);
    }
}
