//! Row rejection and field degradation counters.
//!
//! Staging never fails a run because of bad row content: rows without their
//! identity/date keys are dropped and unparseable non-key fields become null.
//! These counters make both outcomes visible to the caller without changing the
//! shape of the staged relation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::relation::RelationName;

/// Why a source row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The key column was null or blank.
    MissingKey,
    /// The key date column held text that is not a date.
    InvalidKeyDate,
}

/// Counters for one staged relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDiagnostics {
    pub relation: RelationName,
    pub input_rows: usize,
    pub output_rows: usize,
    /// Rows dropped because a key was null, by key column.
    pub missing_keys: BTreeMap<String, usize>,
    /// Rows dropped because a key date did not parse, by key column.
    pub invalid_key_dates: BTreeMap<String, usize>,
    /// Non-null source values that degraded to null, by field.
    pub degraded_fields: BTreeMap<String, usize>,
}

impl StageDiagnostics {
    pub fn new(relation: RelationName, input_rows: usize) -> Self {
        Self {
            relation,
            input_rows,
            output_rows: 0,
            missing_keys: BTreeMap::new(),
            invalid_key_dates: BTreeMap::new(),
            degraded_fields: BTreeMap::new(),
        }
    }

    /// Record a dropped row. Only the first failing key of a row is counted.
    pub fn reject(&mut self, column: &str, reason: RejectReason) {
        let counter = match reason {
            RejectReason::MissingKey => &mut self.missing_keys,
            RejectReason::InvalidKeyDate => &mut self.invalid_key_dates,
        };
        *counter.entry(column.to_string()).or_insert(0) += 1;
    }

    /// Record a field that had a value which could not be interpreted.
    pub fn degrade(&mut self, field: &str) {
        *self.degraded_fields.entry(field.to_string()).or_insert(0) += 1;
    }

    pub fn rejected_rows(&self) -> usize {
        self.missing_keys.values().sum::<usize>() + self.invalid_key_dates.values().sum::<usize>()
    }

    pub fn degraded_values(&self) -> usize {
        self.degraded_fields.values().sum()
    }

    /// Input rows must equal output rows plus rejected rows.
    pub fn is_balanced(&self) -> bool {
        self.input_rows == self.output_rows + self.rejected_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_rejections_and_degradations() {
        let mut diagnostics = StageDiagnostics::new(RelationName::StgVisits, 4);
        diagnostics.reject("patient_id", RejectReason::MissingKey);
        diagnostics.reject("visit_date", RejectReason::InvalidKeyDate);
        diagnostics.degrade("total_cost");
        diagnostics.degrade("total_cost");
        diagnostics.output_rows = 2;

        assert_eq!(diagnostics.rejected_rows(), 2);
        assert_eq!(diagnostics.degraded_values(), 2);
        assert_eq!(diagnostics.degraded_fields.get("total_cost"), Some(&2));
        assert!(diagnostics.is_balanced());
    }
}
