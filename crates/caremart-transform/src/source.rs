//! Raw record extraction from seed tables.

use caremart_ingest::SeedTable;
use caremart_model::{RawLabResult, RawPatient, RawVisit};

/// Column-major text values of a seed table, consumed row by row.
struct SourceColumns {
    names: &'static [&'static str],
    values: Vec<Vec<Option<String>>>,
    rows: usize,
}

impl SourceColumns {
    fn read(table: &SeedTable) -> Self {
        let names = table.source.columns();
        let values = names.iter().map(|name| table.text_column(name)).collect();
        Self {
            names,
            values,
            rows: table.row_count(),
        }
    }

    fn take(&mut self, name: &str, row: usize) -> Option<String> {
        let idx = self.names.iter().position(|n| *n == name)?;
        self.values[idx].get_mut(row).and_then(Option::take)
    }
}

pub fn raw_patients(table: &SeedTable) -> Vec<RawPatient> {
    let mut cols = SourceColumns::read(table);
    (0..cols.rows)
        .map(|row| RawPatient {
            patient_id: cols.take("patient_id", row),
            first_name: cols.take("first_name", row),
            last_name: cols.take("last_name", row),
            date_of_birth: cols.take("date_of_birth", row),
            gender: cols.take("gender", row),
            email: cols.take("email", row),
            phone: cols.take("phone", row),
            address: cols.take("address", row),
            city: cols.take("city", row),
            state: cols.take("state", row),
            zip_code: cols.take("zip_code", row),
            insurance_provider: cols.take("insurance_provider", row),
            insurance_id: cols.take("insurance_id", row),
            blood_type: cols.take("blood_type", row),
            emergency_contact: cols.take("emergency_contact", row),
        })
        .collect()
}

pub fn raw_visits(table: &SeedTable) -> Vec<RawVisit> {
    let mut cols = SourceColumns::read(table);
    (0..cols.rows)
        .map(|row| RawVisit {
            visit_id: cols.take("visit_id", row),
            patient_id: cols.take("patient_id", row),
            visit_date: cols.take("visit_date", row),
            visit_type: cols.take("visit_type", row),
            department: cols.take("department", row),
            doctor_id: cols.take("doctor_id", row),
            diagnosis_code: cols.take("diagnosis_code", row),
            chief_complaint: cols.take("chief_complaint", row),
            duration_minutes: cols.take("duration_minutes", row),
            total_cost: cols.take("total_cost", row),
            insurance_coverage: cols.take("insurance_coverage", row),
            patient_responsibility: cols.take("patient_responsibility", row),
            visit_status: cols.take("visit_status", row),
            follow_up_required: cols.take("follow_up_required", row),
            follow_up_date: cols.take("follow_up_date", row),
        })
        .collect()
}

pub fn raw_lab_results(table: &SeedTable) -> Vec<RawLabResult> {
    let mut cols = SourceColumns::read(table);
    (0..cols.rows)
        .map(|row| RawLabResult {
            lab_result_id: cols.take("lab_result_id", row),
            patient_id: cols.take("patient_id", row),
            visit_id: cols.take("visit_id", row),
            test_date: cols.take("test_date", row),
            test_name: cols.take("test_name", row),
            test_type: cols.take("test_type", row),
            test_category: cols.take("test_category", row),
            result_value: cols.take("result_value", row),
            result_unit: cols.take("result_unit", row),
            reference_range_min: cols.take("reference_range_min", row),
            reference_range_max: cols.take("reference_range_max", row),
            result_interpretation: cols.take("result_interpretation", row),
            lab_technician: cols.take("lab_technician", row),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use caremart_model::Source;
    use polars::prelude::{Column, DataFrame, NamedFrom, Series};

    #[test]
    fn missing_optional_columns_are_null() {
        let df = DataFrame::new(vec![
            Column::from(Series::new("PATIENT_ID".into(), vec![Some("P1"), Some("P2")])),
            Column::from(Series::new(
                "date_of_birth".into(),
                vec![Some("1990-01-01"), None],
            )),
            Column::from(Series::new("email".into(), vec![Some(" a@b.org "), Some("")])),
        ])
        .unwrap();
        let table = SeedTable::from_frame(Source::Patients, df);

        let rows = raw_patients(&table);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].patient_id.as_deref(), Some("P1"));
        assert_eq!(rows[0].email.as_deref(), Some("a@b.org"));
        assert_eq!(rows[1].date_of_birth, None);
        assert_eq!(rows[1].email, None);
        assert_eq!(rows[0].phone, None);
    }
}
