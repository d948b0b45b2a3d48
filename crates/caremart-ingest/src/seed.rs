//! Seed tables: one raw relation per source.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{debug, info};

use caremart_model::{SeedEntry, Source};

use crate::csv::{CsvHeaders, read_csv_table};
use crate::discovery::discover_seed_files;
use crate::error::{IngestError, Result};
use crate::hash::sha256_hex;
use crate::values::{ColumnLookup, text_column};

/// A loaded seed file.
#[derive(Debug, Clone)]
pub struct SeedTable {
    pub source: Source,
    pub path: PathBuf,
    pub data: DataFrame,
    pub headers: CsvHeaders,
    /// SHA-256 of the file bytes.
    pub sha256: String,
}

impl SeedTable {
    /// Wrap an in-memory frame (no backing file).
    pub fn from_frame(source: Source, data: DataFrame) -> Self {
        let headers = CsvHeaders::new(
            data.get_column_names()
                .into_iter()
                .map(|name| name.to_string())
                .collect(),
        );
        Self {
            source,
            path: PathBuf::from(source.file_name()),
            data,
            headers,
            sha256: String::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.data.height()
    }

    /// Trimmed text values of a column; all-`None` when the column is absent.
    pub fn text_column(&self, name: &str) -> Vec<Option<String>> {
        text_column(&self.data, name).unwrap_or_else(|| vec![None; self.data.height()])
    }

    /// Columns the staging layer reads that the file does not provide.
    pub fn missing_columns(&self) -> Vec<&'static str> {
        let lookup = ColumnLookup::from_frame(&self.data);
        self.source
            .columns()
            .iter()
            .copied()
            .filter(|column| !lookup.contains(column))
            .collect()
    }

    /// Fail when a key column is absent.
    pub fn ensure_key_columns(&self) -> Result<()> {
        let lookup = ColumnLookup::from_frame(&self.data);
        for column in self.source.key_columns() {
            if !lookup.contains(column) {
                return Err(IngestError::MissingColumn {
                    column: (*column).to_string(),
                    path: self.path.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn entry(&self) -> SeedEntry {
        SeedEntry {
            source: self.source,
            path: self.path.clone(),
            sha256: self.sha256.clone(),
            rows: self.row_count(),
            columns: self.headers.columns.clone(),
        }
    }
}

/// Load one seed file and check its key columns.
pub fn load_seed(source: Source, path: &Path) -> Result<SeedTable> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let sha256 = sha256_hex(&bytes);
    let (data, headers) = read_csv_table(path)?;
    let table = SeedTable {
        source,
        path: path.to_path_buf(),
        data,
        headers,
        sha256,
    };
    table.ensure_key_columns()?;
    let missing = table.missing_columns();
    if !missing.is_empty() {
        debug!(
            source = %source,
            missing = ?missing,
            "seed lacks optional columns; they will be null"
        );
    }
    Ok(table)
}

/// The three raw relations.
#[derive(Debug, Clone)]
pub struct SeedSet {
    pub patients: SeedTable,
    pub visits: SeedTable,
    pub lab_results: SeedTable,
}

impl SeedSet {
    pub fn get(&self, source: Source) -> &SeedTable {
        match source {
            Source::Patients => &self.patients,
            Source::Visits => &self.visits,
            Source::LabResults => &self.lab_results,
        }
    }

    pub fn tables(&self) -> [&SeedTable; 3] {
        [&self.patients, &self.visits, &self.lab_results]
    }

    pub fn entries(&self) -> Vec<SeedEntry> {
        self.tables().iter().map(|table| table.entry()).collect()
    }
}

/// Load all seed files from a directory.
pub fn load_seed_dir(dir: &Path) -> Result<SeedSet> {
    let discovered = discover_seed_files(dir)?;
    let load = |source: Source| -> Result<SeedTable> {
        let path = discovered
            .get(&source)
            .cloned()
            .ok_or_else(|| IngestError::FileNotFound {
                path: dir.join(source.file_name()),
            })?;
        let table = load_seed(source, &path)?;
        info!(
            source = %source,
            rows = table.row_count(),
            columns = table.headers.len(),
            "seed loaded"
        );
        Ok(table)
    };
    Ok(SeedSet {
        patients: load(Source::Patients)?,
        visits: load(Source::Visits)?,
        lab_results: load(Source::LabResults)?,
    })
}
