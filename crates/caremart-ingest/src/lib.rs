//! Seed ingestion for the caremart pipeline.
//!
//! This crate discovers the seed files of a project (`patients.csv`,
//! `visits.csv`, `lab_results.csv`), loads them into Polars DataFrames with
//! every column as text, checksums them, and verifies that the key columns
//! the staging layer filters on are present.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use caremart_ingest::load_seed_dir;
//!
//! let seeds = load_seed_dir(Path::new("seeds"))?;
//! println!("{} patients", seeds.patients.row_count());
//! ```

mod csv;
mod discovery;
mod error;
mod hash;
mod seed;
mod values;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{CsvHeaders, read_csv_schema, read_csv_table};

// === File Discovery ===
pub use discovery::{discover_seed_files, list_csv_files};

// === Seeds ===
pub use seed::{SeedSet, SeedTable, load_seed, load_seed_dir};

// === Values ===
pub use hash::sha256_hex;
pub use values::{
    ColumnLookup, any_to_string, any_to_string_non_empty, format_numeric, text_column,
};
