//! CSV reading utilities.

mod header;
mod reader;

pub use header::{CsvHeaders, normalize_header, parse_csv_line};
pub use reader::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, read_csv_schema,
    read_csv_table, validate_encoding,
};
