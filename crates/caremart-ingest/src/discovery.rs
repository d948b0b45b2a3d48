//! Seed file discovery.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use caremart_model::Source;

use crate::error::{IngestError, Result};

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        // Check for .csv extension (case-insensitive)
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Match the seed files in a directory to their sources.
///
/// File names are matched case-insensitively (`Patients.CSV` is accepted).
/// Sources without a file are absent from the map; unrelated CSV files are
/// ignored.
pub fn discover_seed_files(dir: &Path) -> Result<BTreeMap<Source, PathBuf>> {
    let mut discovered = BTreeMap::new();
    for path in list_csv_files(dir)? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let matched = Source::ALL
            .into_iter()
            .find(|source| source.file_name().eq_ignore_ascii_case(name));
        match matched {
            Some(source) => {
                discovered.entry(source).or_insert(path);
            }
            None => {
                tracing::debug!(file = %name, "ignoring non-seed CSV file");
            }
        }
    }
    Ok(discovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            let path = dir.path().join(name);
            std::fs::write(&path, "header\ndata").unwrap();
        }
        dir
    }

    #[test]
    fn test_list_csv_files() {
        let dir = create_test_dir(&["visits.csv", "lab_results.csv", "README.md"]);
        let files = list_csv_files(dir.path()).unwrap();

        assert_eq!(files.len(), 2);
        // Sorted by filename
        assert!(files[0].ends_with("lab_results.csv"));
    }

    #[test]
    fn test_list_csv_files_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("test.csv");
        std::fs::write(&file_path, "data").unwrap();

        let result = list_csv_files(&file_path);
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_discover_seed_files() {
        let dir = create_test_dir(&["Patients.CSV", "visits.csv", "notes.csv"]);
        let seeds = discover_seed_files(dir.path()).unwrap();

        assert_eq!(seeds.len(), 2);
        assert!(seeds.contains_key(&Source::Patients));
        assert!(seeds.contains_key(&Source::Visits));
        assert!(!seeds.contains_key(&Source::LabResults));
    }
}
