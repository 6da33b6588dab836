//! CSV export
//!
//! Each account's harvest lands in its own file, named from the handle and
//! the current local calendar date. Rows are written in the exact order the
//! harvester produced them and are never reordered here.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::error::ExportError;
use crate::types::{Account, HarvestResult};

/// Hands one account's finished result to persistent storage.
pub trait Exporter: Send + Sync {
    /// Write the result and return the path it landed at.
    fn export(&self, account: &Account, result: &HarvestResult) -> Result<PathBuf, ExportError>;
}

/// Deterministic export file name: `{handle}_{MonDDYYYY}.csv`.
pub fn export_file_name(handle: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", handle, date.format("%b%d%Y"))
}

/// Exporter writing `created_at,text` rows into a per-account dated file.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Exporter for CsvExporter {
    fn export(&self, account: &Account, result: &HarvestResult) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let file_name = export_file_name(&account.handle, Local::now().date_naive());
        let path = self.output_dir.join(file_name);

        let mut writer = csv::Writer::from_path(&path)?;
        for record in &result.records {
            writer.write_record([record.created_at.as_str(), record.text.as_str()])?;
        }
        writer.flush().map_err(ExportError::Io)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TweetRecord;
    use tempfile::TempDir;

    fn sample_result() -> HarvestResult {
        HarvestResult {
            handle: "alice".to_string(),
            records: vec![
                TweetRecord {
                    id: 3,
                    created_at: "Wed Mar 01 10:00:00 +0000 2023".to_string(),
                    text: "newest".to_string(),
                },
                TweetRecord {
                    id: 2,
                    created_at: "Tue Feb 28 10:00:00 +0000 2023".to_string(),
                    text: "older".to_string(),
                },
            ],
        }
    }

    #[test]
    fn file_name_uses_local_calendar_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        assert_eq!(export_file_name("alice", date), "alice_Aug232026.csv");

        let padded = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert_eq!(export_file_name("bob", padded), "bob_Jan022026.csv");
    }

    #[test]
    fn writes_rows_in_record_order() {
        let dir = TempDir::new().unwrap();
        let exporter = CsvExporter::new(dir.path());
        let account = Account::new("alice");

        let path = exporter.export(&account, &sample_result()).unwrap();
        assert!(path.exists());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], "newest");
        assert_eq!(rows[1][1], "older");
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("out").join("deep");
        let exporter = CsvExporter::new(&nested);

        exporter
            .export(&Account::new("alice"), &sample_result())
            .unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn unwritable_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, "not a directory").unwrap();

        let exporter = CsvExporter::new(&blocker);
        let result = exporter.export(&Account::new("alice"), &sample_result());
        assert!(result.is_err());
    }

    #[test]
    fn empty_result_produces_empty_file() {
        let dir = TempDir::new().unwrap();
        let exporter = CsvExporter::new(dir.path());
        let result = HarvestResult {
            handle: "quiet".to_string(),
            records: Vec::new(),
        };

        let path = exporter.export(&Account::new("quiet"), &result).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.is_empty());
    }
}
