//! CSV results file
//!
//! One row per processed page with the fixed columns `url,author,title,status`.

use crate::extractor::BookRecord;
use crate::output::OutputResult;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Header row of the results file
pub const CSV_HEADER: [&str; 4] = ["url", "author", "title", "status"];

/// Serialized shape of one CSV row
///
/// Field order defines the column order and the header names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    pub url: String,
    pub author: String,
    pub title: String,
    pub status: String,
}

impl From<&BookRecord> for CsvRow {
    fn from(record: &BookRecord) -> Self {
        Self {
            url: record.url.clone(),
            author: record.author.clone(),
            title: record.title.clone(),
            status: record.status.clone(),
        }
    }
}

/// Writer for the CSV results file
#[derive(Debug, Clone)]
pub struct CsvOutput {
    path: PathBuf,
}

impl CsvOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the results file is already on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Writes one record
    ///
    /// With `is_first` the file is truncated and the header row is written
    /// before the record. Otherwise the row is appended, creating the file
    /// without a header if it does not exist yet.
    pub fn write(&self, record: &BookRecord, is_first: bool) -> OutputResult<()> {
        let file = if is_first {
            File::create(&self.path)?
        } else {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_first)
            .from_writer(file);
        writer.serialize(CsvRow::from(record))?;
        writer.flush()?;
        Ok(())
    }

    /// Reads every row back, skipping the header
    pub fn read_rows(&self) -> OutputResult<Vec<CsvRow>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }
}
