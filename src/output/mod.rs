//! Output module for recording scrape results
//!
//! This module handles:
//! - The CSV results file (every processed page, in processing order)
//! - The failure log (the retry set)
//! - Run statistics and summaries

mod csv_output;
mod error_log;
pub mod stats;

pub use csv_output::{CsvOutput, CsvRow, CSV_HEADER};
pub use error_log::{ErrorLog, ErrorLogEntry};
pub use stats::{load_statistics, print_run_summary, print_statistics, OutputStatistics, RunStats};

use crate::config::OutputConfig;
use crate::extractor::BookRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Routes each record to the CSV file and, on failure, to the failure log
#[derive(Debug, Clone)]
pub struct ResultSink {
    csv: CsvOutput,
    errors: ErrorLog,
}

impl ResultSink {
    pub fn new(csv: CsvOutput, errors: ErrorLog) -> Self {
        Self { csv, errors }
    }

    /// Builds the sink from the configured paths
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(
            CsvOutput::new(&config.csv_path),
            ErrorLog::new(&config.error_log_path),
        )
    }

    pub fn csv(&self) -> &CsvOutput {
        &self.csv
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    /// Writes one processed record
    ///
    /// Every record gets a CSV row; only failures reach the failure log.
    pub fn record(&self, record: &BookRecord, is_first: bool) -> OutputResult<()> {
        self.csv.write(record, is_first)?;
        if record.has_error {
            self.errors.append(&record.url, &record.status)?;
        }
        Ok(())
    }
}
