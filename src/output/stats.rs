//! Run statistics
//!
//! Counters for a single pass plus a summary read back from the files on disk
//! for the `--stats` mode.

use crate::extractor::{BookRecord, STATUS_SUCCESS};
use crate::output::{CsvOutput, ErrorLog, OutputResult};
use std::collections::HashSet;

/// Counters for one processing or retry pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Number of URLs attempted in this pass
    pub processed: usize,
    /// Number of URLs that produced a successful record
    pub succeeded: usize,
    /// Number of URLs that produced a failure record
    pub failed: usize,
}

impl RunStats {
    /// Counts one record
    pub fn record(&mut self, record: &BookRecord) {
        self.processed += 1;
        if record.has_error {
            self.failed += 1;
        } else {
            self.succeeded += 1;
        }
    }
}

/// Prints the end-of-pass summary
///
/// `planned` is the number of URLs the pass set out to process.
pub fn print_run_summary(heading: &str, stats: &RunStats, planned: usize) {
    println!("\n=== {} ===\n", heading);
    println!("  Succeeded: {}/{}", stats.succeeded, planned);
    println!("  Failed:    {}/{}", stats.failed, planned);
    if stats.processed < planned {
        println!("  Not reached: {}", planned - stats.processed);
    }
}

/// Summary of the result files on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputStatistics {
    /// Data rows in the CSV file
    pub total_rows: usize,
    /// Rows with a success status
    pub succeeded_rows: usize,
    /// Rows with a failure status
    pub failed_rows: usize,
    /// Distinct URLs in the CSV file (retries add duplicate rows)
    pub unique_urls: usize,
    /// URLs currently in the failure log
    pub pending_failures: usize,
}

/// Loads statistics from the result files
pub fn load_statistics(csv: &CsvOutput, errors: &ErrorLog) -> OutputResult<OutputStatistics> {
    let rows = csv.read_rows()?;

    let succeeded_rows = rows.iter().filter(|row| row.status == STATUS_SUCCESS).count();
    let unique_urls = rows
        .iter()
        .map(|row| row.url.as_str())
        .collect::<HashSet<_>>()
        .len();

    Ok(OutputStatistics {
        total_rows: rows.len(),
        succeeded_rows,
        failed_rows: rows.len() - succeeded_rows,
        unique_urls,
        pending_failures: errors.entries()?.len(),
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &OutputStatistics) {
    println!("=== Scrape Statistics ===\n");

    println!("Results:");
    println!("  Rows: {}", stats.total_rows);
    println!("  Distinct URLs: {}", stats.unique_urls);
    println!("  Successful rows: {}", stats.succeeded_rows);
    println!("  Failed rows: {}", stats.failed_rows);
    println!();

    println!("Failure log:");
    println!("  URLs awaiting retry: {}", stats.pending_failures);
    println!();

    let success_rate = if stats.total_rows > 0 {
        (stats.succeeded_rows as f64 / stats.total_rows as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} rows)",
        success_rate, stats.succeeded_rows, stats.total_rows
    );
}
