//! Storage module for persisting run progress
//!
//! This module handles the resumable checkpoint of a run:
//! - The checkpoint record and its invariants
//! - The [`ProgressStore`] interface used by the run controller
//! - A JSON file implementation
//! - Small file helpers shared with the output module

mod progress;
mod traits;

pub use progress::JsonProgressStore;
pub use traits::{ProgressStore, StorageError, StorageResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resumable position of a run
///
/// `current_index` counts the leading URLs that were fully processed, so a
/// resume starts at 1-based position `current_index + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressCheckpoint {
    pub current_index: usize,
    pub total_urls: usize,
    #[serde(rename = "xml_file")]
    pub source_path: String,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitemap_sha256: Option<String>,
}

impl ProgressCheckpoint {
    /// 1-based position a resumed run starts at
    pub fn resume_position(&self) -> usize {
        self.current_index + 1
    }

    /// Checks `0 <= current_index <= total_urls` and a usable timestamp
    pub fn is_consistent(&self) -> bool {
        self.current_index <= self.total_urls && self.timestamp.is_finite()
    }

    /// Sitemap file the checkpoint refers to
    pub fn source(&self) -> PathBuf {
        PathBuf::from(&self.source_path)
    }

    /// Wall-clock time the checkpoint was written
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.timestamp.floor();
        let nanos = ((self.timestamp - secs) * 1e9) as u32;
        DateTime::from_timestamp(secs as i64, nanos)
    }
}

/// Current wall-clock time as float seconds since the Unix epoch
pub fn now_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Replaces `path` with `contents` through a sibling temporary file
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)
}

/// Removes a file, treating a missing file as success
pub(crate) fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
