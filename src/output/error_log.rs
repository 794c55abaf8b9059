//! Failure log
//!
//! A plain-text file with one `<url> | <message>` line per failing URL. The
//! URLs in this file are the retry set.

use crate::output::OutputResult;
use crate::storage::{remove_if_exists, write_atomic};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One line of the failure log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLogEntry {
    pub url: String,
    pub message: String,
}

impl ErrorLogEntry {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Formats the entry as a single log line, including the newline
    fn to_line(&self) -> String {
        format!("{} | {}\n", self.url, single_line(&self.message))
    }

    /// Parses a log line; the URL is everything before the first `|`
    fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (url, message) = line.split_once('|').unwrap_or((line, ""));
        let url = url.trim();
        if url.is_empty() {
            return None;
        }

        Some(Self::new(url, message.trim()))
    }
}

/// Keeps a message on one line so every failure is exactly one log line
fn single_line(message: &str) -> String {
    message.replace(['\r', '\n'], " ")
}

/// Append-only failure log
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Appends one failure
    pub fn append(&self, url: &str, message: &str) -> OutputResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(ErrorLogEntry::new(url, message).to_line().as_bytes())?;
        Ok(())
    }

    /// Reads all entries in file order; a missing log is empty
    pub fn entries(&self) -> OutputResult<Vec<ErrorLogEntry>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(content.lines().filter_map(ErrorLogEntry::parse_line).collect())
    }

    /// The retry set: URLs currently recorded as failed
    pub fn urls(&self) -> OutputResult<Vec<String>> {
        Ok(self.entries()?.into_iter().map(|entry| entry.url).collect())
    }

    /// Replaces the whole log with `entries`
    ///
    /// The new content is written to a temporary file and renamed into
    /// place. An empty list removes the log.
    pub fn rewrite(&self, entries: &[ErrorLogEntry]) -> OutputResult<()> {
        if entries.is_empty() {
            return self.clear();
        }

        let content: String = entries.iter().map(ErrorLogEntry::to_line).collect();
        write_atomic(&self.path, content.as_bytes())?;
        Ok(())
    }

    /// Removes the log; does nothing if it is absent
    pub fn clear(&self) -> OutputResult<()> {
        remove_if_exists(&self.path)?;
        Ok(())
    }
}
