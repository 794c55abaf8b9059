//! Extractor module for turning one URL into one book record
//!
//! This module contains the per-page work of a run:
//! - HTTP fetching with a fixed timeout and browser User-Agent
//! - HTML parsing and field lookup by CSS selector
//! - Converting the outcome into a [`BookRecord`]
//!
//! Failures never escape this module as errors. A page that cannot be fetched
//! or decoded becomes a record with `has_error` set, so the caller can keep
//! going.

mod fetcher;
mod parser;

pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use parser::{normalize_whitespace, parse_book, BookSelectors, ParsedBook};

use reqwest::Client;
use std::fmt;

/// Status written for a successfully extracted page
pub const STATUS_SUCCESS: &str = "Success";

/// Class of a failed extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The page could not be fetched (bad URL, timeout, connection, status)
    Request,
    /// The page was fetched but its document could not be read
    Parse,
}

impl FailureKind {
    /// Prefix used for this failure class in the status column
    pub fn label(&self) -> &'static str {
        match self {
            Self::Request => "Request error",
            Self::Parse => "Parse error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of extracting one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Success { author: String, title: String },
    Failure { kind: FailureKind, message: String },
}

/// Per-URL result, written exactly once to the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub url: String,
    pub author: String,
    pub title: String,
    /// Human-readable outcome, `"Success"` or `"<kind>: <message>"`
    pub status: String,
    pub has_error: bool,
}

impl BookRecord {
    /// Builds the record for `url` from an extraction outcome
    pub fn from_extraction(url: &str, extraction: Extraction) -> Self {
        match extraction {
            Extraction::Success { author, title } => Self {
                url: url.to_string(),
                author,
                title,
                status: STATUS_SUCCESS.to_string(),
                has_error: false,
            },
            Extraction::Failure { kind, message } => Self {
                url: url.to_string(),
                author: String::new(),
                title: String::new(),
                status: format!("{}: {}", kind, message),
                has_error: true,
            },
        }
    }

    /// Failure class encoded in the status column, if any
    pub fn failure_kind(&self) -> Option<FailureKind> {
        [FailureKind::Request, FailureKind::Parse]
            .into_iter()
            .find(|kind| self.status.starts_with(kind.label()))
    }
}

/// Fetches and parses one page
pub async fn extract(client: &Client, url: &str, selectors: &BookSelectors) -> Extraction {
    match fetch_page(client, url).await {
        FetchResult::Success { body, .. } => {
            let book = parse_book(&body, selectors);
            Extraction::Success {
                author: book.author,
                title: book.title,
            }
        }
        FetchResult::Undecodable { error, .. } => {
            tracing::debug!("Could not parse {}: {}", url, error);
            Extraction::Failure {
                kind: FailureKind::Parse,
                message: error,
            }
        }
        FetchResult::RequestFailed { error } => {
            tracing::debug!("Request failed for {}: {}", url, error);
            Extraction::Failure {
                kind: FailureKind::Request,
                message: error,
            }
        }
    }
}

/// Fetches and parses one page into its [`BookRecord`]
pub async fn extract_book(client: &Client, url: &str, selectors: &BookSelectors) -> BookRecord {
    BookRecord::from_extraction(url, extract(client, url, selectors).await)
}
