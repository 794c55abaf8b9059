//! Shelfscrape: a resumable book-metadata scraper
//!
//! This crate walks the URLs listed in a sitemap, extracts the author and title
//! of each book page, and writes the results to a CSV file. Failures are logged
//! separately so they can be retried, and progress is checkpointed so an
//! interrupted run can pick up where it stopped.

pub mod config;
pub mod extractor;
pub mod output;
pub mod runner;
pub mod sitemap;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Shelfscrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Operator prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Invalid run transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunPhase,
        to: state::RunPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid CSS selector for {field}: {message}")]
    InvalidSelector { field: &'static str, message: String },
}

/// Result type alias for Shelfscrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extractor::{BookRecord, Extraction, FailureKind};
pub use runner::{RunController, RunOutcome};
pub use state::RunPhase;
pub use storage::ProgressCheckpoint;
