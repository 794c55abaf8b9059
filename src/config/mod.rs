//! Configuration module for Shelfscrape
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so running without a file is
//! equivalent to loading an empty one.
//!
//! # Example
//!
//! ```no_run
//! use shelfscrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("shelfscrape.toml")).unwrap();
//! println!("Results go to: {}", config.output.csv_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, InputConfig, OutputConfig, ScraperConfig, SelectorConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
pub(crate) use validation::check_selector;
