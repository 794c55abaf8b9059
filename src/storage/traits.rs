//! Storage traits and error types
//!
//! This module defines the trait interface for checkpoint storage and the
//! associated error type.

use crate::storage::ProgressCheckpoint;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence for the single resumable checkpoint of a run
///
/// Only one checkpoint exists at a time; every save replaces the previous one.
pub trait ProgressStore {
    /// Persists a checkpoint stamped with the current time
    ///
    /// # Arguments
    ///
    /// * `current_index` - Number of leading URLs fully processed
    /// * `total_urls` - Number of URLs in the sitemap
    /// * `source_path` - Sitemap the positions refer to
    ///
    /// # Returns
    ///
    /// The checkpoint that was written
    fn save(
        &self,
        current_index: usize,
        total_urls: usize,
        source_path: &Path,
    ) -> StorageResult<ProgressCheckpoint>;

    /// Loads the checkpoint
    ///
    /// Absent, unreadable, or corrupt checkpoints all yield `None`; loading
    /// never fails a run.
    fn load(&self) -> Option<ProgressCheckpoint>;

    /// Removes the checkpoint; succeeds if there is none
    fn clear(&self) -> StorageResult<()>;

    /// Returns true if a checkpoint is stored, whether or not it is readable
    fn exists(&self) -> bool;
}
