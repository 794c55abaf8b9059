use crate::sitemap::fingerprint;
use crate::storage::traits::{ProgressStore, StorageResult};
use crate::storage::{now_timestamp, remove_if_exists, write_atomic, ProgressCheckpoint};
use std::path::{Path, PathBuf};

/// Checkpoint stored as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonProgressStore {
    fn save(
        &self,
        current_index: usize,
        total_urls: usize,
        source_path: &Path,
    ) -> StorageResult<ProgressCheckpoint> {
        let checkpoint = ProgressCheckpoint {
            current_index: current_index.min(total_urls),
            total_urls,
            source_path: source_path.to_string_lossy().into_owned(),
            timestamp: now_timestamp(),
            sitemap_sha256: fingerprint(source_path),
        };

        let json = serde_json::to_vec_pretty(&checkpoint)?;
        write_atomic(&self.path, &json)?;

        tracing::debug!(
            "Saved checkpoint {}/{} to {}",
            checkpoint.current_index,
            checkpoint.total_urls,
            self.path.display()
        );
        Ok(checkpoint)
    }

    fn load(&self) -> Option<ProgressCheckpoint> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable checkpoint {}: {}", self.path.display(), e);
                return None;
            }
        };

        let checkpoint: ProgressCheckpoint = match serde_json::from_str(&content) {
            Ok(checkpoint) => checkpoint,
            Err(e) => {
                tracing::warn!("Ignoring corrupt checkpoint {}: {}", self.path.display(), e);
                return None;
            }
        };

        if !checkpoint.is_consistent() {
            tracing::warn!(
                "Ignoring inconsistent checkpoint {} (index {} of {})",
                self.path.display(),
                checkpoint.current_index,
                checkpoint.total_urls
            );
            return None;
        }

        Some(checkpoint)
    }

    fn clear(&self) -> StorageResult<()> {
        remove_if_exists(&self.path)?;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}
