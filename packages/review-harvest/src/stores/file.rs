//! JSON file checkpoint.
//!
//! The file holds the whole accumulator as a pretty-printed JSON array of
//! notes, the same document the extractor reads back.

use async_trait::async_trait;
use openreview_client::Note;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{HarvestError, Result};
use crate::traits::checkpoint::CheckpointStore;

/// Conventional checkpoint file name inside an output directory.
pub const CHECKPOINT_FILE_NAME: &str = "submissions_metadata.json";

/// Checkpoint persisted to a JSON file.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileCheckpoint {
    path: PathBuf,
}

impl JsonFileCheckpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Checkpoint at `<dir>/submissions_metadata.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CHECKPOINT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CheckpointStore for JsonFileCheckpoint {
    async fn save(&self, submissions: &[Note]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(submissions)
            .map_err(|e| HarvestError::Checkpoint(Box::new(e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| HarvestError::Checkpoint(Box::new(e)))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes)
            .await
            .map_err(|e| HarvestError::Checkpoint(Box::new(e)))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| HarvestError::Checkpoint(Box::new(e)))?;

        debug!(path = %self.path.display(), count = submissions.len(), "Checkpoint saved");
        Ok(())
    }
}

/// Read a metadata file written by the fetcher.
///
/// A missing file is reported as [`HarvestError::MissingInput`].
pub fn load_submissions(path: impl AsRef<Path>) -> Result<Vec<Note>> {
    let path = path.as_ref();
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(HarvestError::MissingInput {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(HarvestError::io(path, e)),
    };
    Ok(serde_json::from_slice(&bytes)?)
}
