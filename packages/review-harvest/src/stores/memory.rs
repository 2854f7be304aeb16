//! In-memory checkpoint store.

use async_trait::async_trait;
use openreview_client::Note;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{HarvestError, Result};
use crate::traits::checkpoint::CheckpointStore;

/// Keeps every snapshot it is handed, oldest first.
#[derive(Default, Clone)]
pub struct MemoryCheckpoint {
    snapshots: Arc<RwLock<Vec<Vec<Note>>>>,
    /// Saves still to be rejected
    failures: Arc<AtomicU32>,
    attempts: Arc<AtomicU32>,
}

impl MemoryCheckpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `times` saves with a checkpoint error.
    pub fn fail_saves(self, times: u32) -> Self {
        self.failures.store(times, Ordering::SeqCst);
        self
    }

    /// Number of snapshots stored.
    pub fn save_count(&self) -> usize {
        self.snapshots.read().unwrap().len()
    }

    /// Number of `save` calls, rejected ones included.
    pub fn save_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Sizes of each saved snapshot, in save order.
    pub fn snapshot_sizes(&self) -> Vec<usize> {
        self.snapshots.read().unwrap().iter().map(Vec::len).collect()
    }

    /// Most recent snapshot.
    pub fn latest(&self) -> Option<Vec<Note>> {
        self.snapshots.read().unwrap().last().cloned()
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpoint {
    async fn save(&self, submissions: &[Note]) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let rejected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(HarvestError::Checkpoint(
                std::io::Error::other("simulated write failure").into(),
            ));
        }

        self.snapshots.write().unwrap().push(submissions.to_vec());
        Ok(())
    }
}
