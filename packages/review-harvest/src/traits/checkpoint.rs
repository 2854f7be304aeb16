//! Durable snapshot of fetched-so-far submissions.

use async_trait::async_trait;
use openreview_client::Note;

use crate::error::Result;

/// Storage for the fetch accumulator.
///
/// Every `save` replaces the previous snapshot entirely. Snapshots are read
/// back with [`load_submissions`](crate::stores::load_submissions), not
/// through this trait.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn save(&self, submissions: &[Note]) -> Result<()>;
}
