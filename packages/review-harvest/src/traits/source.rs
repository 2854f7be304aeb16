//! Source trait for paged submission listings.

use async_trait::async_trait;
use openreview_client::Note;

use crate::error::SourceResult;

/// A remote listing of submissions that can be read one page at a time.
///
/// Implementations make a single attempt per call. Retrying is the
/// fetcher's job.
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    /// Fetch up to `limit` submissions of `venue_id` starting at `offset`.
    async fn fetch_page(
        &self,
        venue_id: &str,
        offset: usize,
        limit: usize,
    ) -> SourceResult<Vec<Note>>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
