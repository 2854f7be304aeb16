//! Submission source backed by the OpenReview API.

use async_trait::async_trait;
use openreview_client::{Note, OpenReviewClient};

use crate::error::SourceResult;
use crate::traits::source::SubmissionSource;

/// Reads submissions from `GET /notes` with replies inlined.
pub struct OpenReviewSource {
    client: OpenReviewClient,
}

impl OpenReviewSource {
    pub fn new(client: OpenReviewClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubmissionSource for OpenReviewSource {
    async fn fetch_page(
        &self,
        venue_id: &str,
        offset: usize,
        limit: usize,
    ) -> SourceResult<Vec<Note>> {
        Ok(self.client.submissions_page(venue_id, offset, limit).await?)
    }

    fn name(&self) -> &str {
        "openreview"
    }
}
