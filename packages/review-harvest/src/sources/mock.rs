//! Mock submission source for testing.
//!
//! Serves a fixed list of submissions in offset/limit slices and can be told
//! to fail a number of times at a given offset before succeeding.

use async_trait::async_trait;
use openreview_client::Note;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{SourceError, SourceResult};
use crate::traits::source::SubmissionSource;

/// Record of one `fetch_page` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCall {
    pub venue_id: String,
    pub offset: usize,
    pub limit: usize,
    pub succeeded: bool,
}

/// Mock source for testing.
///
/// # Example
///
/// ```rust
/// use review_harvest::sources::MockSubmissionSource;
///
/// let mock = MockSubmissionSource::with_submission_count(1217).fail_at(500, 2);
/// // Pages at offset 500 fail twice, then succeed.
/// ```
#[derive(Default, Clone)]
pub struct MockSubmissionSource {
    submissions: Arc<RwLock<Vec<Note>>>,
    /// Remaining failures keyed by offset
    failures: Arc<RwLock<HashMap<usize, u32>>>,
    calls: Arc<RwLock<Vec<SourceCall>>>,
}

impl MockSubmissionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these submissions, in order.
    pub fn with_submissions(self, submissions: Vec<Note>) -> Self {
        *self.submissions.write().unwrap() = submissions;
        self
    }

    /// Serve `count` generated submissions numbered from 1.
    pub fn with_submission_count(count: usize) -> Self {
        let submissions = (0..count)
            .map(|i| Note::new(format!("note-{}", i)).with_number(i as i64 + 1))
            .collect();
        Self::new().with_submissions(submissions)
    }

    /// Fail the next `times` requests at `offset`.
    pub fn fail_at(self, offset: usize, times: u32) -> Self {
        self.failures.write().unwrap().insert(offset, times);
        self
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Offsets requested, in call order.
    pub fn requested_offsets(&self) -> Vec<usize> {
        self.calls.read().unwrap().iter().map(|c| c.offset).collect()
    }

    fn take_failure(&self, offset: usize) -> bool {
        let mut failures = self.failures.write().unwrap();
        match failures.get_mut(&offset) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl SubmissionSource for MockSubmissionSource {
    async fn fetch_page(
        &self,
        venue_id: &str,
        offset: usize,
        limit: usize,
    ) -> SourceResult<Vec<Note>> {
        let failed = self.take_failure(offset);
        self.calls.write().unwrap().push(SourceCall {
            venue_id: venue_id.to_string(),
            offset,
            limit,
            succeeded: !failed,
        });

        if failed {
            return Err(SourceError::Simulated(format!(
                "scripted failure at offset {}",
                offset
            )));
        }

        let submissions = self.submissions.read().unwrap();
        let start = offset.min(submissions.len());
        let end = offset.saturating_add(limit).min(submissions.len());
        Ok(submissions[start..end].to_vec())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_slices() {
        let mock = MockSubmissionSource::with_submission_count(7);

        let first = mock.fetch_page("v", 0, 5).await.unwrap();
        let second = mock.fetch_page("v", 5, 5).await.unwrap();
        let past_end = mock.fetch_page("v", 10, 5).await.unwrap();

        assert_eq!(first.len(), 5);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].number, Some(6));
        assert!(past_end.is_empty());
        assert_eq!(mock.requested_offsets(), vec![0, 5, 10]);
    }

    #[tokio::test]
    async fn test_scripted_failures_are_consumed() {
        let mock = MockSubmissionSource::with_submission_count(3).fail_at(0, 1);

        assert!(mock.fetch_page("v", 0, 5).await.is_err());
        assert_eq!(mock.fetch_page("v", 0, 5).await.unwrap().len(), 3);

        let calls = mock.calls();
        assert!(!calls[0].succeeded);
        assert!(calls[1].succeeded);
    }
}
