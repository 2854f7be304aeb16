//! Paginated fetch with unbounded retry.
//!
//! Pages are requested strictly in order. A failed page is retried at the
//! same offset until it succeeds, so no page is ever skipped.

use openreview_client::Note;
use tracing::{info, warn};

use crate::config::FetchConfig;
use crate::traits::{checkpoint::CheckpointStore, source::SubmissionSource};

/// Fetch every submission of `venue_id` from `source`.
///
/// After each successful non-empty page the full accumulator is written to
/// `checkpoint` (when given). Stops on an empty page or on a page shorter
/// than `config.page_size`.
///
/// Never fails. Source errors and checkpoint write errors are both retried
/// forever following `config.backoff`. A failed write is retried with the
/// same accumulator; the page is not requested again.
pub async fn fetch_all_submissions<S>(
    source: &S,
    venue_id: &str,
    config: &FetchConfig,
    checkpoint: Option<&dyn CheckpointStore>,
) -> Vec<Note>
where
    S: SubmissionSource + ?Sized,
{
    let page_size = config.page_size.max(1);
    let mut submissions: Vec<Note> = Vec::new();
    let mut offset = 0usize;

    info!(venue_id, source = source.name(), page_size, "Fetching submissions");

    loop {
        let page = fetch_page_with_retry(source, venue_id, offset, page_size, config).await;

        if page.is_empty() {
            info!(total = submissions.len(), "Empty page, fetch complete");
            return submissions;
        }

        let returned = page.len();
        submissions.extend(page);
        info!(offset, returned, total = submissions.len(), "Fetched page");

        if let Some(store) = checkpoint {
            save_with_retry(store, &submissions, config).await;
        }

        if returned < page_size {
            info!(total = submissions.len(), "Reached end of submissions");
            return submissions;
        }

        offset += page_size;
        if !config.page_delay.is_zero() {
            tokio::time::sleep(config.page_delay).await;
        }
    }
}

/// Request one page until it succeeds.
async fn fetch_page_with_retry<S>(
    source: &S,
    venue_id: &str,
    offset: usize,
    limit: usize,
    config: &FetchConfig,
) -> Vec<Note>
where
    S: SubmissionSource + ?Sized,
{
    let mut attempt: u32 = 0;
    loop {
        match source.fetch_page(venue_id, offset, limit).await {
            Ok(page) => return page,
            Err(e) => {
                attempt = attempt.saturating_add(1);
                let wait = config.backoff.delay_for(attempt);
                warn!(
                    offset,
                    attempt,
                    wait_secs = wait.as_secs_f64(),
                    error = %e,
                    "Page fetch failed, retrying"
                );
                if !wait.is_zero() {
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

/// Write the accumulator until the store accepts it.
async fn save_with_retry(
    store: &dyn CheckpointStore,
    submissions: &[Note],
    config: &FetchConfig,
) {
    let mut attempt: u32 = 0;
    while let Err(e) = store.save(submissions).await {
        attempt = attempt.saturating_add(1);
        let wait = config.backoff.delay_for(attempt);
        warn!(
            total = submissions.len(),
            attempt,
            wait_secs = wait.as_secs_f64(),
            error = %e,
            "Checkpoint write failed, retrying"
        );
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackoffSchedule;
    use crate::sources::MockSubmissionSource;
    use crate::stores::MemoryCheckpoint;
    use std::time::Duration;

    fn fast_config(page_size: usize) -> FetchConfig {
        FetchConfig::new()
            .with_page_size(page_size)
            .with_page_delay(Duration::ZERO)
            .with_backoff(BackoffSchedule::immediate())
    }

    #[tokio::test]
    async fn test_short_last_page_terminates() {
        let source = MockSubmissionSource::with_submission_count(1217);
        let checkpoint = MemoryCheckpoint::new();

        let all = fetch_all_submissions(&source, "V", &fast_config(500), Some(&checkpoint)).await;

        assert_eq!(all.len(), 1217);
        assert_eq!(source.requested_offsets(), vec![0, 500, 1000]);
        assert_eq!(checkpoint.snapshot_sizes(), vec![500, 1000, 1217]);
    }

    #[tokio::test]
    async fn test_exact_multiple_needs_trailing_empty_page() {
        let source = MockSubmissionSource::with_submission_count(10);
        let checkpoint = MemoryCheckpoint::new();

        let all = fetch_all_submissions(&source, "V", &fast_config(5), Some(&checkpoint)).await;

        assert_eq!(all.len(), 10);
        assert_eq!(source.requested_offsets(), vec![0, 5, 10]);
        // The empty page is not checkpointed.
        assert_eq!(checkpoint.save_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let source = MockSubmissionSource::new();

        let all = fetch_all_submissions(&source, "V", &fast_config(5), None).await;

        assert!(all.is_empty());
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_page_is_retried_at_same_offset() {
        let source = MockSubmissionSource::with_submission_count(12).fail_at(5, 3);

        let all = fetch_all_submissions(&source, "V", &fast_config(5), None).await;

        assert_eq!(all.len(), 12);
        assert_eq!(source.requested_offsets(), vec![0, 5, 5, 5, 5, 10]);
        let numbers: Vec<_> = all.iter().filter_map(|n| n.number).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_limit_and_venue_are_forwarded() {
        let source = MockSubmissionSource::with_submission_count(3);

        fetch_all_submissions(&source, "ICLR.cc/2025/Conference", &fast_config(50), None).await;

        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].venue_id, "ICLR.cc/2025/Conference");
        assert_eq!(calls[0].limit, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_schedule_is_followed() {
        let source = MockSubmissionSource::with_submission_count(3).fail_at(0, 4);
        let config = FetchConfig::new()
            .with_page_size(5)
            .with_page_delay(Duration::ZERO);

        let start = tokio::time::Instant::now();
        let all = fetch_all_submissions(&source, "V", &config, None).await;

        assert_eq!(all.len(), 3);
        assert_eq!(source.call_count(), 5);
        // 60 + 120 + 300 + 300 seconds of virtual time
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(780), "{:?}", elapsed);
        assert!(elapsed < Duration::from_secs(781), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_delay_between_full_pages() {
        let source = MockSubmissionSource::with_submission_count(12);
        let config = FetchConfig::new()
            .with_page_size(5)
            .with_page_delay(Duration::from_secs(5))
            .with_backoff(BackoffSchedule::immediate());

        let start = tokio::time::Instant::now();
        fetch_all_submissions(&source, "V", &config, None).await;

        // Two full pages, each followed by a pause; the short page ends it.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10), "{:?}", elapsed);
        assert!(elapsed < Duration::from_secs(11), "{:?}", elapsed);
    }

    #[tokio::test]
    async fn test_failed_checkpoint_write_is_retried_without_refetch() {
        let source = MockSubmissionSource::with_submission_count(12);
        let checkpoint = MemoryCheckpoint::new().fail_saves(1);

        let all = fetch_all_submissions(&source, "V", &fast_config(5), Some(&checkpoint)).await;

        assert_eq!(all.len(), 12);
        assert_eq!(source.requested_offsets(), vec![0, 5, 10]);
        assert_eq!(checkpoint.save_attempts(), 4);
        assert_eq!(checkpoint.snapshot_sizes(), vec![5, 10, 12]);
        assert_eq!(checkpoint.latest(), Some(all));
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkpoint_retry_follows_backoff() {
        let source = MockSubmissionSource::with_submission_count(3);
        let checkpoint = MemoryCheckpoint::new().fail_saves(2);
        let config = FetchConfig::new()
            .with_page_size(5)
            .with_page_delay(Duration::ZERO);

        let start = tokio::time::Instant::now();
        fetch_all_submissions(&source, "V", &config, Some(&checkpoint)).await;

        assert_eq!(source.call_count(), 1);
        assert_eq!(checkpoint.save_attempts(), 3);
        assert_eq!(checkpoint.save_count(), 1);
        // 60 + 120 seconds of virtual time
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(180), "{:?}", elapsed);
        assert!(elapsed < Duration::from_secs(181), "{:?}", elapsed);
    }
}
