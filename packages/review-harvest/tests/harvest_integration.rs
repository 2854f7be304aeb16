//! Integration tests for the harvest pipeline.
//!
//! These tests drive the public API end to end:
//! 1. Fetch pages from a mock source (with scripted failures)
//! 2. Checkpoint to a JSON file
//! 3. Reload, detect decisions, extract rows
//! 4. Write and re-read the CSV table, then summarise

use async_trait::async_trait;
use openreview_client::{Note, Reply};
use review_harvest::{
    detect_decisions_available, extract_rows, fetch_all_submissions, load_submissions,
    read_rows_csv, write_rows_csv, BackoffSchedule, CheckpointStore, Conference, Decision,
    ExtractOptions, FetchConfig, HarvestError, JsonFileCheckpoint, MemoryCheckpoint,
    MockSubmissionSource, Summary, DEFAULT_DETECTION_SAMPLE, DEFAULT_TOP_AREAS,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn fast_config(page_size: usize) -> FetchConfig {
    FetchConfig::new()
        .with_page_size(page_size)
        .with_page_delay(Duration::ZERO)
        .with_backoff(BackoffSchedule::immediate())
}

/// Helper to build a reviewed submission.
fn submission(number: i64, venue: &str, venueid: &str, ratings: &[&str]) -> Note {
    let area = if number % 2 == 0 {
        "optimization"
    } else {
        "generative models"
    };
    let note = Note::new(format!("sub{}", number))
        .with_number(number)
        .with_field("title", json!({"value": format!("Paper {}", number)}))
        .with_field("primary_area", json!({ "value": area }))
        .with_field("venue", json!({ "value": venue }))
        .with_field("venueid", json!({ "value": venueid }));

    ratings.iter().fold(note, |note, rating| {
        note.with_reply(
            Reply::new()
                .with_field("rating", json!({ "value": rating }))
                .with_field("confidence", json!({"value": "3: fairly confident"}))
                .with_field("soundness", json!({"value": "3 good"})),
        )
    })
}

/// Checkpoint store that counts saves and delegates to a file.
///
/// The first `failures` saves are rejected before touching the file.
struct CountingCheckpoint {
    inner: JsonFileCheckpoint,
    saves: AtomicUsize,
    failures: AtomicUsize,
}

impl CountingCheckpoint {
    fn in_dir(dir: &std::path::Path, failures: usize) -> Self {
        Self {
            inner: JsonFileCheckpoint::in_dir(dir),
            saves: AtomicUsize::new(0),
            failures: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl CheckpointStore for CountingCheckpoint {
    async fn save(&self, submissions: &[Note]) -> review_harvest::Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let rejected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(HarvestError::Checkpoint(std::io::Error::other("disk full").into()));
        }
        self.inner.save(submissions).await
    }
}

#[tokio::test]
async fn test_pages_of_500_500_217() {
    let source = MockSubmissionSource::with_submission_count(1217);

    let all =
        fetch_all_submissions(&source, "ICLR.cc/2025/Conference", &fast_config(500), None).await;

    assert_eq!(source.requested_offsets(), vec![0, 500, 1000]);
    assert_eq!(all.len(), 1217);
}

#[tokio::test]
async fn test_retry_checkpoints_once_on_eventual_success() {
    let dir = tempfile::tempdir().unwrap();
    let checkpoint = CountingCheckpoint::in_dir(dir.path(), 0);
    let source = MockSubmissionSource::with_submission_count(217).fail_at(0, 2);

    let all = fetch_all_submissions(&source, "V", &fast_config(500), Some(&checkpoint)).await;

    assert_eq!(all.len(), 217);
    assert_eq!(source.requested_offsets(), vec![0, 0, 0]);
    assert_eq!(checkpoint.saves.load(Ordering::SeqCst), 1);

    let on_disk = load_submissions(checkpoint.inner.path()).unwrap();
    assert_eq!(on_disk, all);
}

#[tokio::test]
async fn test_failed_checkpoint_write_does_not_end_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let checkpoint = CountingCheckpoint::in_dir(dir.path(), 1);
    let source = MockSubmissionSource::with_submission_count(12);

    let all = fetch_all_submissions(&source, "V", &fast_config(5), Some(&checkpoint)).await;

    assert_eq!(all.len(), 12);
    assert_eq!(source.requested_offsets(), vec![0, 5, 10]);
    // One rejected write, then one per page
    assert_eq!(checkpoint.saves.load(Ordering::SeqCst), 4);
    assert_eq!(load_submissions(checkpoint.inner.path()).unwrap(), all);
}

#[tokio::test]
async fn test_checkpoint_tracks_accumulator_after_mid_fetch_failure() {
    let checkpoint = MemoryCheckpoint::new();
    let source = MockSubmissionSource::with_submission_count(23).fail_at(10, 2);

    fetch_all_submissions(&source, "V", &fast_config(10), Some(&checkpoint)).await;

    assert_eq!(source.requested_offsets(), vec![0, 10, 10, 10, 20]);
    assert_eq!(checkpoint.snapshot_sizes(), vec![10, 20, 23]);
}

#[tokio::test]
async fn test_fetch_extract_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let venue_id = "ICLR.cc/2025/Conference";

    let mut notes = vec![
        submission(1, "ICLR 2025 Oral", venue_id, &["8: accept, good paper", "10: strong accept"]),
        submission(
            2,
            "ICLR 2025 Poster",
            venue_id,
            &["6: marginally above", "5: marginally below"],
        ),
        submission(
            3,
            "Submitted to ICLR 2025",
            "ICLR.cc/2025/Conference/Rejected_Submission",
            &["3: reject"],
        ),
        submission(
            4,
            "ICLR 2025 Conference Withdrawn Submission",
            "ICLR.cc/2025/Conference/Withdrawn_Submission",
            &[],
        ),
    ];
    notes.reverse();
    let source = MockSubmissionSource::new().with_submissions(notes);
    let checkpoint = JsonFileCheckpoint::in_dir(dir.path());

    fetch_all_submissions(&source, venue_id, &fast_config(3), Some(&checkpoint)).await;

    // Extract from what was persisted, as the extract command does
    let loaded = load_submissions(checkpoint.path()).unwrap();
    let conference = Conference::infer(&loaded).unwrap();
    assert_eq!(conference.name(), "ICLR 2025");
    let has_decisions =
        detect_decisions_available(&loaded, DEFAULT_DETECTION_SAMPLE, Some(&conference));
    // 4 decided records out of a sample size of 100 is below the threshold
    assert!(!has_decisions);

    let options = ExtractOptions::new(true).with_conference(conference);
    let rows = extract_rows(&loaded, &options);
    let numbers: Vec<_> = rows.iter().map(|r| r.submission_number).collect();
    assert_eq!(numbers, vec![Some(1), Some(2), Some(3), Some(4)]);

    assert_eq!(rows[0].decision, Some(Decision::AcceptOral));
    assert_eq!(rows[0].avg_rating, Some(9.0));
    assert_eq!(rows[1].decision, Some(Decision::AcceptPoster));
    assert_eq!(rows[1].min_rating, Some(5));
    assert_eq!(rows[2].decision, Some(Decision::Reject));
    assert_eq!(rows[3].decision, Some(Decision::Withdrawn));
    assert_eq!(rows[3].num_reviews, 0);
    assert_eq!(rows[3].avg_rating, None);
    assert_eq!(rows[3].avg_confidence, None);

    let csv_path = dir.path().join("ratings_data.csv");
    write_rows_csv(&csv_path, &rows, true).unwrap();
    let table = read_rows_csv(&csv_path).unwrap();
    assert!(table.has_decisions);
    assert_eq!(table.rows, rows);

    let summary = Summary::from_rows(&table.rows, DEFAULT_TOP_AREAS);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.with_reviews, 3);
    assert_eq!(summary.total_reviews, 5);
    // 2 accepts over 3 non-withdrawn
    assert!((summary.acceptance_rate.unwrap() - 66.666).abs() < 0.01);
}

#[test]
fn test_detection_with_small_dataset_uses_sample_size_threshold() {
    let notes: Vec<Note> = (0..15)
        .map(|i| submission(i, "ICLR 2025 Poster", "ICLR.cc/2025/Conference", &[]))
        .collect();

    assert!(detect_decisions_available(&notes, DEFAULT_DETECTION_SAMPLE, None));
    assert!(!detect_decisions_available(&notes[..5], DEFAULT_DETECTION_SAMPLE, None));
}

#[test]
fn test_missing_metadata_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_submissions(dir.path().join("submissions_metadata.json")).unwrap_err();
    assert!(err.to_string().contains("file not found"));
}
