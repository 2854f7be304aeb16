//! Conference Review Harvesting Library
//!
//! Pulls every submission of a venue from OpenReview, flattens each one into
//! a row of review scores and a decision label, and summarises the result.
//!
//! # Usage
//!
//! ```rust,ignore
//! use review_harvest::{
//!     extract_rows, fetch_all_submissions, write_rows_csv, ExtractOptions, FetchConfig,
//!     JsonFileCheckpoint, OpenReviewSource,
//! };
//! use openreview_client::OpenReviewClient;
//!
//! let source = OpenReviewSource::new(OpenReviewClient::new()?);
//! let checkpoint = JsonFileCheckpoint::in_dir("iclr_2025");
//!
//! // Retries forever on API and checkpoint errors; checkpoints after every page
//! let notes = fetch_all_submissions(
//!     &source,
//!     "ICLR.cc/2025/Conference",
//!     &FetchConfig::default(),
//!     Some(&checkpoint),
//! )
//! .await;
//!
//! let rows = extract_rows(&notes, &ExtractOptions::new(true));
//! write_rows_csv("iclr_2025/ratings_data.csv", &rows, true)?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Seams for the fetcher (SubmissionSource, CheckpointStore)
//! - [`sources`] - OpenReview-backed and mock sources
//! - [`stores`] - JSON file and in-memory checkpoints
//! - [`pipeline`] - Fetch loop, decision classifier, review extractor
//! - [`export`] - CSV table writing and reading
//! - [`summary`] - Descriptive statistics over extracted rows

pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod sources;
pub mod stores;
pub mod summary;
pub mod traits;

// Re-export core types at crate root
pub use config::{BackoffSchedule, FetchConfig, DEFAULT_PAGE_SIZE};
pub use error::{HarvestError, Result, SourceError, SourceResult};
pub use traits::{checkpoint::CheckpointStore, source::SubmissionSource};

pub use pipeline::{
    // Fetch
    fetch_all_submissions,
    // Decisions
    classify, classify_note, detect_decisions_available, Classification, Conference, Decision,
    DecisionType, DEFAULT_DETECTION_SAMPLE,
    // Reviews
    collect_reviews, parse_score, RatingStats, ReviewScores,
    // Rows
    extract_row, extract_rows, ExtractOptions, ExtractedRow, NOT_AVAILABLE,
};

pub use export::{
    format_list_literal, parse_list_literal, read_rows_csv, write_rows_csv, RatingsTable,
    RATINGS_FILE_NAME,
};
pub use sources::{MockSubmissionSource, OpenReviewSource};
pub use stores::{load_submissions, JsonFileCheckpoint, MemoryCheckpoint, CHECKPOINT_FILE_NAME};
pub use summary::{Distribution, Summary, DEFAULT_TOP_AREAS};
