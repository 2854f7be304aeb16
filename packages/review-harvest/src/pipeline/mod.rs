//! Harvesting pipeline: fetch, classify, extract.

pub mod decision;
pub mod extract;
pub mod fetch;
pub mod reviews;

pub use decision::{
    classify, classify_note, detect_decisions_available, Classification, Conference, Decision,
    DecisionType, DEFAULT_DETECTION_SAMPLE,
};
pub use extract::{extract_row, extract_rows, ExtractOptions, ExtractedRow, NOT_AVAILABLE};
pub use fetch::fetch_all_submissions;
pub use reviews::{collect_reviews, is_review, parse_score, RatingStats, ReviewScores};
