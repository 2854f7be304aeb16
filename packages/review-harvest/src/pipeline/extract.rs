//! Flatten submissions into one row each.

use openreview_client::{FieldValue, Note};
use serde_json::Value;

use super::decision::{classify_note, Conference, Decision, DecisionType};
use super::reviews::collect_reviews;

/// Primary-area value used when a submission has none.
pub const NOT_AVAILABLE: &str = "N/A";

/// One flattened submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRow {
    pub submission_id: Option<String>,
    pub submission_number: Option<i64>,
    pub primary_area: String,
    pub num_reviews: usize,
    pub ratings: Vec<Value>,
    pub confidences: Vec<Value>,
    pub soundness: Vec<Value>,
    pub presentation: Vec<Value>,
    pub contribution: Vec<Value>,
    pub avg_rating: Option<f64>,
    pub min_rating: Option<i64>,
    pub max_rating: Option<i64>,
    pub avg_confidence: Option<f64>,
    /// Present only when the dataset carries decisions
    pub decision: Option<Decision>,
    pub decision_type: Option<DecisionType>,
}

/// How to fill decision columns.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub decisions_available: bool,
    pub conference: Option<Conference>,
}

impl ExtractOptions {
    pub fn new(decisions_available: bool) -> Self {
        Self {
            decisions_available,
            conference: None,
        }
    }

    pub fn with_conference(mut self, conference: Conference) -> Self {
        self.conference = Some(conference);
        self
    }
}

fn primary_area(note: &Note) -> String {
    match note.field("primary_area").and_then(FieldValue::value) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::String(_)) | None => NOT_AVAILABLE.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Flatten one submission.
pub fn extract_row(note: &Note, options: &ExtractOptions) -> ExtractedRow {
    let scores = collect_reviews(note);
    let stats = scores.rating_stats();
    let avg_confidence = scores.avg_confidence();

    let classification = options
        .decisions_available
        .then(|| classify_note(note, true, options.conference.as_ref()));

    ExtractedRow {
        submission_id: note.id.clone(),
        submission_number: note.number,
        primary_area: primary_area(note),
        num_reviews: scores.review_count,
        avg_rating: stats.map(|s| s.avg),
        min_rating: stats.map(|s| s.min),
        max_rating: stats.map(|s| s.max),
        avg_confidence,
        decision: classification.map(|c| c.decision),
        decision_type: classification.map(|c| c.decision_type),
        ratings: scores.ratings,
        confidences: scores.confidences,
        soundness: scores.soundness,
        presentation: scores.presentation,
        contribution: scores.contribution,
    }
}

/// Flatten all submissions, sorted by submission number.
///
/// Rows without a number keep their relative order and sort last.
pub fn extract_rows(submissions: &[Note], options: &ExtractOptions) -> Vec<ExtractedRow> {
    let mut rows: Vec<ExtractedRow> = submissions
        .iter()
        .map(|note| extract_row(note, options))
        .collect();
    rows.sort_by_key(|row| (row.submission_number.is_none(), row.submission_number));
    tracing::info!(
        rows = rows.len(),
        decisions = options.decisions_available,
        "Extracted submission rows"
    );
    rows
}
