//! Review score collection.
//!
//! A reply counts as a review iff its content has both a `rating` and a
//! `confidence` key. Scores are kept as the raw scalars the API returned
//! (numbers, or strings such as `"6: marginally above the acceptance
//! threshold"`) and parsed only when aggregating.

use openreview_client::{FieldValue, Note, Reply};
use serde_json::Value;

/// Raw scores collected from one submission's reviews.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewScores {
    /// Replies that qualified as reviews
    pub review_count: usize,
    pub ratings: Vec<Value>,
    pub confidences: Vec<Value>,
    pub soundness: Vec<Value>,
    pub presentation: Vec<Value>,
    pub contribution: Vec<Value>,
}

/// Average, minimum, and maximum of the parsable ratings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingStats {
    pub avg: f64,
    pub min: i64,
    pub max: i64,
}

pub fn is_review(reply: &Reply) -> bool {
    reply.has_field("rating") && reply.has_field("confidence")
}

/// Unwrapped field value, skipping null and empty strings.
fn score(reply: &Reply, key: &str) -> Option<Value> {
    reply
        .field(key)
        .and_then(FieldValue::value)
        .filter(|v| !matches!(v, Value::String(s) if s.trim().is_empty()))
        .cloned()
}

/// Collect the scores of every review attached to `note`.
pub fn collect_reviews(note: &Note) -> ReviewScores {
    let mut scores = ReviewScores::default();

    for reply in note.replies().iter().filter(|r| is_review(r)) {
        scores.review_count += 1;

        let targets = [
            ("rating", &mut scores.ratings),
            ("confidence", &mut scores.confidences),
            ("soundness", &mut scores.soundness),
            ("presentation", &mut scores.presentation),
            ("contribution", &mut scores.contribution),
        ];
        for (key, target) in targets {
            if let Some(value) = score(reply, key) {
                target.push(value);
            }
        }
    }

    scores
}

/// Integer reading of a score.
///
/// Integers are taken as is, floats are truncated, and strings are read
/// from the text before the first colon, so `"6: Weak Accept"` is 6.
pub fn parse_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.split(':').next()?.trim().parse().ok(),
        _ => None,
    }
}

fn parsed(values: &[Value]) -> Vec<i64> {
    values.iter().filter_map(parse_score).collect()
}

fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64)
}

impl ReviewScores {
    pub fn numeric_ratings(&self) -> Vec<i64> {
        parsed(&self.ratings)
    }

    pub fn numeric_confidences(&self) -> Vec<i64> {
        parsed(&self.confidences)
    }

    /// `None` when no rating parses.
    pub fn rating_stats(&self) -> Option<RatingStats> {
        let ratings = self.numeric_ratings();
        let avg = mean(&ratings)?;
        Some(RatingStats {
            avg,
            min: *ratings.iter().min()?,
            max: *ratings.iter().max()?,
        })
    }

    /// `None` when no confidence parses.
    pub fn avg_confidence(&self) -> Option<f64> {
        mean(&self.numeric_confidences())
    }
}
