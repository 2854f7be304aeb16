//! Descriptive statistics over extracted rows.

use std::collections::HashMap;
use std::fmt;

use crate::pipeline::{Decision, DecisionType, ExtractedRow};

pub const DEFAULT_TOP_AREAS: usize = 10;

/// Mean, median and count of a set of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Distribution {
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(|a, b| a.total_cmp(b));
        let count = values.len();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        };
        Some(Self {
            mean: values.iter().sum::<f64>() / count as f64,
            median,
            min: values[0],
            max: values[count - 1],
            count,
        })
    }
}

/// Report over a ratings table.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub title: Option<String>,
    pub total: usize,
    pub with_reviews: usize,
    pub total_reviews: usize,
    /// Mean reviews per submission across all submissions
    pub mean_reviews: Option<f64>,
    /// Over per-submission average ratings
    pub rating: Option<Distribution>,
    pub confidence: Option<Distribution>,
    pub has_decisions: bool,
    /// Canonical order, zero counts omitted
    pub decisions: Vec<(Decision, usize)>,
    pub decision_types: Vec<(DecisionType, usize)>,
    /// Accepts over non-withdrawn submissions
    pub acceptance_rate: Option<f64>,
    /// Most common primary areas, largest first
    pub top_areas: Vec<(String, usize)>,
    pub rating_by_type: Vec<(DecisionType, Distribution)>,
    pub rating_by_decision: Vec<(Decision, Distribution)>,
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

impl Summary {
    pub fn from_rows(rows: &[ExtractedRow], top_areas: usize) -> Self {
        let total = rows.len();
        let with_reviews = rows.iter().filter(|r| r.num_reviews > 0).count();
        let total_reviews: usize = rows.iter().map(|r| r.num_reviews).sum();
        let has_decisions = rows.iter().any(|r| r.decision.is_some());

        let decisions: Vec<(Decision, usize)> = Decision::ALL
            .into_iter()
            .map(|d| (d, rows.iter().filter(|r| r.decision == Some(d)).count()))
            .filter(|(_, n)| *n > 0)
            .collect();
        let decision_types: Vec<(DecisionType, usize)> = DecisionType::ALL
            .into_iter()
            .map(|t| (t, rows.iter().filter(|r| r.decision_type == Some(t)).count()))
            .filter(|(_, n)| *n > 0)
            .collect();

        let accepts = rows
            .iter()
            .filter(|r| r.decision_type == Some(DecisionType::Accept))
            .count();
        let non_withdrawn = rows
            .iter()
            .filter(|r| {
                r.decision_type.is_some() && r.decision_type != Some(DecisionType::Withdrawn)
            })
            .count();
        let acceptance_rate = (non_withdrawn > 0).then(|| percent(accepts, non_withdrawn));

        let mut area_counts: HashMap<&str, usize> = HashMap::new();
        for row in rows {
            *area_counts.entry(row.primary_area.as_str()).or_default() += 1;
        }
        let mut areas: Vec<(String, usize)> = area_counts
            .into_iter()
            .map(|(area, n)| (area.to_string(), n))
            .collect();
        areas.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        areas.truncate(top_areas);

        let rating_by_type = [DecisionType::Accept, DecisionType::Reject, DecisionType::Withdrawn]
            .into_iter()
            .filter_map(|t| {
                Distribution::of(
                    rows.iter()
                        .filter(|r| r.decision_type == Some(t))
                        .filter_map(|r| r.avg_rating),
                )
                .map(|d| (t, d))
            })
            .collect();
        let rating_by_decision = [
            Decision::AcceptOral,
            Decision::AcceptSpotlight,
            Decision::AcceptPoster,
            Decision::Reject,
        ]
        .into_iter()
        .filter_map(|dec| {
            Distribution::of(
                rows.iter()
                    .filter(|r| r.decision == Some(dec))
                    .filter_map(|r| r.avg_rating),
            )
            .map(|d| (dec, d))
        })
        .collect();

        Self {
            title: None,
            total,
            with_reviews,
            total_reviews,
            mean_reviews: (total > 0).then(|| total_reviews as f64 / total as f64),
            rating: Distribution::of(rows.iter().filter_map(|r| r.avg_rating)),
            confidence: Distribution::of(rows.iter().filter_map(|r| r.avg_confidence)),
            has_decisions,
            decisions,
            decision_types,
            acceptance_rate,
            top_areas: areas,
            rating_by_type,
            rating_by_decision,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        match &self.title {
            Some(title) => writeln!(f, "SUMMARY STATISTICS - {}", title)?,
            None => writeln!(f, "SUMMARY STATISTICS")?,
        }
        writeln!(f, "{}", rule)?;
        writeln!(f, "Total submissions: {}", self.total)?;
        writeln!(
            f,
            "Submissions with reviews: {} ({:.1}%)",
            self.with_reviews,
            percent(self.with_reviews, self.total)
        )?;

        if self.with_reviews > 0 {
            writeln!(f, "\nReview statistics:")?;
            if let Some(mean) = self.mean_reviews {
                writeln!(f, "  Average reviews per submission: {:.2}", mean)?;
            }
            writeln!(f, "  Total reviews: {}", self.total_reviews)?;
        }

        if let Some(rating) = &self.rating {
            writeln!(f, "\nRating statistics:")?;
            writeln!(f, "  Average rating: {:.2}", rating.mean)?;
            writeln!(f, "  Median rating: {:.2}", rating.median)?;
            writeln!(f, "  Rating range: {:.2} - {:.2}", rating.min, rating.max)?;
        }
        if let Some(confidence) = &self.confidence {
            writeln!(f, "\nConfidence statistics:")?;
            writeln!(f, "  Average confidence: {:.2}", confidence.mean)?;
        }

        if self.has_decisions {
            writeln!(f, "\nDecision breakdown:")?;
            for (decision, count) in &self.decisions {
                writeln!(
                    f,
                    "  {:<20} {:>6} ({:>5.1}%)",
                    decision.as_str(),
                    count,
                    percent(*count, self.total)
                )?;
            }
            writeln!(f, "\nDecision type breakdown:")?;
            for (decision_type, count) in &self.decision_types {
                writeln!(
                    f,
                    "  {:<20} {:>6} ({:>5.1}%)",
                    decision_type.as_str(),
                    count,
                    percent(*count, self.total)
                )?;
            }
            if let Some(rate) = self.acceptance_rate {
                writeln!(f, "\nAcceptance rate (excl. withdrawn): {:.1}%", rate)?;
            }
            if !self.rating_by_type.is_empty() {
                writeln!(f, "\nAverage rating by decision type:")?;
                for (decision_type, d) in &self.rating_by_type {
                    writeln!(
                        f,
                        "  {}: Mean={:.2}, Median={:.2} (n={})",
                        decision_type, d.mean, d.median, d.count
                    )?;
                }
            }
            if !self.rating_by_decision.is_empty() {
                writeln!(f, "\nAverage rating by detailed decision:")?;
                for (decision, d) in &self.rating_by_decision {
                    writeln!(
                        f,
                        "  {}: Mean={:.2}, Median={:.2} (n={})",
                        decision, d.mean, d.median, d.count
                    )?;
                }
            }
        } else {
            writeln!(f, "\nDecisions: not available")?;
        }

        if !self.top_areas.is_empty() {
            writeln!(f, "\nTop {} primary areas:", self.top_areas.len())?;
            for (i, (area, count)) in self.top_areas.iter().enumerate() {
                let label: String = area.chars().take(50).collect();
                writeln!(
                    f,
                    "  {:>2}. {:<50} {:>5} ({:>4.1}%)",
                    i + 1,
                    label,
                    count,
                    percent(*count, self.total)
                )?;
            }
        }
        write!(f, "{}", rule)
    }
}
