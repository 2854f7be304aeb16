//! Decision classification from venue strings.
//!
//! OpenReview encodes a submission's outcome only in two free-text fields:
//! `venue` (e.g. "ICLR 2025 Oral") and `venueid` (e.g.
//! "ICLR.cc/2025/Conference/Rejected_Submission"). The rules below are
//! checked in a fixed order and the first match wins, since the markers are
//! not mutually exclusive substrings.

use openreview_client::Note;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Records inspected by [`detect_decisions_available`] by default.
pub const DEFAULT_DETECTION_SAMPLE: usize = 100;

/// Detailed decision label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "Accept (Oral)")]
    AcceptOral,
    #[serde(rename = "Accept (Spotlight)")]
    AcceptSpotlight,
    #[serde(rename = "Accept (Poster)")]
    AcceptPoster,
    Reject,
    #[serde(rename = "Desk Reject")]
    DeskReject,
    Withdrawn,
    Unknown,
    Pending,
}

impl Decision {
    /// Every label, in reporting order.
    pub const ALL: [Decision; 8] = [
        Decision::AcceptOral,
        Decision::AcceptSpotlight,
        Decision::AcceptPoster,
        Decision::Reject,
        Decision::DeskReject,
        Decision::Withdrawn,
        Decision::Unknown,
        Decision::Pending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::AcceptOral => "Accept (Oral)",
            Decision::AcceptSpotlight => "Accept (Spotlight)",
            Decision::AcceptPoster => "Accept (Poster)",
            Decision::Reject => "Reject",
            Decision::DeskReject => "Desk Reject",
            Decision::Withdrawn => "Withdrawn",
            Decision::Unknown => "Unknown",
            Decision::Pending => "Pending",
        }
    }

    /// Coarse label this decision rolls up to.
    pub fn decision_type(self) -> DecisionType {
        match self {
            Decision::AcceptOral | Decision::AcceptSpotlight | Decision::AcceptPoster => {
                DecisionType::Accept
            }
            Decision::Reject | Decision::DeskReject => DecisionType::Reject,
            Decision::Withdrawn => DecisionType::Withdrawn,
            Decision::Unknown => DecisionType::Unknown,
            Decision::Pending => DecisionType::Pending,
        }
    }

    /// True for labels that carry an actual outcome.
    pub fn is_decided(self) -> bool {
        !matches!(self, Decision::Unknown | Decision::Pending)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decision::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown decision label: {}", s))
    }
}

/// Coarse decision label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionType {
    Accept,
    Reject,
    Withdrawn,
    Unknown,
    Pending,
}

impl DecisionType {
    pub const ALL: [DecisionType; 5] = [
        DecisionType::Accept,
        DecisionType::Reject,
        DecisionType::Withdrawn,
        DecisionType::Unknown,
        DecisionType::Pending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DecisionType::Accept => "Accept",
            DecisionType::Reject => "Reject",
            DecisionType::Withdrawn => "Withdrawn",
            DecisionType::Unknown => "Unknown",
            DecisionType::Pending => "Pending",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DecisionType::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown decision type: {}", s))
    }
}

/// Result of classifying one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub decision: Decision,
    pub decision_type: DecisionType,
}

impl Classification {
    fn of(decision: Decision) -> Self {
        Self {
            decision,
            decision_type: decision.decision_type(),
        }
    }

    pub fn pending() -> Self {
        Self::of(Decision::Pending)
    }
}

/// Conference token used by the reject and fallback-accept rules,
/// e.g. `ICLR 2025`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conference {
    name: String,
}

impl Conference {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Derive from a venue id such as `ICLR.cc/2025/Conference`.
    ///
    /// The first path segment up to its first dot is the conference, the
    /// second segment is appended when it is a year.
    pub fn from_venue_id(venue_id: &str) -> Option<Self> {
        let mut segments = venue_id.trim().split('/');
        let host = segments.next()?.split('.').next()?.trim();
        if host.is_empty() {
            return None;
        }
        let year = segments
            .next()
            .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()));
        Some(match year {
            Some(year) => Self::new(format!("{} {}", host, year)),
            None => Self::new(host),
        })
    }

    /// First conference derivable from the submissions' venue ids.
    pub fn infer(submissions: &[Note]) -> Option<Self> {
        submissions
            .iter()
            .find_map(|note| Self::from_venue_id(note.venue_id()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Venue label OpenReview gives rejected papers once decisions are out.
    pub fn submitted_label(&self) -> String {
        format!("Submitted to {}", self.name)
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Classify a submission from its `venue` and `venueid` strings.
///
/// When `decisions_available` is false the text is not inspected and the
/// result is Pending. Without a `conference`, the exact "Submitted to ..."
/// reject match and the fallback accept rule never apply.
pub fn classify(
    venue: &str,
    venueid: &str,
    decisions_available: bool,
    conference: Option<&Conference>,
) -> Classification {
    if !decisions_available {
        return Classification::pending();
    }

    let either = |marker: &str| venue.contains(marker) || venueid.contains(marker);

    let decision = if either("Withdrawn") {
        Decision::Withdrawn
    } else if venueid.contains("Desk_Rejected") || venue.contains("Desk Reject") {
        Decision::DeskReject
    } else if venueid.contains("Rejected_Submission")
        || venueid.contains("Rejected")
        || conference.is_some_and(|c| venue == c.submitted_label())
    {
        Decision::Reject
    } else if either("Oral") {
        Decision::AcceptOral
    } else if either("Spotlight") {
        Decision::AcceptSpotlight
    } else if either("Poster") {
        Decision::AcceptPoster
    } else if conference.is_some_and(|c| {
        venue.contains(c.name()) && !venue.contains("Submitted") && !venue.contains("Withdrawn")
    }) {
        // Heuristic: an accepted paper whose venue names only the conference.
        Decision::AcceptPoster
    } else {
        Decision::Unknown
    };

    Classification::of(decision)
}

/// [`classify`] applied to a note's content fields.
pub fn classify_note(
    note: &Note,
    decisions_available: bool,
    conference: Option<&Conference>,
) -> Classification {
    classify(note.venue(), note.venue_id(), decisions_available, conference)
}

/// Decide whether a dataset carries decisions at all.
///
/// Classifies the first `sample_size` submissions as if decisions were
/// published and reports true when strictly more than 10% of `sample_size`
/// resolve to a decided label.
pub fn detect_decisions_available(
    submissions: &[Note],
    sample_size: usize,
    conference: Option<&Conference>,
) -> bool {
    let decided = submissions
        .iter()
        .take(sample_size)
        .filter(|note| classify_note(note, true, conference).decision.is_decided())
        .count();

    tracing::debug!(decided, sample_size, "Decision detection sample");
    decided * 10 > sample_size
}
