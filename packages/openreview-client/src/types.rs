use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Query parameters for `GET /notes`.
#[derive(Debug, Clone, Serialize)]
pub struct ListNotesQuery {
    pub invitation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl ListNotesQuery {
    /// Submissions of a venue, with replies inlined.
    pub fn submissions(venue_id: &str, offset: usize, limit: usize) -> Self {
        Self {
            invitation: format!("{}/-/Submission", venue_id),
            details: Some("replies,invitation".to_string()),
            limit,
            offset,
        }
    }
}

/// One page of notes as returned by the listing endpoint.
///
/// `notes` is required. A body without it fails to decode, so the caller
/// retries instead of reading it as the end of the listing.
#[derive(Debug, Clone, Deserialize)]
pub struct NotesPage {
    pub notes: Vec<Note>,
    pub count: Option<u64>,
}

/// A note: for our purposes, one conference submission.
///
/// Fields the client does not interpret are kept in `extra` so a note
/// serialises back to what the API returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    #[serde(default)]
    pub content: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<NoteDetails>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Inlined details requested with `details=replies,...`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteDetails {
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A threaded reply attached to a note (review, comment, decision, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub content: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// View over a content field.
///
/// API v2 wraps every field as `{"value": ...}`; older exports store the
/// bare scalar. Both shapes resolve through [`FieldValue::value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Wrapped(Option<&'a Value>),
    Bare(&'a Value),
}

impl<'a> FieldValue<'a> {
    pub fn from_json(raw: &'a Value) -> Self {
        match raw {
            Value::Object(map) => FieldValue::Wrapped(map.get("value")),
            other => FieldValue::Bare(other),
        }
    }

    /// The underlying scalar, or `None` when missing or null.
    pub fn value(self) -> Option<&'a Value> {
        let inner = match self {
            FieldValue::Wrapped(inner) => inner,
            FieldValue::Bare(inner) => Some(inner),
        };
        inner.filter(|v| !v.is_null())
    }

    pub fn as_str(self) -> Option<&'a str> {
        self.value().and_then(Value::as_str)
    }
}

fn field<'a>(content: &'a Map<String, Value>, key: &str) -> Option<FieldValue<'a>> {
    content.get(key).map(FieldValue::from_json)
}

impl Note {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_number(mut self, number: i64) -> Self {
        self.number = Some(number);
        self
    }

    /// Set a content field. The value is stored as given (bare or wrapped).
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.content.insert(key.into(), value);
        self
    }

    pub fn with_reply(mut self, reply: Reply) -> Self {
        self.details
            .get_or_insert_with(NoteDetails::default)
            .replies
            .push(reply);
        self
    }

    pub fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        field(&self.content, key)
    }

    /// String value of a content field, empty when missing or not a string.
    pub fn text(&self, key: &str) -> &str {
        self.field(key).and_then(FieldValue::as_str).unwrap_or("")
    }

    pub fn venue(&self) -> &str {
        self.text("venue")
    }

    pub fn venue_id(&self) -> &str {
        self.text("venueid")
    }

    pub fn replies(&self) -> &[Reply] {
        self.details
            .as_ref()
            .map(|d| d.replies.as_slice())
            .unwrap_or(&[])
    }
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.content.insert(key.into(), value);
        self
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.content.contains_key(key)
    }

    pub fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        field(&self.content, key)
    }
}
