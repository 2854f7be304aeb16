//! Pure OpenReview REST API client.
//!
//! A minimal client for the OpenReview v2 API. It lists notes (submissions)
//! for a venue, one page at a time, with their replies inlined. Paging,
//! retries, and persistence are left to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use openreview_client::{ListNotesQuery, OpenReviewClient};
//!
//! let client = OpenReviewClient::new()?;
//!
//! let page = client
//!     .list_notes(&ListNotesQuery::submissions("ICLR.cc/2025/Conference", 0, 500))
//!     .await?;
//! for note in &page.notes {
//!     println!("{:?}: {}", note.number, note.venue());
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{OpenReviewError, Result};
pub use types::{FieldValue, ListNotesQuery, Note, NoteDetails, NotesPage, Reply};

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api2.openreview.net";

/// Connection settings for [`OpenReviewClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientOptions {
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("review-harvest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct OpenReviewClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenReviewClient {
    pub fn new() -> Result<Self> {
        Self::with_options(ClientOptions::default())
    }

    pub fn with_options(options: ClientOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .build()
            .map_err(|e| OpenReviewError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page from `GET /notes`.
    pub async fn list_notes(&self, query: &ListNotesQuery) -> Result<NotesPage> {
        let url = format!("{}/notes", self.base_url);
        tracing::debug!(
            invitation = %query.invitation,
            offset = query.offset,
            limit = query.limit,
            "Listing notes"
        );

        let resp = self.client.get(&url).query(query).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OpenReviewError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let page: NotesPage = resp.json().await?;
        Ok(page)
    }

    /// Fetch one page of a venue's submissions, replies inlined.
    pub async fn submissions_page(
        &self,
        venue_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Note>> {
        let page = self
            .list_notes(&ListNotesQuery::submissions(venue_id, offset, limit))
            .await?;
        tracing::debug!(venue_id, offset, returned = page.notes.len(), "Fetched submissions page");
        Ok(page.notes)
    }
}
