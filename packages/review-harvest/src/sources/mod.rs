//! Submission source implementations.

pub mod mock;
pub mod openreview;

pub use mock::{MockSubmissionSource, SourceCall};
pub use openreview::OpenReviewSource;
