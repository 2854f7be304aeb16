//! Configuration types for fetching.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Records requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// Wait schedule between attempts at the same page.
///
/// Attempt `n` (1-based) waits `initial[n - 1]` while that exists, then
/// `steady` for every later attempt. There is no attempt cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffSchedule {
    pub initial: Vec<Duration>,
    pub steady: Duration,
}

impl Default for BackoffSchedule {
    /// 1 minute, 2 minutes, then every 5 minutes.
    fn default() -> Self {
        Self {
            initial: vec![Duration::from_secs(60), Duration::from_secs(120)],
            steady: Duration::from_secs(300),
        }
    }
}

impl BackoffSchedule {
    /// Retry without waiting. Meant for tests.
    pub fn immediate() -> Self {
        Self {
            initial: Vec::new(),
            steady: Duration::ZERO,
        }
    }

    /// Delay before retrying after the `attempt`-th consecutive failure.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let index = attempt.saturating_sub(1) as usize;
        self.initial.get(index).copied().unwrap_or(self.steady)
    }
}

/// Configuration for [`fetch_all_submissions`](crate::pipeline::fetch_all_submissions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum records per page request.
    pub page_size: usize,

    /// Pause between successful pages. Rate-limit courtesy.
    pub page_delay: Duration,

    /// Wait schedule for retrying a failed page.
    pub backoff: BackoffSchedule,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: Duration::from_secs(5),
            backoff: BackoffSchedule::default(),
        }
    }
}

impl FetchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page size. Zero is bumped to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffSchedule) -> Self {
        self.backoff = backoff;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backoff_schedule() {
        let backoff = BackoffSchedule::default();
        assert_eq!(backoff.delay_for(1), Duration::from_secs(60));
        assert_eq!(backoff.delay_for(2), Duration::from_secs(120));
        assert_eq!(backoff.delay_for(3), Duration::from_secs(300));
        assert_eq!(backoff.delay_for(50), Duration::from_secs(300));
    }

    #[test]
    fn test_attempt_zero_is_treated_as_first() {
        let backoff = BackoffSchedule::default();
        assert_eq!(backoff.delay_for(0), Duration::from_secs(60));
    }

    #[test]
    fn test_immediate_backoff_never_waits() {
        let backoff = BackoffSchedule::immediate();
        assert_eq!(backoff.delay_for(1), Duration::ZERO);
        assert_eq!(backoff.delay_for(7), Duration::ZERO);
    }

    #[test]
    fn test_page_size_floor() {
        assert_eq!(FetchConfig::new().with_page_size(0).page_size, 1);
        assert_eq!(FetchConfig::default().page_size, DEFAULT_PAGE_SIZE);
    }
}
