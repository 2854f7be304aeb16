use anyhow::{Context, Result};
use openreview_client::{ClientOptions, DEFAULT_BASE_URL};
use review_harvest::{FetchConfig, DEFAULT_PAGE_SIZE};
use std::env;
use std::time::Duration;

/// Settings loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestSettings {
    pub base_url: String,
    pub request_timeout: Duration,
    pub page_size: usize,
    pub page_delay: Duration,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: Duration::from_secs(5),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got {:?}", name, raw)),
        Err(_) => Ok(None),
    }
}

impl HarvestSettings {
    /// Load settings from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            base_url: env::var("OPENREVIEW_BASE_URL").unwrap_or(defaults.base_url),
            request_timeout: parse_var::<u64>("OPENREVIEW_TIMEOUT_SECS")
                .context("invalid OPENREVIEW_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            page_size: parse_var::<usize>("HARVEST_PAGE_SIZE")
                .context("invalid HARVEST_PAGE_SIZE")?
                .unwrap_or(defaults.page_size),
            page_delay: parse_var::<u64>("HARVEST_PAGE_DELAY_SECS")
                .context("invalid HARVEST_PAGE_DELAY_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.page_delay),
        })
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::default()
            .with_base_url(self.base_url.clone())
            .with_timeout(self.request_timeout)
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::new()
            .with_page_size(self.page_size)
            .with_page_delay(self.page_delay)
    }
}
