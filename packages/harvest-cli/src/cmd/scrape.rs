use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use openreview_client::OpenReviewClient;
use review_harvest::{
    extract_rows, fetch_all_submissions, write_rows_csv, Conference, ExtractOptions,
    JsonFileCheckpoint, OpenReviewSource, Summary, DEFAULT_TOP_AREAS, RATINGS_FILE_NAME,
};
use std::path::PathBuf;
use std::time::Duration;

use crate::settings::HarvestSettings;

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["year", "venue"])))]
pub struct ScrapeArgs {
    /// ICLR year to scrape (expands to ICLR.cc/YEAR/Conference)
    #[arg(long)]
    pub year: Option<u16>,

    /// Full venue id, e.g. NeurIPS.cc/2024/Conference
    #[arg(long)]
    pub venue: Option<String>,

    /// Directory for the checkpoint and the ratings table
    #[arg(short, long)]
    pub output: PathBuf,

    /// Skip decision classification (decisions not yet released)
    #[arg(long)]
    pub no_decisions: bool,

    /// Submissions per request (overrides HARVEST_PAGE_SIZE)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Seconds to wait between pages (overrides HARVEST_PAGE_DELAY_SECS)
    #[arg(long)]
    pub page_delay_secs: Option<u64>,
}

impl ScrapeArgs {
    pub fn venue_id(&self) -> Result<String> {
        match (&self.venue, self.year) {
            (Some(venue), _) => Ok(venue.clone()),
            (None, Some(year)) => Ok(format!("ICLR.cc/{}/Conference", year)),
            (None, None) => anyhow::bail!("either --year or --venue is required"),
        }
    }
}

pub async fn run(settings: &HarvestSettings, args: ScrapeArgs) -> Result<()> {
    let venue_id = args.venue_id()?;

    let mut config = settings.fetch_config();
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size);
    }
    if let Some(secs) = args.page_delay_secs {
        config = config.with_page_delay(Duration::from_secs(secs));
    }

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory {}", args.output.display()))?;

    let client = OpenReviewClient::with_options(settings.client_options())
        .context("Failed to build OpenReview client")?;
    let source = OpenReviewSource::new(client);
    let checkpoint = JsonFileCheckpoint::in_dir(&args.output);

    tracing::info!(
        venue_id = %venue_id,
        output = %args.output.display(),
        page_size = config.page_size,
        "Starting scrape"
    );

    let submissions = fetch_all_submissions(&source, &venue_id, &config, Some(&checkpoint)).await;

    if submissions.is_empty() {
        println!("No submissions found for {}", venue_id);
        return Ok(());
    }
    println!(
        "Fetched {} submissions into {}",
        submissions.len(),
        checkpoint.path().display()
    );

    let include_decisions = !args.no_decisions;
    let mut options = ExtractOptions::new(include_decisions);
    let conference = Conference::from_venue_id(&venue_id);
    if let Some(conference) = conference.clone() {
        options = options.with_conference(conference);
    }

    let rows = extract_rows(&submissions, &options);
    let csv_path = args.output.join(RATINGS_FILE_NAME);
    write_rows_csv(&csv_path, &rows, include_decisions)
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;
    println!("Saved {} rows to {}", rows.len(), csv_path.display());

    let mut summary = Summary::from_rows(&rows, DEFAULT_TOP_AREAS);
    if let Some(conference) = conference {
        summary = summary.with_title(conference.name());
    }
    println!("\n{}", summary);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(year: Option<u16>, venue: Option<&str>) -> ScrapeArgs {
        ScrapeArgs {
            year,
            venue: venue.map(String::from),
            output: PathBuf::from("out"),
            no_decisions: false,
            page_size: None,
            page_delay_secs: None,
        }
    }

    #[test]
    fn test_year_expands_to_iclr_venue() {
        assert_eq!(
            args(Some(2025), None).venue_id().unwrap(),
            "ICLR.cc/2025/Conference"
        );
    }

    #[test]
    fn test_explicit_venue_is_used_verbatim() {
        assert_eq!(
            args(None, Some("NeurIPS.cc/2024/Conference")).venue_id().unwrap(),
            "NeurIPS.cc/2024/Conference"
        );
    }

    #[test]
    fn test_missing_target_is_an_error() {
        assert!(args(None, None).venue_id().is_err());
    }
}
