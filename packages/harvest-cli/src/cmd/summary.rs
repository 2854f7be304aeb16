use anyhow::{Context, Result};
use clap::Args;
use review_harvest::{read_rows_csv, Summary, DEFAULT_TOP_AREAS};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Ratings table produced by `scrape` or `extract`
    pub csv: PathBuf,

    /// Number of primary areas to list
    #[arg(long, default_value_t = DEFAULT_TOP_AREAS)]
    pub top_areas: usize,
}

pub fn run(args: SummaryArgs) -> Result<()> {
    let table = read_rows_csv(&args.csv)
        .with_context(|| format!("Failed to read ratings table {}", args.csv.display()))?;

    let summary = Summary::from_rows(&table.rows, args.top_areas);
    println!("{}", summary);
    Ok(())
}
