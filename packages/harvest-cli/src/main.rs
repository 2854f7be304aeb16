//! Command-line front end for harvesting conference review data.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;
mod settings;

#[derive(Parser)]
#[command(name = "harvest")]
#[command(about = "Collect OpenReview submissions, ratings and decisions into a CSV table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all submissions of a venue, then extract and summarise them
    Scrape(cmd::scrape::ScrapeArgs),

    /// Extract a ratings table from a saved metadata file
    Extract(cmd::extract::ExtractArgs),

    /// Print summary statistics for a ratings table
    Summary(cmd::summary::SummaryArgs),
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,review_harvest=debug,openreview_client=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    let _ = dotenvy::dotenv();
    init_logging();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<()> {
    let settings = settings::HarvestSettings::from_env()?;

    match cli.command {
        Commands::Scrape(args) => cmd::scrape::run(&settings, args).await,
        Commands::Extract(args) => cmd::extract::run(args),
        Commands::Summary(args) => cmd::summary::run(args),
    }
}
