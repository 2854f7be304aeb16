use anyhow::{Context, Result};
use clap::Args;
use review_harvest::{
    detect_decisions_available, extract_rows, load_submissions, write_rows_csv, Conference,
    ExtractOptions, Summary, DEFAULT_DETECTION_SAMPLE, DEFAULT_TOP_AREAS, RATINGS_FILE_NAME,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Saved submissions metadata (JSON array of notes)
    pub metadata: PathBuf,

    /// Where to write the ratings table
    #[arg(default_value = RATINGS_FILE_NAME)]
    pub output: PathBuf,

    /// Conference name used for decision matching, e.g. "ICLR 2025"
    /// (inferred from the submissions' venue ids when omitted)
    #[arg(long)]
    pub conference: Option<String>,
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let submissions = load_submissions(&args.metadata).with_context(|| {
        format!(
            "Could not load metadata from {}; run `harvest scrape` first",
            args.metadata.display()
        )
    })?;
    println!("Loaded {} submissions", submissions.len());

    let conference = args
        .conference
        .map(Conference::new)
        .or_else(|| Conference::infer(&submissions));
    match &conference {
        Some(conference) => tracing::info!(conference = %conference, "Using conference"),
        None => tracing::warn!("Could not determine conference; exact venue matching disabled"),
    }

    let has_decisions =
        detect_decisions_available(&submissions, DEFAULT_DETECTION_SAMPLE, conference.as_ref());
    if has_decisions {
        println!("Decision data detected");
    } else {
        println!("No decision data detected (decisions may not be released yet)");
    }

    let mut options = ExtractOptions::new(has_decisions);
    if let Some(conference) = conference.clone() {
        options = options.with_conference(conference);
    }

    let rows = extract_rows(&submissions, &options);
    write_rows_csv(&args.output, &rows, has_decisions)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("Saved {} rows to {}", rows.len(), args.output.display());

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

    #[test]
    fn test_missing_metadata_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(ExtractArgs {
            metadata: dir.path().join("submissions_metadata.json"),
            output: dir.path().join("ratings_data.csv"),
            conference: None,
        })
        .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("run `harvest scrape` first"));
        assert!(message.contains("file not found"));
        assert!(!dir.path().join("ratings_data.csv").exists());
    }

    #[test]
    fn test_extract_writes_table_without_decisions() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = dir.path().join("submissions_metadata.json");
        std::fs::write(
            &metadata,
            r#"[{"id": "a", "number": 1, "content": {"title": {"value": "Paper"},
                "venueid": {"value": "ICLR.cc/2025/Conference"}}}]"#,
        )
        .unwrap();
        let output = dir.path().join("ratings_data.csv");

        run(ExtractArgs {
            metadata,
            output: output.clone(),
            conference: None,
        })
        .unwrap();

        let table = review_harvest::read_rows_csv(&output).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert!(!table.has_decisions);
    }
}
