//! Export a vote summary as CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use tally_core::data::mock_summary;
use tally_sync::export::write_summary_csv;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output path for the CSV file
    #[arg(short, long, default_value = "VoteSummary.csv")]
    pub output: PathBuf,
}

/// Writes the development dataset's party breakdown to a CSV file.
pub fn run(args: &ExportArgs) -> Result<()> {
    let summary = mock_summary();
    write_summary_csv(&args.output, &summary.party_breakdown)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(
        path = %args.output.display(),
        rows = summary.party_breakdown.len(),
        "vote summary exported"
    );
    println!(
        "Exported {} parties to {}",
        summary.party_breakdown.len(),
        args.output.display()
    );
    Ok(())
}
