//! PaySim ledger reports
//!
//! Aggregates the transaction CSV the fraud model was trained on and
//! prints `key<TAB>value` lines sorted by key.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use fraud_scoring_api::analytics::Report;

#[derive(Debug, Parser)]
#[command(name = "paysim-report", version, about = "Aggregate reports over a PaySim transaction ledger")]
struct Cli {
    /// Report to produce
    #[arg(value_enum)]
    report: Report,

    /// PaySim CSV file
    input: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fraud_scoring_api=info,paysim_report=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let file = File::open(&cli.input)
        .with_context(|| format!("Failed to open {}", cli.input.display()))?;
    let output = cli
        .report
        .run(BufReader::new(file))
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            output.write_to(BufWriter::new(file))?;
        }
        None => output.write_to(io::stdout().lock())?,
    }

    tracing::info!(
        report = ?cli.report,
        rows = output.scanned,
        skipped = output.skipped,
        keys = output.rows.len(),
        "Report complete"
    );

    Ok(())
}
