use anyhow::{Context, Result};
use chartkit::export::{self, ExportItem};
use chartkit::models::{AnalysisDocument, CanonicalSeries, RawChartRecord};
use chartkit::present::{Prepared, prepare};
use chartkit::{snapshot, stats};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chartkit",
    version,
    about = "Normalize, render & export analytics chart records"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load an analytics-result document and produce exports from it.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Path to the analytics-result JSON document.
    #[arg(short, long)]
    input: PathBuf,
    /// Write the delimited tabular export (sparklines + CSV blocks) here.
    #[arg(long)]
    table: Option<PathBuf>,
    /// Write the printable HTML report here.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Export every chart as a PNG snapshot into this directory.
    #[arg(long)]
    png_dir: Option<PathBuf>,
    /// Width of PNG snapshots (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of PNG snapshots (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Print per-chart summary statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
    }
}

/// Charts that survived the pipeline, paired with their source records.
fn prepared_charts(doc: &AnalysisDocument) -> Vec<(&RawChartRecord, CanonicalSeries)> {
    let mut out = Vec::new();
    for record in &doc.charts {
        match prepare(record) {
            Prepared::Chart { series, .. } => out.push((record, series)),
            Prepared::NoData => {
                eprintln!("skipping '{}': no data points", record.title());
            }
            Prepared::UpstreamError { kind, message } => {
                eprintln!(
                    "skipping '{}': upstream error ({} {})",
                    record.title(),
                    kind.as_deref().unwrap_or("unknown"),
                    message.as_deref().unwrap_or("")
                );
            }
        }
    }
    out
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let doc: AnalysisDocument =
        serde_json::from_str(&text).context("parse analytics-result document")?;

    let charts = prepared_charts(&doc);
    let items: Vec<ExportItem<'_>> = charts
        .iter()
        .map(|(record, series)| ExportItem { record, series })
        .collect();

    if let Some(path) = &args.table {
        fs::write(path, export::build_table(&items))
            .with_context(|| format!("write {}", path.display()))?;
        println!("wrote table export: {}", path.display());
    }

    if let Some(path) = &args.report {
        fs::write(path, export::build_report(&items, &doc))
            .with_context(|| format!("write {}", path.display()))?;
        println!("wrote report: {}", path.display());
    }

    if let Some(dir) = &args.png_dir {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        let outcome = snapshot::export_batch(&doc.charts, dir, args.width, args.height);
        println!(
            "exported {} snapshot(s), {} failure(s)",
            outcome.saved.len(),
            outcome.failures.len()
        );
        for f in &outcome.failures {
            eprintln!("  [{}] {}: {}", f.index, f.title, f.error);
        }
    }

    if args.stats {
        for (record, series) in &charts {
            let s = stats::summarize(series);
            println!(
                "{}: count={} missing={} min={:?} max={:?} mean={:?} median={:?}",
                record.title(),
                s.count,
                s.missing,
                s.min,
                s.max,
                s.mean,
                s.median
            );
        }
    }

    Ok(())
}
