//! # Fleet Metrics Aggregator - Main Entry Point
//!
//! Thin orchestration around the library: parse arguments, load the
//! per-client summaries, run the aggregation core, and hand the result to
//! the renderers. All user-facing messaging and file writes happen here or
//! in the renderers; the core itself performs no I/O.
//!
//! The run fails with a non-zero exit when no summary files are found or
//! aggregation yields nothing, and no output files are written in that
//! case. Individual unreadable summary files are skipped with a warning
//! inside the loader and never abort the run.

use anyhow::{bail, Result};
use clap::Parser;
use fleet_metrics::{
    cli::{AggregationConfig, Args},
    loader::load_summaries,
    logging::init_logging,
    metrics::aggregate_summaries,
    plot::HistogramRenderer,
    results::ReportWriter,
};
use tracing::info;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    args.validate()?;

    info!("Loading metrics from: {}", args.metrics_dir.display());
    let summaries = load_summaries(&args.metrics_dir)?;

    if summaries.is_empty() {
        bail!("no metric files found in {}", args.metrics_dir.display());
    }

    info!("Aggregating metrics...");
    let config = AggregationConfig::from(&args);
    let (report, pool) = aggregate_summaries(&summaries, &config)?;

    let writer = ReportWriter::new(&args.output_json);
    writer.write_json(&report)?;
    let text = writer.write_text(&report)?;

    let renderer = HistogramRenderer::new(&args.output_plot);
    renderer.render(&pool, report.latency_stats.as_ref())?;

    print_preview(&text);
    Ok(())
}

/// Echo the text report to stdout after the output files are written
fn print_preview(text: &str) {
    let rule = "=".repeat(fleet_metrics::defaults::REPORT_RULE_WIDTH);
    println!("\n{}", rule);
    println!("REPORT PREVIEW");
    println!("{}\n", rule);
    println!("{}", text);
}
