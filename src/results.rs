//! Report output: JSON serialization and the fixed-layout text report.
//!
//! The text report is rendered to a `String` by a pure function so its
//! layout is testable without touching the filesystem; `ReportWriter` owns
//! the output paths and performs the actual writes. The text report path is
//! derived from the JSON path by swapping the extension to `txt`.

use crate::defaults::{REPORT_RULE_WIDTH, TOP_FAILURE_REASONS};
use crate::metrics::AggregateReport;
use crate::utils::{format_count, truncate_label};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Maximum failure-reason label width in the text report
const REASON_LABEL_WIDTH: usize = 50;

/// Writes the aggregate report to its output files
pub struct ReportWriter {
    json_path: PathBuf,
    text_path: PathBuf,
}

impl ReportWriter {
    /// Create a writer for the given JSON output path
    ///
    /// The text report goes to the same path with a `txt` extension.
    pub fn new(json_path: &Path) -> Self {
        Self {
            json_path: json_path.to_path_buf(),
            text_path: json_path.with_extension("txt"),
        }
    }

    pub fn text_path(&self) -> &Path {
        &self.text_path
    }

    /// Write the pretty-printed JSON report
    pub fn write_json(&self, report: &AggregateReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&self.json_path, json)
            .with_context(|| format!("failed to write {}", self.json_path.display()))?;
        info!("JSON report saved: {}", self.json_path.display());
        Ok(())
    }

    /// Render and write the text report, returning the rendered text
    pub fn write_text(&self, report: &AggregateReport) -> Result<String> {
        let text = render_text_report(report);
        fs::write(&self.text_path, &text)
            .with_context(|| format!("failed to write {}", self.text_path.display()))?;
        info!("Text report saved: {}", self.text_path.display());
        Ok(text)
    }
}

/// Render the fixed-layout text report
///
/// Sections in order: header, overall statistics, latency statistics (only
/// when present), per-server distribution with proportional bars, and the
/// top failure reasons (only when there are failures).
pub fn render_text_report(report: &AggregateReport) -> String {
    let rule_eq = "=".repeat(REPORT_RULE_WIDTH);
    let rule_dash = "-".repeat(REPORT_RULE_WIDTH);
    let mut out = String::new();

    writeln!(out, "{}", rule_eq).ok();
    writeln!(out, "Fleet Load Test - Aggregated Metrics Report").ok();
    writeln!(out, "{}", rule_eq).ok();
    writeln!(out).ok();

    writeln!(out, "OVERALL STATISTICS").ok();
    writeln!(out, "{}", rule_dash).ok();
    writeln!(out, "Total Requests:       {}", format_count(report.total_requests)).ok();
    writeln!(out, "Successful Requests:  {}", format_count(report.successful_requests)).ok();
    writeln!(out, "Failed Requests:      {}", format_count(report.failed_requests)).ok();
    writeln!(out, "Failure Rate:         {:.2}%", report.failure_rate).ok();
    writeln!(out).ok();

    if let Some(lat) = &report.latency_stats {
        writeln!(out, "REQUEST LATENCY (Successful Requests)").ok();
        writeln!(out, "{}", rule_dash).ok();
        writeln!(out, "Minimum:              {:.2} ms", lat.min_ms).ok();
        writeln!(out, "Maximum:              {:.2} ms", lat.max_ms).ok();
        writeln!(out, "Average:              {:.2} ms", lat.avg_ms).ok();
        writeln!(out, "Median (P50):         {:.2} ms", lat.median_ms).ok();
        writeln!(out, "95th Percentile:      {:.2} ms", lat.p95_ms).ok();
        writeln!(out, "99th Percentile:      {:.2} ms", lat.p99_ms).ok();
        writeln!(out).ok();
    }

    writeln!(out, "LOAD BALANCING - Server Distribution").ok();
    writeln!(out, "{}", rule_dash).ok();
    let total_assigned: u64 = report.server_distribution.values().sum();
    for (&server_id, &count) in &report.server_distribution {
        let percentage = if total_assigned > 0 {
            count as f64 / total_assigned as f64 * 100.0
        } else {
            0.0
        };
        let bar = "\u{2588}".repeat((percentage / 2.0) as usize);
        writeln!(
            out,
            "Server {:>2}: {:>8} requests ({:>5.2}%) {}",
            server_id,
            format_count(count),
            percentage,
            bar
        )
        .ok();
    }
    writeln!(out).ok();

    if report.failed_requests > 0 {
        writeln!(out, "FAILURE ANALYSIS").ok();
        writeln!(out, "{}", rule_dash).ok();

        let mut reasons: Vec<(&String, &u64)> = report.failure_reasons.iter().collect();
        // Descending by count; ties broken by label so output is stable
        reasons.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (reason, &count) in reasons.into_iter().take(TOP_FAILURE_REASONS) {
            let percentage = count as f64 / report.failed_requests as f64 * 100.0;
            writeln!(
                out,
                "{:<width$}: {:>6} ({:>5.2}%)",
                truncate_label(reason, REASON_LABEL_WIDTH),
                format_count(count),
                percentage,
                width = REASON_LABEL_WIDTH
            )
            .ok();
        }
        writeln!(out).ok();
    }

    writeln!(out, "{}", rule_eq).ok();
    writeln!(out, "End of Report").ok();
    writeln!(out, "{}", rule_eq).ok();

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::LatencyStats;
    use std::collections::BTreeMap;

    fn sample_report() -> AggregateReport {
        AggregateReport {
            total_requests: 150,
            successful_requests: 145,
            failed_requests: 5,
            failure_rate: 3.33,
            server_distribution: [(1, 80), (2, 35), (3, 30)].into_iter().collect(),
            failure_reasons: [("timeout".to_string(), 5)].into_iter().collect(),
            latency_stats: Some(LatencyStats {
                min_ms: 10.0,
                max_ms: 50.0,
                avg_ms: 21.72,
                median_ms: 20.0,
                p95_ms: 50.0,
                p99_ms: 50.0,
            }),
        }
    }

    #[test]
    fn test_report_sections_present() {
        let text = render_text_report(&sample_report());
        assert!(text.contains("Fleet Load Test - Aggregated Metrics Report"));
        assert!(text.contains("OVERALL STATISTICS"));
        assert!(text.contains("REQUEST LATENCY (Successful Requests)"));
        assert!(text.contains("LOAD BALANCING - Server Distribution"));
        assert!(text.contains("FAILURE ANALYSIS"));
        assert!(text.contains("End of Report"));
    }

    #[test]
    fn test_overall_statistics_formatting() {
        let mut report = sample_report();
        report.total_requests = 1234567;
        let text = render_text_report(&report);
        assert!(text.contains("Total Requests:       1,234,567"));
        assert!(text.contains("Failure Rate:         3.33%"));
    }

    #[test]
    fn test_latency_section_absent_without_stats() {
        let mut report = sample_report();
        report.latency_stats = None;
        let text = render_text_report(&report);
        assert!(!text.contains("REQUEST LATENCY"));
    }

    #[test]
    fn test_failure_section_absent_without_failures() {
        let mut report = sample_report();
        report.failed_requests = 0;
        report.failure_reasons.clear();
        let text = render_text_report(&report);
        assert!(!text.contains("FAILURE ANALYSIS"));
    }

    #[test]
    fn test_distribution_bar_length() {
        // Server 1 holds 80 of 145 requests: 55.17%, bar of 27 glyphs
        let text = render_text_report(&sample_report());
        let line = text
            .lines()
            .find(|l| l.starts_with("Server  1:"))
            .expect("server 1 line");
        assert!(line.contains("(55.17%)"));
        assert_eq!(line.matches('\u{2588}').count(), 27);
    }

    #[test]
    fn test_failure_reasons_top_ten_sorted() {
        let mut report = sample_report();
        report.failed_requests = 78;
        report.failure_reasons = (0..12)
            .map(|i| (format!("reason_{:02}", i), i as u64 + 1))
            .collect::<BTreeMap<_, _>>();

        let text = render_text_report(&report);
        // Only the ten largest counts are listed
        assert!(text.contains("reason_11"));
        assert!(text.contains("reason_02"));
        assert!(!text.contains("reason_01:") && !text.contains("reason_01 "));
        assert!(!text.contains("reason_00"));

        // Largest count first
        let pos_11 = text.find("reason_11").unwrap();
        let pos_10 = text.find("reason_10").unwrap();
        assert!(pos_11 < pos_10);
    }

    #[test]
    fn test_failure_label_truncated() {
        let mut report = sample_report();
        let long = "x".repeat(80);
        report.failure_reasons = [(long, 5u64)].into_iter().collect();
        let text = render_text_report(&report);
        assert!(text.contains(&"x".repeat(50)));
        assert!(!text.contains(&"x".repeat(51)));
    }

    #[test]
    fn test_writer_derives_text_path() {
        let writer = ReportWriter::new(Path::new("/tmp/out/report.json"));
        assert_eq!(writer.text_path(), Path::new("/tmp/out/report.txt"));
    }

    #[test]
    fn test_writer_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("report.json");
        let writer = ReportWriter::new(&json_path);
        let report = sample_report();

        writer.write_json(&report).unwrap();
        let text = writer.write_text(&report).unwrap();

        let parsed: AggregateReport =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed.total_requests, report.total_requests);
        assert_eq!(
            fs::read_to_string(dir.path().join("report.txt")).unwrap(),
            text
        );
    }
}
