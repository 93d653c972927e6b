//! # Fleet Metrics Aggregation Library
//!
//! This library merges per-client load-test summaries into a single fleet-wide
//! report. Each client in a distributed stress test reduces its raw request
//! measurements to a small JSON summary; this crate collects those summaries,
//! sums the exact counters, reconstructs an approximate latency distribution
//! from the lossy per-client statistics, and renders the result as structured
//! JSON, a human-readable text report, and a latency histogram image.
//!
//! ## Architecture Overview
//!
//! The library is organized into several key modules:
//!
//! - `loader`: Discovery and parsing of per-client summary files
//! - `summary`: The serde data model for one client's summary document
//! - `metrics`: The aggregation core — distribution reconstruction, counter
//!   merging, and percentile estimation
//! - `results`: Report serialization and text-report rendering
//! - `plot`: Latency histogram rendering
//! - `cli`: Command-line interface parsing and aggregation configuration
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use fleet_metrics::{aggregate_summaries, load_summaries, AggregationConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let summaries = load_summaries(std::path::Path::new("./metrics"))?;
//!     let config = AggregationConfig::default();
//!     let (report, pool) = aggregate_summaries(&summaries, &config)?;
//!
//!     println!("Total requests: {}", report.total_requests);
//!     println!("Reconstructed samples: {}", pool.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Accuracy Characteristics
//!
//! Counter merging (totals, per-server distribution, failure reasons) is
//! exact. Latency statistics are approximate by construction: clients report
//! only min/avg/max, so the fleet-wide distribution is reconstructed from
//! representative points and any percentile derived from it is an estimate,
//! not a measurement.

/// Command-line interface and aggregation configuration
///
/// Provides argument parsing using clap and converts user-friendly CLI options
/// into the `AggregationConfig` consumed by the aggregation core. Includes
/// argument validation and the selectable percentile estimation method.
pub mod cli;

/// Summary file discovery and parsing
///
/// Scans a metrics directory for per-client summary documents, supporting both
/// the flat layout (JSON files directly in the directory) and the
/// machine-grouped layout (`machine_*` subdirectories). Unreadable or
/// malformed files are skipped with a warning rather than failing the run.
pub mod loader;

/// Log output formatting
pub mod logging;

/// The aggregation core
///
/// Implements the three algorithmic pieces of this tool:
/// - Distribution reconstruction: representative latency points from one
///   client's min/avg/max summary
/// - Counter merging: exact summation of totals and map-valued counters
///   across clients
/// - Percentile estimation: linear-interpolation (or nearest-rank) statistics
///   over the merged sample pool
pub mod metrics;

/// Latency histogram rendering
pub mod plot;

/// Report output
///
/// Serializes the aggregate report to pretty-printed JSON and renders the
/// fixed-layout text report with per-server distribution bars and failure
/// analysis.
pub mod results;

/// Per-client summary data model
pub mod summary;

pub mod utils;

// Re-export key types for convenient library usage

/// Aggregation entry points and result types
///
/// `aggregate_summaries` is the primary interface: it folds a slice of client
/// summaries into the fleet-wide `AggregateReport` plus the reconstructed
/// `SamplePool` used for histogram rendering.
pub use metrics::{aggregate_summaries, AggregateReport, LatencyStats, SamplePool};

/// Command-line interface types
pub use cli::{AggregationConfig, Args, PercentileMethod};

/// Summary loading
pub use loader::load_summaries;

/// Histogram rendering
pub use plot::HistogramRenderer;

/// Report output
pub use results::{render_text_report, ReportWriter};

/// Input data model
pub use summary::{ClientSummary, SummaryFile};

/// The current version of the fleet metrics tool
///
/// This version string is automatically populated from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Default cap on reconstructed samples per client
    ///
    /// Each client contributes at most this many representative latency
    /// points to the fleet-wide pool, regardless of how many requests it
    /// actually served. This bounds memory and prevents a single
    /// high-volume client from dominating the pool purely by request count.
    pub const SAMPLE_CAP: usize = 100;

    /// Number of bins in the latency histogram image
    pub const HISTOGRAM_BINS: usize = 50;

    /// Maximum number of failure reasons listed in the text report
    pub const TOP_FAILURE_REASONS: usize = 10;

    /// Width of the horizontal rules in the text report
    pub const REPORT_RULE_WIDTH: usize = 60;
}
