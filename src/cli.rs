use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fleet Metrics Aggregator - merge per-client load-test summaries into one report
#[derive(Parser, Debug, Clone)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Directory containing per-client summary files (flat JSON files or
    /// machine_* subdirectories)
    #[clap(long)]
    pub metrics_dir: PathBuf,

    /// Output path for the JSON report (the text report is written alongside
    /// it with a .txt extension)
    #[clap(long)]
    pub output_json: PathBuf,

    /// Output path for the latency histogram image (PNG)
    #[clap(long)]
    pub output_plot: PathBuf,

    /// Maximum number of reconstructed latency samples per client
    #[clap(long, default_value_t = crate::defaults::SAMPLE_CAP)]
    pub sample_cap: usize,

    /// Percentile estimation method for p95/p99
    #[clap(long, value_enum, default_value_t = PercentileMethod::Linear)]
    pub percentile_method: PercentileMethod,

    /// Verbose output
    #[clap(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Validate argument combinations that clap cannot express
    pub fn validate(&self) -> Result<()> {
        if self.sample_cap == 0 {
            bail!("sample cap must be at least 1");
        }
        Ok(())
    }
}

// derive(Default) would not apply the clap defaults, so tests construct Args
// via this impl and override what they need.
impl Default for Args {
    fn default() -> Self {
        Self {
            metrics_dir: PathBuf::from("./metrics"),
            output_json: PathBuf::from("aggregated_metrics.json"),
            output_plot: PathBuf::from("latency_distribution.png"),
            sample_cap: crate::defaults::SAMPLE_CAP,
            percentile_method: PercentileMethod::Linear,
            verbose: false,
        }
    }
}

/// Available percentile estimators for p95/p99
///
/// The median is always the explicit middle-value statistic; only the high
/// percentiles switch between these estimators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum PercentileMethod {
    /// Linear interpolation between the two closest order statistics
    #[default]
    #[clap(name = "linear")]
    Linear,

    /// The sample at the rank nearest to the requested percentile
    #[clap(name = "nearest-rank")]
    NearestRank,
}

impl std::fmt::Display for PercentileMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PercentileMethod::Linear => write!(f, "linear interpolation"),
            PercentileMethod::NearestRank => write!(f, "nearest rank"),
        }
    }
}

/// Configuration for the aggregation core
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AggregationConfig {
    pub sample_cap: usize,
    pub percentile_method: PercentileMethod,
}

impl From<&Args> for AggregationConfig {
    fn from(args: &Args) -> Self {
        Self {
            sample_cap: args.sample_cap,
            percentile_method: args.percentile_method,
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            sample_cap: crate::defaults::SAMPLE_CAP,
            percentile_method: PercentileMethod::Linear,
        }
    }
}
