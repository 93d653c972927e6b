//! The aggregation core: distribution reconstruction, counter merging, and
//! percentile estimation.
//!
//! Clients report only min/avg/max for latency, so the fleet-wide
//! distribution must be reconstructed from those three numbers. Each client
//! contributes a bounded set of representative points (weighted toward the
//! reported average, with the true extremes preserved) and percentiles are
//! estimated over the merged pool. Counter merging, by contrast, is exact:
//! totals and map-valued counters are plain sums.

use crate::cli::{AggregationConfig, PercentileMethod};
use crate::summary::ClientSummary;
use crate::utils::round2;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Fleet-wide latency statistics derived from the reconstructed sample pool
///
/// All values are rounded to 2 decimal places at this boundary; internal
/// computation uses full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub min_ms: f64,
    pub max_ms: f64,
    pub avg_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

/// The fleet-wide aggregation result
///
/// Counters are exact sums across all clients; `latency_stats` is an
/// approximation and is absent when no client contributed latency evidence.
/// The map-valued counters use `BTreeMap` so JSON output and report
/// iteration order are deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,

    /// Failed share of all requests, as a percentage rounded to 2 decimals
    pub failure_rate: f64,

    pub server_distribution: BTreeMap<u32, u64>,
    pub failure_reasons: BTreeMap<String, u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_stats: Option<LatencyStats>,
}

/// The merged multiset of reconstructed latency values
///
/// Built incrementally while folding client summaries; order is irrelevant
/// until percentile estimation, which sorts a copy. Never mutated after
/// aggregation completes.
#[derive(Debug, Clone, Default)]
pub struct SamplePool {
    samples: Vec<f64>,
}

impl SamplePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one client's reconstructed points
    pub fn extend(&mut self, points: Vec<f64>) {
        self.samples.extend(points);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Compute the latency statistics block over this pool
    ///
    /// Returns `None` for an empty pool. The median is always the explicit
    /// middle-value statistic; only p95/p99 use the configured estimator.
    pub fn statistics(&self, method: PercentileMethod) -> Option<LatencyStats> {
        if self.samples.is_empty() {
            return None;
        }

        let mut sorted = self.samples.clone();
        sorted.sort_by(f64::total_cmp);

        let sum: f64 = sorted.iter().sum();
        let mean = sum / sorted.len() as f64;

        let estimate = |p: f64| match method {
            PercentileMethod::Linear => utils::percentile_linear(&sorted, p),
            PercentileMethod::NearestRank => utils::percentile_nearest_rank(&sorted, p),
        };

        Some(LatencyStats {
            min_ms: round2(sorted[0]),
            max_ms: round2(sorted[sorted.len() - 1]),
            avg_ms: round2(mean),
            median_ms: round2(utils::median(&sorted)),
            p95_ms: round2(estimate(95.0)),
            p99_ms: round2(estimate(99.0)),
        })
    }
}

/// Reconstruct representative latency points from one client's summary
///
/// A client that served `n` successful requests contributes
/// `k = min(n, cap)` points: `k/3` copies of its reported minimum, `k/3`
/// copies of its average, and the remaining `k - 2*(k/3)` copies of its
/// maximum. The extremes of the reconstructed pool therefore match the true
/// extremes, and the remainder of the division by 3 lands in the max bucket.
///
/// Clients with no successful requests or a non-positive average contribute
/// nothing. Out-of-range values pass through unchanged; validation is not
/// this function's concern.
pub fn reconstruct_samples(summary: &ClientSummary, cap: usize) -> Vec<f64> {
    if summary.successful_requests == 0 || summary.latency_avg_ms <= 0.0 {
        return Vec::new();
    }

    let k = (summary.successful_requests as usize).min(cap);
    let third = k / 3;

    let mut points = Vec::with_capacity(k);
    points.resize(third, summary.latency_min_ms);
    points.extend(std::iter::repeat(summary.latency_avg_ms).take(third));
    points.extend(std::iter::repeat(summary.latency_max_ms).take(k - 2 * third));
    points
}

/// Fold a set of client summaries into the fleet-wide report and sample pool
///
/// Merging is commutative and associative: counters are summed, map-valued
/// counters are merged by key, and each client's reconstructed points are
/// concatenated into the pool. An empty input is an error so callers can
/// distinguish "nothing to aggregate" from "aggregated and found nothing".
pub fn aggregate_summaries(
    summaries: &[ClientSummary],
    config: &AggregationConfig,
) -> Result<(AggregateReport, SamplePool)> {
    if summaries.is_empty() {
        bail!("cannot aggregate an empty set of client summaries");
    }

    let mut total_requests: u64 = 0;
    let mut successful_requests: u64 = 0;
    let mut failed_requests: u64 = 0;
    let mut server_distribution: BTreeMap<u32, u64> = BTreeMap::new();
    let mut failure_reasons: BTreeMap<String, u64> = BTreeMap::new();
    let mut pool = SamplePool::new();

    for summary in summaries {
        total_requests += summary.total_requests;
        successful_requests += summary.successful_requests;
        failed_requests += summary.failed_requests;

        for (&server_id, &count) in &summary.server_distribution {
            *server_distribution.entry(server_id).or_insert(0) += count;
        }

        for (reason, &count) in &summary.failure_reasons {
            *failure_reasons.entry(reason.clone()).or_insert(0) += count;
        }

        let points = reconstruct_samples(summary, config.sample_cap);
        debug!(
            "Reconstructed {} latency samples from a client with {} successful requests",
            points.len(),
            summary.successful_requests
        );
        pool.extend(points);
    }

    let failure_rate = if total_requests > 0 {
        round2(failed_requests as f64 / total_requests as f64 * 100.0)
    } else {
        0.0
    };

    let latency_stats = pool.statistics(config.percentile_method);

    info!(
        "Aggregated {} client summaries into a pool of {} samples",
        summaries.len(),
        pool.len()
    );

    let report = AggregateReport {
        total_requests,
        successful_requests,
        failed_requests,
        failure_rate,
        server_distribution,
        failure_reasons,
        latency_stats,
    };

    Ok((report, pool))
}

/// Percentile estimators over sorted sample data
pub mod utils {
    /// Linear interpolation between the two closest order statistics
    ///
    /// For a zero-indexed sorted slice of length `m`, the fractional rank is
    /// `(m - 1) * p / 100`; the result interpolates between the samples at
    /// the neighboring integer ranks. Deterministic and continuous in `p`.
    pub fn percentile_linear(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }
        let rank = (sorted.len() - 1) as f64 * p / 100.0;
        let lo = rank as usize;
        let hi = lo + 1;
        if hi >= sorted.len() {
            return sorted[sorted.len() - 1];
        }
        sorted[lo] * (hi as f64 - rank) + sorted[hi] * (rank - lo as f64)
    }

    /// The sample at the rank nearest to the requested percentile
    ///
    /// The coarser estimator used by the clients themselves; always returns
    /// an actual sample value.
    pub fn percentile_nearest_rank(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }
        let rank = (sorted.len() - 1) as f64 * p / 100.0;
        let index = (rank.round() as usize).min(sorted.len() - 1);
        sorted[index]
    }

    /// The middle value, or the mean of the two middles for even length
    pub fn median(sorted: &[f64]) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }
}
