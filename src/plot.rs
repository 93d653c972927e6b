//! Latency histogram rendering.
//!
//! Plots the reconstructed sample pool as a 50-bin frequency histogram PNG,
//! annotated with the average, median, and p95. The rendering backend is an
//! implementation detail; callers only hand over the pool, the stats block,
//! and a destination path.

use crate::defaults::HISTOGRAM_BINS;
use crate::metrics::{LatencyStats, SamplePool};
use anyhow::Result;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PLOT_WIDTH: u32 = 1000;
const PLOT_HEIGHT: u32 = 600;

/// Renders the sample-pool histogram to a PNG file
pub struct HistogramRenderer {
    output_path: PathBuf,
}

impl HistogramRenderer {
    pub fn new(output_path: &Path) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
        }
    }

    /// Render the histogram, or skip with a warning for an empty pool
    ///
    /// `stats` is `None` exactly when the pool is empty, per the aggregation
    /// invariant; no file is produced in that case and the run continues.
    pub fn render(&self, pool: &SamplePool, stats: Option<&LatencyStats>) -> Result<()> {
        let stats = match stats {
            Some(stats) if !pool.is_empty() => stats,
            _ => {
                warn!("No latency data available for plotting");
                return Ok(());
            }
        };

        let (range_min, range_max) = sample_range(pool.samples());
        let counts = bin_counts(pool.samples(), range_min, range_max);
        let max_count = counts.iter().copied().max().unwrap_or(1).max(1);
        let bin_width = (range_max - range_min) / HISTOGRAM_BINS as f64;

        let root =
            BitMapBackend::new(&self.output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Request Latency Distribution",
                ("sans-serif", 28).into_font(),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(range_min..range_max, 0u64..(max_count + max_count / 10 + 1))?;

        // Horizontal grid lines only, matching the report's frequency axis
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Latency (ms)")
            .y_desc("Frequency")
            .draw()?;

        chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = range_min + bin_width * i as f64;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0), (x1, count)], BLUE.mix(0.7).filled())
        }))?;
        chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = range_min + bin_width * i as f64;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0), (x1, count)], BLACK.stroke_width(1))
        }))?;

        let annotation = [
            format!("Avg: {:.1}ms", stats.avg_ms),
            format!("Median: {:.1}ms", stats.median_ms),
            format!("P95: {:.1}ms", stats.p95_ms),
        ];
        let style = TextStyle::from(("sans-serif", 18).into_font()).color(&BLACK);
        for (i, line) in annotation.iter().enumerate() {
            root.draw(&Text::new(
                line.clone(),
                (PLOT_WIDTH as i32 - 180, 60 + 24 * i as i32),
                style.clone(),
            ))?;
        }

        root.present()?;
        info!("Plot saved: {}", self.output_path.display());
        Ok(())
    }
}

/// The plotted value range, widened for a single-valued pool so the bins
/// stay well-formed
fn sample_range(samples: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in samples {
        min = min.min(v);
        max = max.max(v);
    }
    if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

/// Equal-width bin counts; the last bin's upper edge is inclusive
fn bin_counts(samples: &[f64], range_min: f64, range_max: f64) -> Vec<u64> {
    let width = (range_max - range_min) / HISTOGRAM_BINS as f64;
    let mut counts = vec![0u64; HISTOGRAM_BINS];
    for &v in samples {
        let index = ((v - range_min) / width) as usize;
        counts[index.min(HISTOGRAM_BINS - 1)] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PercentileMethod;

    #[test]
    fn test_bin_counts_cover_all_samples() {
        let samples: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let counts = bin_counts(&samples, 0.0, 199.0);
        assert_eq!(counts.len(), HISTOGRAM_BINS);
        assert_eq!(counts.iter().sum::<u64>(), 200);
        // The maximum lands in the last bin, not past it
        assert!(counts[HISTOGRAM_BINS - 1] > 0);
    }

    #[test]
    fn test_sample_range_degenerate() {
        assert_eq!(sample_range(&[7.0, 7.0, 7.0]), (6.5, 7.5));
        assert_eq!(sample_range(&[1.0, 9.0]), (1.0, 9.0));
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latency.png");

        let mut pool = SamplePool::new();
        pool.extend(vec![10.0, 12.0, 15.0, 20.0, 20.0, 35.0, 50.0]);
        let stats = pool.statistics(PercentileMethod::Linear).unwrap();

        let renderer = HistogramRenderer::new(&path);
        renderer.render(&pool, Some(&stats)).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn test_render_skips_empty_pool() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latency.png");

        let renderer = HistogramRenderer::new(&path);
        renderer.render(&SamplePool::new(), None).unwrap();

        assert!(!path.exists());
    }
}
