//! Discovery and parsing of per-client summary files.
//!
//! The metrics directory either contains summary JSON files directly (the
//! legacy flat layout) or groups them into `machine_*` subdirectories, one
//! per originating host. Both layouts can be mixed. A file that cannot be
//! read or parsed is skipped with a warning; only an unreadable metrics
//! directory itself fails the run.

use crate::summary::{ClientSummary, SummaryFile};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load all client summaries from a metrics directory
///
/// Scans exactly one level: top-level `*.json` files and `*.json` files
/// inside `machine_*` subdirectories. Anything else is ignored. Entries are
/// processed in sorted path order so logs are deterministic; the aggregation
/// result does not depend on order either way.
pub fn load_summaries(metrics_dir: &Path) -> Result<Vec<ClientSummary>> {
    let mut summaries = Vec::new();

    for entry in sorted_entries(metrics_dir)? {
        let name = entry.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if entry.is_dir() && name.starts_with("machine_") {
            info!("Loading metrics from {}/", name);
            let machine_files = match sorted_entries(&entry) {
                Ok(files) => files,
                Err(e) => {
                    warn!("Failed to read {}: {:#}", entry.display(), e);
                    continue;
                }
            };
            for file in machine_files {
                if file.extension().and_then(|e| e.to_str()) == Some("json") {
                    load_one(&file, &mut summaries);
                }
            }
        } else if entry.extension().and_then(|e| e.to_str()) == Some("json") {
            load_one(&entry, &mut summaries);
        }
    }

    info!("Loaded {} metric files", summaries.len());
    Ok(summaries)
}

fn sorted_entries(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read metrics directory {}", dir.display()))?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| match entry {
            Ok(e) => Some(e.path()),
            Err(e) => {
                warn!("Failed to read directory entry in {}: {}", dir.display(), e);
                None
            }
        })
        .collect();
    paths.sort();
    Ok(paths)
}

fn load_one(path: &Path, summaries: &mut Vec<ClientSummary>) {
    match parse_summary_file(path) {
        Ok(file) => {
            if let Some(name) = &file.client_name {
                debug!("Loaded summary from client {}", name);
            }
            summaries.push(file.aggregated_stats);
        }
        Err(e) => warn!("Failed to load {}: {:#}", path.display(), e),
    }
}

fn parse_summary_file(path: &Path) -> Result<SummaryFile> {
    let contents = fs::read_to_string(path).context("read failed")?;
    serde_json::from_str(&contents).context("parse failed")
}
