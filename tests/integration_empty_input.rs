use anyhow::Result;
use fleet_metrics::{aggregate_summaries, load_summaries, AggregationConfig};

/// An empty metrics directory loads zero summaries, and aggregating an
/// empty set is an error rather than a zeroed report, so the caller can
/// map it to a non-zero exit before writing any output.
#[test]
fn empty_directory_yields_error_outcome() -> Result<()> {
    let input = tempfile::tempdir()?;

    let summaries = load_summaries(input.path())?;
    assert!(summaries.is_empty());

    let result = aggregate_summaries(&summaries, &AggregationConfig::default());
    assert!(result.is_err());
    Ok(())
}

/// A directory that does not exist is a hard error, not an empty result.
#[test]
fn missing_directory_is_fatal() -> Result<()> {
    let input = tempfile::tempdir()?;
    let missing = input.path().join("nope");
    assert!(load_summaries(&missing).is_err());
    Ok(())
}
