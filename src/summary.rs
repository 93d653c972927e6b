use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// On-disk envelope of one per-client summary document
///
/// Clients write a JSON object with the statistics nested under
/// `aggregated_stats`, alongside metadata such as the client name and test
/// duration. Only the name (for logging) and the stats block are read here;
/// any other fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryFile {
    /// Self-reported client identifier, used only for debug logging
    #[serde(default)]
    pub client_name: Option<String>,

    /// The client's reduced statistics
    #[serde(default)]
    pub aggregated_stats: ClientSummary,
}

/// One client's self-reported statistics for a test run
///
/// All fields are defaulted so partially-written summaries still load; the
/// aggregator treats missing counters as zero. The three counters need not
/// sum consistently — if the source data is inconsistent the sums are simply
/// carried through. The latency fields are meaningful only when
/// `successful_requests > 0`.
///
/// Clients also write derived fields (their own failure rate and per-client
/// percentiles); those are recomputed fleet-wide and ignored on input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSummary {
    #[serde(default)]
    pub total_requests: u64,

    #[serde(default)]
    pub successful_requests: u64,

    #[serde(default)]
    pub failed_requests: u64,

    /// Fastest successful request observed by this client, in milliseconds
    #[serde(default)]
    pub latency_min_ms: f64,

    /// Mean latency over this client's successful requests, in milliseconds
    #[serde(default)]
    pub latency_avg_ms: f64,

    /// Slowest successful request observed by this client, in milliseconds
    #[serde(default)]
    pub latency_max_ms: f64,

    /// Requests routed to each backend server id
    #[serde(default)]
    pub server_distribution: HashMap<u32, u64>,

    /// Failure counts keyed by reason label
    #[serde(default)]
    pub failure_reasons: HashMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document_parses() {
        let doc = r#"{
            "client_name": "client_3",
            "test_duration_secs": 60,
            "aggregated_stats": {
                "total_requests": 100,
                "successful_requests": 95,
                "failed_requests": 5,
                "failure_rate": 5.0,
                "latency_min_ms": 10,
                "latency_avg_ms": 20.5,
                "latency_max_ms": 50,
                "latency_p95_ms": 45,
                "server_distribution": {"1": 60, "2": 35},
                "failure_reasons": {"timeout": 5}
            }
        }"#;

        let file: SummaryFile = serde_json::from_str(doc).unwrap();
        assert_eq!(file.client_name.as_deref(), Some("client_3"));

        let stats = file.aggregated_stats;
        assert_eq!(stats.total_requests, 100);
        assert_eq!(stats.successful_requests, 95);
        assert_eq!(stats.failed_requests, 5);
        assert_eq!(stats.latency_min_ms, 10.0);
        assert_eq!(stats.latency_avg_ms, 20.5);
        assert_eq!(stats.latency_max_ms, 50.0);
        assert_eq!(stats.server_distribution.get(&1), Some(&60));
        assert_eq!(stats.server_distribution.get(&2), Some(&35));
        assert_eq!(stats.failure_reasons.get("timeout"), Some(&5));
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let file: SummaryFile =
            serde_json::from_str(r#"{"aggregated_stats": {"total_requests": 7}}"#).unwrap();

        let stats = file.aggregated_stats;
        assert_eq!(stats.total_requests, 7);
        assert_eq!(stats.successful_requests, 0);
        assert_eq!(stats.failed_requests, 0);
        assert_eq!(stats.latency_avg_ms, 0.0);
        assert!(stats.server_distribution.is_empty());
        assert!(stats.failure_reasons.is_empty());
    }

    #[test]
    fn test_missing_stats_block_defaults() {
        let file: SummaryFile = serde_json::from_str(r#"{"client_name": "c1"}"#).unwrap();
        assert_eq!(file.aggregated_stats.total_requests, 0);
    }

    #[test]
    fn test_non_numeric_server_key_is_an_error() {
        // Hand-edited files with non-numeric server ids are rejected as
        // malformed rather than silently reinterpreted.
        let result: Result<SummaryFile, _> = serde_json::from_str(
            r#"{"aggregated_stats": {"server_distribution": {"primary": 10}}}"#,
        );
        assert!(result.is_err());
    }
}
