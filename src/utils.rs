//! # Utility Functions and Helper Module
//!
//! Small pure helpers shared across the report renderers: numeric formatting
//! for human-readable output and the boundary rounding applied to derived
//! statistics.

/// Round a value to 2 decimal places
///
/// Applied only at output boundaries (the report and the latency-stats
/// block); internal computation keeps full precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format an integer with thousands separators
///
/// ## Examples
///
/// ```rust
/// # use fleet_metrics::utils::format_count;
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(42), "42");
/// ```
pub fn format_count(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;

    for c in s.chars().rev() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
        count += 1;
    }

    result.chars().rev().collect()
}

/// Truncate a label to at most `max` characters
///
/// Operates on character boundaries, so multi-byte labels never split a
/// code point.
pub fn truncate_label(label: &str, max: usize) -> String {
    label.chars().take(max).collect()
}
