//! Dispatch metrics collection
//!
//! Counters only; no exporter is installed here. Whatever recorder the
//! embedding process registers picks these up.

use metrics::counter;

/// Record one incoming line
pub fn record_line(len: usize) {
    counter!("logrelay_lines_total").increment(1);
    counter!("logrelay_bytes_total").increment(len as u64);
}

/// Record a line rejected by the filter
pub fn record_filtered_out() {
    counter!("logrelay_lines_filtered_total").increment(1);
}

/// Record a successful publish
pub fn record_published(len: usize) {
    counter!("logrelay_published_total").increment(1);
    counter!("logrelay_published_bytes_total").increment(len as u64);
}

/// Record a failed publish
pub fn record_publish_error() {
    counter!("logrelay_publish_errors_total").increment(1);
}

/// Record a failed mirror write
pub fn record_mirror_error() {
    counter!("logrelay_mirror_errors_total").increment(1);
}
