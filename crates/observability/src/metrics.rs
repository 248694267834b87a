//! Export metrics
//!
//! Thin helpers over the `metrics` facade. Without an installed recorder every
//! call is a no-op.

use metrics::{counter, histogram};

/// Records written to a local file
pub fn record_persisted(format: &str, rows: usize) {
    counter!(
        "listing_export_records_persisted_total",
        "format" => format.to_string()
    )
    .increment(rows as u64);
}

/// Outcome of one remote delivery
pub fn record_delivery(attempts: u32, delivered: bool) {
    let result = if delivered { "delivered" } else { "exhausted" };
    counter!(
        "listing_export_delivery_attempts_total",
        "result" => result
    )
    .increment(u64::from(attempts));
    histogram!("listing_export_delivery_attempts").record(f64::from(attempts));
}

/// A persist call that ended in an error, labelled by error kind
pub fn record_persist_failure(kind: &str) {
    counter!(
        "listing_export_persist_failures_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}
