//! Observer backed by `tracing`

use contracts::{EventLevel, Observer};

/// Forwards dispatcher events to the global `tracing` subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Observer for TracingObserver {
    fn emit(&self, level: EventLevel, message: &str) {
        match level {
            EventLevel::Debug => tracing::debug!(target: "listing_export", "{message}"),
            EventLevel::Info => tracing::info!(target: "listing_export", "{message}"),
            EventLevel::Warn => tracing::warn!(target: "listing_export", "{message}"),
            EventLevel::Error => tracing::error!(target: "listing_export", "{message}"),
        }
    }
}
