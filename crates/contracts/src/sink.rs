//! RecordSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for writers and remote delivery.

use crate::{ContractError, Record};

/// Writer for one batch of records
///
/// One implementation per output format plus one for HTTP delivery. The
/// dispatcher calls `write` once with the whole batch, then `close`.
#[trait_variant::make(RecordSink: Send)]
pub trait LocalRecordSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Persist a whole batch of records
    ///
    /// # Errors
    /// `ContractError::SinkWrite` naming the sink, or `DeliveryFailed` for HTTP
    async fn write(&mut self, records: &[Record]) -> Result<(), ContractError>;

    /// Release any handle held by the sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
