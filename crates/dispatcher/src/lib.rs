//! # Dispatcher
//!
//! Persistence module for scraped listings.
//!
//! Responsibilities:
//! - Consume a batch of `Record`s and a `Destination`
//! - Route to exactly one writer (CSV / JSON / XLSX / SQLite) chosen by suffix
//! - Or deliver the batch to a remote endpoint with fixed-delay retries
//! - Report the result as a value instead of a log side effect

pub mod dispatcher;
pub mod error;
pub mod retry;
pub mod sinks;

pub use contracts::{Destination, DeliveryOutcome, OutputFormat, Record, RecordSink};
pub use dispatcher::{Dispatcher, DispatcherConfig, PersistOutcome, SkipReason, create_dispatcher};
pub use error::DispatcherError;
pub use retry::{FixedDelayPolicy, RetryPolicy, deliver_with_retry};
pub use sinks::{CsvSink, HttpSink, HttpSinkConfig, JsonSink, SqliteSink, XlsxSink};

/// Loopback HTTP stub shared by unit and cross-crate tests
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
