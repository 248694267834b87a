//! Sink implementations
//!
//! One sink per output format, plus HttpSink for remote delivery.

mod delimited;
mod http;
mod json;
mod spreadsheet;
mod sqlite;

pub use self::delimited::CsvSink;
pub use self::http::{HttpSink, HttpSinkConfig};
pub use self::json::JsonSink;
pub use self::spreadsheet::XlsxSink;
pub use self::sqlite::SqliteSink;
