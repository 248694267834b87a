//! CsvSink - comma-separated output with a header row

use std::path::PathBuf;

use contracts::{ContractError, Record, RecordSink};
use tracing::{debug, instrument};

/// Sink that writes records as UTF-8 CSV
///
/// The header is the key order of the first record. Each row is looked up
/// by header column, so later records may order their keys differently.
/// A header column missing from a record becomes an empty cell; a key that
/// is not in the header is rejected before the file is created.
pub struct CsvSink {
    name: String,
    path: PathBuf,
}

impl CsvSink {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    fn check_fields(&self, header: &[&str], records: &[Record]) -> Result<(), ContractError> {
        for (idx, record) in records.iter().enumerate() {
            if let Some(extra) = record.keys().find(|k| !header.contains(k)) {
                return Err(ContractError::sink_write(
                    &self.name,
                    format!("record {idx} contains field '{extra}' not in header"),
                ));
            }
        }
        Ok(())
    }

    fn write_rows(&self, header: &[&str], records: &[Record]) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_path(&self.path)?;

        writer.write_record(header)?;
        for record in records {
            writer.write_record(header.iter().map(|col| record.get(col).unwrap_or("")))?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl RecordSink for CsvSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "csv_sink_write",
        skip(self, records),
        fields(sink = %self.name, path = %self.path.display(), records = records.len())
    )]
    async fn write(&mut self, records: &[Record]) -> Result<(), ContractError> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        let header: Vec<&str> = first.keys().collect();

        self.check_fields(&header, records)?;
        self.write_rows(&header, records)
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;

        debug!(sink = %self.name, rows = records.len(), "CSV written");
        Ok(())
    }

    #[instrument(name = "csv_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}
