//! JsonSink - pretty-printed array of objects

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use contracts::{ContractError, Record, RecordSink};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, instrument};

const INDENT: &[u8] = b"    ";

/// Sink that writes the whole batch as one JSON array
///
/// Four-space indentation; non-ASCII characters are written literally.
pub struct JsonSink {
    name: String,
    path: PathBuf,
}

impl JsonSink {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    fn write_to_disk(&self, records: &[Record]) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        let mut serializer =
            Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
        records
            .serialize(&mut serializer)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writer.flush()
    }
}

impl RecordSink for JsonSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "json_sink_write",
        skip(self, records),
        fields(sink = %self.name, path = %self.path.display(), records = records.len())
    )]
    async fn write(&mut self, records: &[Record]) -> Result<(), ContractError> {
        self.write_to_disk(records)
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;
        debug!(sink = %self.name, rows = records.len(), "JSON written");
        Ok(())
    }

    #[instrument(name = "json_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}
