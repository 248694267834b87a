//! XlsxSink - single-sheet spreadsheet output

use std::path::PathBuf;

use contracts::{ContractError, Record, RecordSink};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::{debug, instrument};

/// Sink that writes records to one worksheet
///
/// Columns are the union of every record's keys in first-seen order, so a
/// key missing from some records leaves those cells empty. There is no
/// row-index column.
pub struct XlsxSink {
    name: String,
    path: PathBuf,
}

impl XlsxSink {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    fn save_workbook(&self, records: &[Record]) -> Result<(), XlsxError> {
        let columns = column_union(records);
        let header_format = Format::new().set_bold();
        let mut workbook = Workbook::new();

        {
            let sheet = workbook.add_worksheet();
            for (col, name) in columns.iter().enumerate() {
                sheet.write_string_with_format(0, col_index(col)?, *name, &header_format)?;
            }

            for (idx, record) in records.iter().enumerate() {
                let row = row_index(idx + 1)?;
                for (col, name) in columns.iter().enumerate() {
                    if let Some(value) = record.get(name) {
                        sheet.write_string(row, col_index(col)?, value)?;
                    }
                }
            }
        }

        workbook.save(&self.path)
    }
}

/// Union of all keys, ordered by first appearance
pub(crate) fn column_union(records: &[Record]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for key in records.iter().flat_map(Record::keys) {
        if !columns.contains(&key) {
            columns.push(key);
        }
    }
    columns
}

fn col_index(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

fn row_index(row: usize) -> Result<u32, XlsxError> {
    u32::try_from(row).map_err(|_| XlsxError::RowColumnLimitError)
}

impl RecordSink for XlsxSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "xlsx_sink_write",
        skip(self, records),
        fields(sink = %self.name, path = %self.path.display(), records = records.len())
    )]
    async fn write(&mut self, records: &[Record]) -> Result<(), ContractError> {
        self.save_workbook(records)
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;
        debug!(sink = %self.name, rows = records.len(), "Spreadsheet written");
        Ok(())
    }

    #[instrument(name = "xlsx_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}
