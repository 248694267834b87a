//! SqliteSink - appends records to a table in a SQLite file

use std::path::PathBuf;

use contracts::{ContractError, Record, RecordSink};
use rusqlite::{params_from_iter, Connection};
use tracing::{debug, instrument};

/// Sink that appends one row per record
///
/// The table is created on first use with one TEXT column per key of the
/// first record. Each insert binds the record's own values in its own key
/// order, so a record with a different field count fails at its row.
/// Statements run in autocommit mode: rows before a failing row stay.
pub struct SqliteSink {
    name: String,
    path: PathBuf,
    table_name: String,
}

impl SqliteSink {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            table_name: table_name.into(),
        }
    }

    fn insert_all(&self, records: &[Record]) -> Result<usize, ContractError> {
        let Some(first) = records.first() else {
            return Ok(0);
        };

        let conn = Connection::open(&self.path).map_err(|e| self.write_error(e))?;

        let table = quote_ident(&self.table_name);
        let columns: Vec<String> = first
            .keys()
            .map(|key| format!("{} TEXT", quote_ident(key)))
            .collect();
        conn.execute(
            &format!("CREATE TABLE IF NOT EXISTS {table} ({})", columns.join(", ")),
            [],
        )
        .map_err(|e| self.write_error(e))?;

        for (idx, record) in records.iter().enumerate() {
            let placeholders = vec!["?"; record.len()].join(", ");
            conn.execute(
                &format!("INSERT INTO {table} VALUES ({placeholders})"),
                params_from_iter(record.values()),
            )
            .map_err(|e| {
                ContractError::sink_write(&self.name, format!("row {idx}: {e}"))
            })?;
        }

        conn.close().map_err(|(_, e)| self.write_error(e))?;
        Ok(records.len())
    }

    fn write_error(&self, e: rusqlite::Error) -> ContractError {
        ContractError::sink_write(&self.name, e.to_string())
    }
}

/// Double-quote an identifier, doubling embedded quotes
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

impl RecordSink for SqliteSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "sqlite_sink_write",
        skip(self, records),
        fields(sink = %self.name, path = %self.path.display(), table = %self.table_name)
    )]
    async fn write(&mut self, records: &[Record]) -> Result<(), ContractError> {
        let rows = self.insert_all(records)?;
        debug!(sink = %self.name, rows, "Rows inserted");
        Ok(())
    }

    #[instrument(name = "sqlite_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn listing(title: &str, link: &str) -> Record {
        [("title", title), ("image", "x.png"), ("link", link)]
            .into_iter()
            .collect()
    }

    fn read_titles(path: &std::path::Path, table: &str) -> Vec<String> {
        let conn = Connection::open(path).unwrap();
        let mut stmt = conn
            .prepare(&format!("SELECT title FROM {} ORDER BY rowid", quote_ident(table)))
            .unwrap();
        stmt.query_map([], |row| row.get::<_, String>(0))
            .unwrap()
            .map(Result::unwrap)
            .collect()
    }

    #[tokio::test]
    async fn test_sqlite_creates_and_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.sqlite");

        let mut sink = SqliteSink::new("sqlite", &path, "products");
        sink.write(&[listing("Keyboard", "/dp/1")]).await.unwrap();
        sink.write(&[listing("Mouse", "/dp/2")]).await.unwrap();
        sink.close().await.unwrap();

        assert_eq!(read_titles(&path, "products"), vec!["Keyboard", "Mouse"]);
    }

    #[tokio::test]
    async fn test_columns_are_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.sqlite");

        SqliteSink::new("sqlite", &path, "items")
            .write(&[listing("Keyboard", "/dp/1")])
            .await
            .unwrap();

        let conn = Connection::open(&path).unwrap();
        let mut stmt = conn.prepare("PRAGMA table_info(\"items\")").unwrap();
        let columns: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(1)?, row.get(2)?)))
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(
            columns,
            vec![
                ("title".to_string(), "TEXT".to_string()),
                ("image".to_string(), "TEXT".to_string()),
                ("link".to_string(), "TEXT".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_arity_mismatch_fails_at_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.sqlite");
        let short: Record = [("title", "Mouse")].into_iter().collect();
        let records = vec![listing("Keyboard", "/dp/1"), short];

        let err = SqliteSink::new("sqlite", &path, "products")
            .write(&records)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("row 1"), "{err}");
        assert_eq!(read_titles(&path, "products"), vec!["Keyboard"]);
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("products"), "\"products\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
