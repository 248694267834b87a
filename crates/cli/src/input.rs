//! Records input: a JSON array of objects whose values are all strings.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use contracts::Record;

use crate::error::{CliError, Result};

/// Load records from `path`, or from stdin when `path` is `-`
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    if path == Path::new("-") {
        return read_records(io::stdin().lock(), "<stdin>");
    }

    let name = path.display().to_string();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CliError::input_not_found(path),
        _ => CliError::input_read(&name, e),
    })?;
    read_records(BufReader::new(file), &name)
}

/// Parse records from any reader
pub fn read_records<R: Read>(reader: R, source_name: &str) -> Result<Vec<Record>> {
    serde_json::from_reader(reader).map_err(|e| CliError::input_parse(source_name, e.to_string()))
}
