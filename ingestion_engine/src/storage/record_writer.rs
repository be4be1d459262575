// @file: ingestion_engine/src/storage/record_writer.rs
// @description: Append-only NDJSON run file per (data kind, coin, run start).
// @author: LAS.

use chrono::NaiveDateTime;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use crate::core::errors::WriteError;
use crate::core::models::{Coin, DataKind};


//
// CONSTANTS
//

// Sortable, filesystem-safe, second precision
const RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";


//
// WRITER
//

#[derive(Debug, Clone)]
pub struct RecordWriter {
    path: PathBuf,
}

impl RecordWriter {
    /// Fixes the run file to `<root>/<kind>/<coin>/<run_started>.ndjson`.
    /// Nothing touches the filesystem until the first record is written.
    pub fn new(root: &Path, kind: DataKind, coin: &Coin, run_started: NaiveDateTime) -> Self {
        let file_name: String = format!("{}.ndjson", run_started.format(RUN_TIMESTAMP_FORMAT));
        RecordWriter {
            path: root.join(kind.path_segment()).join(coin.as_str()).join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends an object, or every object of a (possibly nested) array, as
    /// one compact JSON line each. Returns the number of lines written.
    ///
    /// The whole value is validated first, so an unsupported element anywhere
    /// means nothing is appended.
    pub fn write(&self, value: &Value) -> Result<usize, WriteError> {
        // #1. Flatten & validate
        let mut rows: Vec<String> = Vec::new();
        collect_rows(value, &mut rows)?;

        if rows.is_empty() {
            return Ok(0);
        }

        // #2. Append in one go
        let mut buffer: String = String::with_capacity(rows.iter().map(|r| r.len() + 1).sum());
        for row in &rows {
            buffer.push_str(row);
            buffer.push('\n');
        }
        self.append(buffer.as_bytes())?;

        Ok(rows.len())
    }

    //
    // INTERNAL HELPERS
    //

    fn append(&self, bytes: &[u8]) -> Result<(), WriteError> {
        let io_err = |source: std::io::Error| WriteError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;

        file.write_all(bytes).map_err(io_err)?;
        file.flush().map_err(io_err)
    }
}

fn collect_rows(value: &Value, rows: &mut Vec<String>) -> Result<(), WriteError> {
    match value {
        Value::Object(_) => {
            rows.push(value.to_string());
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                collect_rows(item, rows)?;
            }
            Ok(())
        }
        other => Err(WriteError::UnsupportedDataType(json_kind(other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::TempDir;

    fn run_start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 5, 21).unwrap().and_hms_opt(14, 3, 9).unwrap()
    }

    fn writer(root: &Path) -> RecordWriter {
        RecordWriter::new(root, DataKind::DaySummary, &Coin::new("BTC").unwrap(), run_start())
    }

    #[test]
    fn path_is_derived_from_kind_coin_and_run_start() {
        let writer: RecordWriter = RecordWriter::new(
            Path::new("data"),
            DataKind::TradeHistory,
            &Coin::new("ETH").unwrap(),
            run_start(),
        );
        assert_eq!(writer.path(), Path::new("data/trades/ETH/2022-05-21T14-03-09.ndjson"));
    }

    #[test]
    fn array_becomes_one_line_per_object() {
        let dir: TempDir = TempDir::new().unwrap();
        let writer: RecordWriter = writer(dir.path());

        let written: usize = writer.write(&json!([{"a": 1}, {"b": 2}])).unwrap();

        assert_eq!(written, 2);
        let content: String = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(content, "{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn nested_arrays_flatten_in_order() {
        let dir: TempDir = TempDir::new().unwrap();
        let writer: RecordWriter = writer(dir.path());

        writer.write(&json!([{"n": 1}, [{"n": 2}, [{"n": 3}]], {"n": 4}])).unwrap();

        let content: String = fs::read_to_string(writer.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["{\"n\":1}", "{\"n\":2}", "{\"n\":3}", "{\"n\":4}"]);
    }

    #[test]
    fn repeated_writes_append_to_the_same_file() {
        let dir: TempDir = TempDir::new().unwrap();
        let writer: RecordWriter = writer(dir.path());

        writer.write(&json!({"date": "2022-05-01"})).unwrap();
        writer.write(&json!({"date": "2022-05-02"})).unwrap();

        let content: String = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn scalar_is_rejected_and_nothing_is_written() {
        let dir: TempDir = TempDir::new().unwrap();
        let writer: RecordWriter = writer(dir.path());

        let err: WriteError = writer.write(&json!("not-a-dict-or-list")).unwrap_err();

        assert!(matches!(err, WriteError::UnsupportedDataType("string")));
        assert!(!writer.path().exists());
    }

    #[test]
    fn bad_element_inside_array_prevents_partial_write() {
        let dir: TempDir = TempDir::new().unwrap();
        let writer: RecordWriter = writer(dir.path());

        let err: WriteError = writer.write(&json!([{"ok": true}, 42])).unwrap_err();

        assert!(matches!(err, WriteError::UnsupportedDataType("number")));
        assert!(!writer.path().exists());
    }

    #[test]
    fn empty_array_creates_no_file() {
        let dir: TempDir = TempDir::new().unwrap();
        let writer: RecordWriter = writer(dir.path());

        assert_eq!(writer.write(&json!([])).unwrap(), 0);
        assert!(!writer.path().exists());
    }
}
