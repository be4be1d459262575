// @file: ingestion_engine/src/core/checkpoint.rs
// @description: Durable "next date to ingest" marker, one plain-text file per ingestor type.
// @author: LAS.

use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use crate::core::errors::CheckpointError;


//
// CONSTANTS
//

const DATE_FORMAT: &str = "%Y-%m-%d";


//
// STORE
//

#[derive(Debug)]
pub struct CheckpointStore {
    path: PathBuf,
    current: Option<NaiveDate>,
}

impl CheckpointStore {
    /// Opens `<dir>/<name>.checkpoint` and loads whatever it holds.
    /// Creates `dir` if it does not exist yet.
    pub fn open(dir: &Path, name: &str) -> Result<Self, CheckpointError> {
        let path: PathBuf = dir.join(format!("{}.checkpoint", name));
        fs::create_dir_all(dir).map_err(|source| CheckpointError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let current: Option<NaiveDate> = read_date(&path)?;
        Ok(CheckpointStore { path, current })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last persisted value. None if nothing was ever stored.
    pub fn load(&self) -> Option<NaiveDate> {
        self.current
    }

    /// Persists `date` and only then adopts it in memory. A failed write
    /// leaves the previous value in place.
    pub fn advance(&mut self, date: NaiveDate) -> Result<(), CheckpointError> {
        if let Some(current) = self.current {
            if date < current {
                return Err(CheckpointError::Regression { current, requested: date });
            }
        }

        write_date(&self.path, date)?;
        self.current = Some(date);
        Ok(())
    }
}


//
// FILE HELPERS
//

fn read_date(path: &Path) -> Result<Option<NaiveDate>, CheckpointError> {
    let raw: String = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CheckpointError::Io { path: path.to_path_buf(), source });
        }
    };

    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map(Some)
        .map_err(|_| CheckpointError::Corrupt {
            path: path.to_path_buf(),
            value: raw,
        })
}

fn write_date(path: &Path, date: NaiveDate) -> Result<(), CheckpointError> {
    let io_err = |source: std::io::Error| CheckpointError::Io {
        path: path.to_path_buf(),
        source,
    };

    // #1. Write the sibling temp file and flush it to disk
    let tmp_path: PathBuf = path.with_extension("checkpoint.tmp");
    {
        let mut file: File = File::create(&tmp_path).map_err(io_err)?;
        file.write_all(date.format(DATE_FORMAT).to_string().as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
    }

    // #2. Swap it in
    fs::rename(&tmp_path, path).map_err(io_err)
}
