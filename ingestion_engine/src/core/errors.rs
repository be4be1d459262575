// @file: ingestion_engine/src/core/errors.rs
// @description: Error taxonomy for fetch, write, checkpoint and cycle failures.
// @author: LAS.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;
use crate::core::models::Coin;


//
// FETCH
//

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited before reaching {url}")]
    RateLimited { url: String },

    #[error("HTTP error for {url}: {message}")]
    Http {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    /// Rate-limit rejections and HTTP failures are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. } | FetchError::Http { .. })
    }
}


//
// WRITE
//

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("data type {0} is not supported for ingestion")]
    UnsupportedDataType(&'static str),

    #[error("failed to append to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}


//
// CHECKPOINT
//

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint I/O failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("checkpoint file {path} holds an invalid date: {value:?}")]
    Corrupt { path: PathBuf, value: String },

    #[error("checkpoint cannot move backwards from {current} to {requested}")]
    Regression {
        current: NaiveDate,
        requested: NaiveDate,
    },
}


//
// CONFIGURATION VALUES
//

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoinError {
    #[error("coin ticker must not be empty")]
    Empty,
}


//
// CYCLE
//

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("fetch failed for {coin} on {date}: {source}")]
    Fetch {
        coin: Coin,
        date: NaiveDate,
        #[source]
        source: FetchError,
    },

    #[error("write failed for {coin} on {date}: {source}")]
    Write {
        coin: Coin,
        date: NaiveDate,
        #[source]
        source: WriteError,
    },

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}
