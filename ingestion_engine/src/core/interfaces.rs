// @file: ingestion_engine/src/core/interfaces.rs
// @description: Collaborator seams the ingestion core depends on (HTTP transport, clock).
// @author: LAS.

use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime};


//
// TRAIT DEFINITIONS
//

/// Raw HTTP response handed back to the fetcher. Body is left undecoded.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    // #1. Issue a plain GET. Err means no response was received at all.
    async fn get(&self, url: &str) -> Result<HttpResponse, String>;
}

pub trait Clock: Send + Sync {
    // #1. Calendar date used to decide whether a checkpoint is due
    fn today(&self) -> NaiveDate;

    // #2. Wall-clock instant used to stamp run files
    fn now(&self) -> NaiveDateTime;
}


//
// SYSTEM CLOCK
//

/// Reads the process's local calendar.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
