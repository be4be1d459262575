// @file: ingestion_engine/src/core/ingestor.rs
// @description: Checkpoint-driven ingestion cycle: one date, every coin, advance only on full success.
// @author: LAS.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::{debug, info};
use serde_json::Value;
use std::path::Path;
use crate::connectors::mercado_bitcoin::EndpointBuilder;
use crate::connectors::rest_fetcher::RateLimitedFetcher;
use crate::core::checkpoint::CheckpointStore;
use crate::core::errors::{CheckpointError, IngestError};
use crate::core::interfaces::Clock;
use crate::core::models::{Coin, CycleOutcome, DataKind, EndpointRequest};
use crate::storage::record_writer::RecordWriter;


//
// TYPE DEFINITIONS
//

/// Where an ingestor reads its checkpoint and writes its run files.
#[derive(Debug, Clone)]
pub struct IngestorPaths<'a> {
    pub data_dir: &'a Path,
    pub checkpoint_dir: &'a Path,
}

struct CoinTarget {
    coin: Coin,
    writer: RecordWriter,
}


//
// INGESTOR
//

pub struct Ingestor {
    kind: DataKind,
    targets: Vec<CoinTarget>,
    default_start_date: NaiveDate,
    endpoints: EndpointBuilder,
    fetcher: RateLimitedFetcher,
    checkpoint: CheckpointStore,
    clock: Box<dyn Clock>,
}

impl Ingestor {
    //
    // INITIALIZATION
    //

    /// Loads the checkpoint for `kind` and fixes one run file per coin,
    /// stamped with the clock's current time.
    pub fn new(
        kind: DataKind,
        coins: Vec<Coin>,
        default_start_date: NaiveDate,
        endpoints: EndpointBuilder,
        fetcher: RateLimitedFetcher,
        clock: Box<dyn Clock>,
        paths: IngestorPaths<'_>,
    ) -> Result<Self, CheckpointError> {
        let checkpoint: CheckpointStore = CheckpointStore::open(paths.checkpoint_dir, kind.ingestor_name())?;

        let run_started: NaiveDateTime = clock.now();
        let targets: Vec<CoinTarget> = coins
            .into_iter()
            .map(|coin| CoinTarget {
                writer: RecordWriter::new(paths.data_dir, kind, &coin, run_started),
                coin,
            })
            .collect();

        Ok(Ingestor {
            kind,
            targets,
            default_start_date,
            endpoints,
            fetcher,
            checkpoint,
            clock,
        })
    }

    pub fn name(&self) -> &'static str {
        self.kind.ingestor_name()
    }

    /// Stored checkpoint, or the configured start date when none exists yet.
    pub fn effective_checkpoint(&self) -> NaiveDate {
        self.checkpoint.load().unwrap_or(self.default_start_date)
    }

    pub fn run_file(&self, coin: &Coin) -> Option<&Path> {
        self.targets
            .iter()
            .find(|t| &t.coin == coin)
            .map(|t| t.writer.path())
    }


    //
    // CYCLE
    //

    pub async fn ingest(&mut self) -> Result<CycleOutcome, IngestError> {
        // #1. Is the checkpoint date final yet?
        let date: NaiveDate = self.effective_checkpoint();
        let today: NaiveDate = self.clock.today();

        if date >= today {
            debug!("{} not due: checkpoint={} today={}", self.name(), date, today);
            return Ok(CycleOutcome::NotDue { checkpoint: date });
        }

        // #2. Fetch & write every coin in order; the first failure aborts the cycle
        let request: EndpointRequest = request_for(self.kind, date);
        let mut records: usize = 0;

        for target in &self.targets {
            let url: String = self.endpoints.build(&target.coin, &request);

            let payload: Value = self.fetcher.fetch(&url).await
                .map_err(|source| IngestError::Fetch {
                    coin: target.coin.clone(),
                    date,
                    source,
                })?;

            let written: usize = target.writer.write(&payload)
                .map_err(|source| IngestError::Write {
                    coin: target.coin.clone(),
                    date,
                    source,
                })?;

            debug!("Wrote {} records coin={} date={} file={}", written, target.coin, date, target.writer.path().display());
            records += written;
        }

        // #3. Advance
        let next: NaiveDate = date + Duration::days(1);
        self.checkpoint.advance(next)?;
        info!("{} ingested date={} records={} checkpoint={}", self.name(), date, records, next);

        Ok(CycleOutcome::Ingested { date, records })
    }
}


//
// INTERNAL HELPERS
//

/// Request covering one calendar day for the given kind.
fn request_for(kind: DataKind, date: NaiveDate) -> EndpointRequest {
    match kind {
        DataKind::DaySummary => EndpointRequest::DaySummary { date },
        DataKind::TradeHistory => EndpointRequest::Trades {
            from: Some(local_midnight(date)),
            to: Some(local_midnight(date + Duration::days(1))),
        },
    }
}

// Start of the day in the process's timezone.
fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    first_valid_instant(date, |t| {
        Local.from_local_datetime(&t).earliest().map(|local| local.with_timezone(&Utc))
    })
}

/// First wall-clock time of `date` that `resolve` can place on the timeline.
/// A DST gap swallowing midnight pushes the start to the end of the gap,
/// searched in 30-minute steps.
fn first_valid_instant<F>(date: NaiveDate, resolve: F) -> DateTime<Utc>
where
    F: Fn(NaiveDateTime) -> Option<DateTime<Utc>>,
{
    let midnight: NaiveDateTime = date.and_time(chrono::NaiveTime::MIN);
    (0..48)
        .map(|step| midnight + Duration::minutes(30 * step))
        .find_map(|t| resolve(t))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}
