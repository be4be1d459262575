// @file: ingestion_engine/src/core/scheduler.rs
// @description: Fixed-cadence driver that runs one ingestion cycle per tick.
// @author: LAS.

use log::{error, info};
use std::future::Future;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};
use crate::core::errors::IngestError;
use crate::core::ingestor::Ingestor;
use crate::core::models::CycleOutcome;


//
// SCHEDULER
//

pub struct Scheduler {
    ingestor: Ingestor,
    period: Duration,
}

impl Scheduler {
    pub fn new(ingestor: Ingestor, period: Duration) -> Self {
        Scheduler { ingestor, period }
    }

    pub fn ingestor(&self) -> &Ingestor {
        &self.ingestor
    }

    /// Runs one cycle. Errors abort only this cycle; the checkpoint is left
    /// where it was, so the next tick retries the same date.
    pub async fn tick(&mut self) -> Result<CycleOutcome, IngestError> {
        let result = self.ingestor.ingest().await;
        if let Err(e) = &result {
            error!("{} cycle aborted: {}", self.ingestor.name(), e);
        }
        result
    }

    /// Ticks every `period` until `shutdown` resolves.
    ///
    /// Cycles never overlap: each one is awaited before the next tick is
    /// taken, and ticks missed while a cycle was running are skipped.
    pub async fn run_until<F>(mut self, shutdown: F) -> Ingestor
    where
        F: Future<Output = ()>,
    {
        let mut ticker: Interval = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Scheduler started for {} every {:?}", self.ingestor.name(), self.period);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    // Result already logged
                    let _ = self.tick().await;
                }
            }
        }

        info!("Scheduler stopped for {}", self.ingestor.name());
        self.ingestor
    }
}
