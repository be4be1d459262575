// @file: ingestion_engine/src/main.rs
// @description: Process entry point: config, logging, ingestor wiring and the scheduler loop.
// @author: LAS.

use log::{error, info};
use mb_ingestion_engine::connectors::{EndpointBuilder, RateLimitedFetcher, ReqwestTransport};
use mb_ingestion_engine::core::ingestor::{Ingestor, IngestorPaths};
use mb_ingestion_engine::core::interfaces::SystemClock;
use mb_ingestion_engine::core::scheduler::Scheduler;
use mb_ingestion_engine::utils::config::{AppConfig, IngestionSettings};
use mb_ingestion_engine::utils::logger::{init_logger, install_panic_hook};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // #1. Load Configuration
    // Logger level comes from config, so a config failure is reported with the default level
    let config: AppConfig = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            init_logger("info");
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logger(&config.log_level);
    install_panic_hook();

    let settings: IngestionSettings = match config.ingestion_settings() {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(">>> Ingestion Engine is Starting... <<<");
    info!(
        "kind={} coins={:?} default_start_date={}",
        settings.kind, config.coins, settings.default_start_date
    );

    // #2. Build Fetch Pipeline
    let transport: ReqwestTransport = match ReqwestTransport::new(settings.http_timeout) {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let fetcher: RateLimitedFetcher = RateLimitedFetcher::new(
        Box::new(transport),
        settings.limiter(),
        settings.backoff,
    );

    // #3. Setup Ingestor (loads the checkpoint)
    let ingestor: Ingestor = match Ingestor::new(
        settings.kind,
        settings.coins.clone(),
        settings.default_start_date,
        EndpointBuilder::new(settings.base_url.as_str()),
        fetcher,
        Box::new(SystemClock),
        IngestorPaths {
            data_dir: &settings.data_dir,
            checkpoint_dir: &settings.checkpoint_dir,
        },
    ) {
        Ok(i) => i,
        Err(e) => {
            error!("Failed to initialise {}: {}", settings.kind.ingestor_name(), e);
            return ExitCode::FAILURE;
        }
    };

    info!("{} resuming from {}", ingestor.name(), ingestor.effective_checkpoint());

    // #4. Run until Ctrl-C
    let scheduler: Scheduler = Scheduler::new(ingestor, settings.schedule_interval);
    scheduler
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!(">>> Ingestion Engine stopped <<<");
    ExitCode::SUCCESS
}
