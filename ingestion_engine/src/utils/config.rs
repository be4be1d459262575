// @file: ingestion_engine/src/utils/config.rs
// @description: Layered configuration (defaults, config file, APP_* env) and typed validation.
// @author: LAS.

use chrono::NaiveDate;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use tokio::time::Duration;
use url::Url;
use crate::connectors::mercado_bitcoin::DEFAULT_BASE_URL;
use crate::connectors::rate_limit::SlidingWindowLimiter;
use crate::connectors::retry::BackoffPolicy;
use crate::core::models::{Coin, DataKind};

//
// TYPE DEFINITIONS
//

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,

    // What to ingest
    pub coins: Vec<String>,
    pub default_start_date: String,
    pub ingestor_kind: String,

    // Upstream API
    pub base_url: String,
    pub http_timeout_secs: u64,
    pub rate_limit_calls: usize,
    pub rate_limit_period_secs: u64,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,

    // Storage
    pub data_dir: String,
    pub checkpoint_dir: String,

    // Scheduler
    pub schedule_interval_ms: u64,
}

/// Validated, typed view of `AppConfig` consumed by the ingestion core.
#[derive(Debug, Clone)]
pub struct IngestionSettings {
    pub kind: DataKind,
    pub coins: Vec<Coin>,
    pub default_start_date: NaiveDate,
    pub base_url: String,
    pub http_timeout: Duration,
    pub rate_limit_calls: usize,
    pub rate_limit_period: Duration,
    pub backoff: BackoffPolicy,
    pub data_dir: PathBuf,
    pub checkpoint_dir: PathBuf,
    pub schedule_interval: Duration,
}

impl IngestionSettings {
    pub fn limiter(&self) -> SlidingWindowLimiter {
        SlidingWindowLimiter::new(self.rate_limit_calls, self.rate_limit_period)
    }
}

impl AppConfig {
    //
    // PUBLIC INTERFACE
    //

    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Self::defaults_builder()?
            // File & Env Overrides
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("coins"),
            )
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only, ignoring files and environment.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::defaults_builder()?.build()?.try_deserialize()
    }

    pub fn ingestion_settings(&self) -> Result<IngestionSettings, ConfigError> {
        // #1. Coins
        if self.coins.is_empty() {
            return Err(invalid("coins must list at least one ticker"));
        }
        let coins: Vec<Coin> = self.coins
            .iter()
            .map(|c| Coin::new(c.as_str()).map_err(|e| invalid(format!("coins: {}", e))))
            .collect::<Result<_, _>>()?;

        // #2. Dates & kinds
        let default_start_date: NaiveDate = NaiveDate::parse_from_str(self.default_start_date.trim(), "%Y-%m-%d")
            .map_err(|e| invalid(format!("default_start_date {:?}: {}", self.default_start_date, e)))?;
        let kind: DataKind = self.ingestor_kind.parse().map_err(invalid)?;

        // #3. Upstream
        Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("base_url {:?}: {}", self.base_url, e)))?;

        // #4. Limits
        if self.rate_limit_calls == 0 || self.rate_limit_period_secs == 0 {
            return Err(invalid("rate limit window must allow at least one call over a non-zero period"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts must be at least 1"));
        }
        if self.schedule_interval_ms == 0 {
            return Err(invalid("schedule_interval_ms must be non-zero"));
        }

        Ok(IngestionSettings {
            kind,
            coins,
            default_start_date,
            base_url: self.base_url.clone(),
            http_timeout: Duration::from_secs(self.http_timeout_secs),
            rate_limit_calls: self.rate_limit_calls,
            rate_limit_period: Duration::from_secs(self.rate_limit_period_secs),
            backoff: BackoffPolicy {
                max_attempts: self.max_attempts,
                base_delay: Duration::from_millis(self.backoff_base_ms),
                max_delay: Duration::from_millis(self.backoff_max_ms),
            },
            data_dir: PathBuf::from(&self.data_dir),
            checkpoint_dir: PathBuf::from(&self.checkpoint_dir),
            schedule_interval: Duration::from_millis(self.schedule_interval_ms),
        })
    }

    //
    // INTERNAL HELPERS
    //

    fn defaults_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("log_level", "info")?
            .set_default("coins", vec!["BTC", "ETH", "LTC"])?
            .set_default("default_start_date", "2022-05-01")?
            .set_default("ingestor_kind", "day-summary")?

            // Mercado Bitcoin
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("http_timeout_secs", 30)?
            .set_default("rate_limit_calls", 29)?
            .set_default("rate_limit_period_secs", 30)?
            .set_default("max_attempts", 10)?
            .set_default("backoff_base_ms", 1000)?
            .set_default("backoff_max_ms", 60_000)?

            // Storage
            .set_default("data_dir", ".")?
            .set_default("checkpoint_dir", ".")?

            // Scheduler
            .set_default("schedule_interval_ms", 1000)
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Message(message.into())
}
