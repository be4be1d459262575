// @file: ingestion_engine/src/core/models.rs
// @description: Domain types shared by connectors, storage and the ingestion cycle.
// @author: LAS.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;
use crate::core::errors::CoinError;


//
// COIN
//

/// Ticker symbol as the exchange spells it (e.g. "BTC").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coin(String);

impl Coin {
    pub fn new(ticker: impl Into<String>) -> Result<Self, CoinError> {
        let ticker: String = ticker.into().trim().to_string();
        if ticker.is_empty() {
            return Err(CoinError::Empty);
        }
        Ok(Coin(ticker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}


//
// DATA KINDS
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    DaySummary,
    TradeHistory,
}

impl DataKind {
    /// Path segment used both in the endpoint and as the on-disk prefix.
    pub fn path_segment(&self) -> &'static str {
        match self {
            DataKind::DaySummary => "day-summary",
            DataKind::TradeHistory => "trades",
        }
    }

    /// Name of the ingestor driving this kind. Doubles as the checkpoint key.
    pub fn ingestor_name(&self) -> &'static str {
        match self {
            DataKind::DaySummary => "DaySummaryIngestor",
            DataKind::TradeHistory => "TradesIngestor",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day-summary" | "day_summary" | "daysummary" => Ok(DataKind::DaySummary),
            "trades" | "trade-history" | "trade_history" => Ok(DataKind::TradeHistory),
            other => Err(format!("Unknown ingestor kind: {}", other)),
        }
    }
}


//
// ENDPOINT PARAMETERS
//

/// One request against the public data API. The variant fixes the data kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointRequest {
    DaySummary {
        date: NaiveDate,
    },
    Trades {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
}

impl EndpointRequest {
    pub fn kind(&self) -> DataKind {
        match self {
            EndpointRequest::DaySummary { .. } => DataKind::DaySummary,
            EndpointRequest::Trades { .. } => DataKind::TradeHistory,
        }
    }
}


//
// CYCLE RESULTS
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Checkpoint has not fallen behind today yet; nothing was fetched.
    NotDue { checkpoint: NaiveDate },
    /// Every coin was fetched and written for `date`; checkpoint moved to the next day.
    Ingested { date: NaiveDate, records: usize },
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_rejects_blank_tickers() {
        assert!(matches!(Coin::new(""), Err(CoinError::Empty)));
        assert!(matches!(Coin::new("   "), Err(CoinError::Empty)));
        assert_eq!(Coin::new(" BTC ").unwrap().as_str(), "BTC");
    }

    #[test]
    fn data_kind_names() {
        assert_eq!(DataKind::DaySummary.path_segment(), "day-summary");
        assert_eq!(DataKind::TradeHistory.path_segment(), "trades");
        assert_eq!(DataKind::DaySummary.ingestor_name(), "DaySummaryIngestor");
        assert_eq!(DataKind::TradeHistory.ingestor_name(), "TradesIngestor");
    }

    #[test]
    fn data_kind_parses_config_spellings() {
        assert_eq!("day-summary".parse::<DataKind>(), Ok(DataKind::DaySummary));
        assert_eq!("Trades".parse::<DataKind>(), Ok(DataKind::TradeHistory));
        assert!("candles".parse::<DataKind>().is_err());
    }

    #[test]
    fn request_reports_its_kind() {
        let date: NaiveDate = NaiveDate::from_ymd_opt(2022, 5, 1).unwrap();
        assert_eq!(EndpointRequest::DaySummary { date }.kind(), DataKind::DaySummary);
        assert_eq!(EndpointRequest::Trades { from: None, to: None }.kind(), DataKind::TradeHistory);
    }
}
