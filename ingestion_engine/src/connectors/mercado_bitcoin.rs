// @file: ingestion_engine/src/connectors/mercado_bitcoin.rs
// @description: URL construction for the Mercado Bitcoin public data API.
// @author: LAS.

use chrono::Datelike;
use crate::core::models::{Coin, EndpointRequest};


//
// CONSTANTS
//

pub const DEFAULT_BASE_URL: &str = "https://www.mercadobitcoin.net/api";


//
// ENDPOINT BUILDER
//

#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    base_url: String,
}

impl EndpointBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        EndpointBuilder {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build(&self, coin: &Coin, request: &EndpointRequest) -> String {
        let prefix: String = format!("{}/{}/{}", self.base_url, coin, request.kind().path_segment());

        match request {
            // #1. Day summary: plain decimals, the API does not zero-pad month/day
            EndpointRequest::DaySummary { date } => {
                format!("{}/{}/{}/{}", prefix, date.year(), date.month(), date.day())
            }

            // #2. Trades: optional epoch-second window.
            // A `to` without a `from` is not a shape the API offers, so it
            // falls back to the bare listing.
            EndpointRequest::Trades { from: Some(from), to: Some(to) } => {
                format!("{}/{}/{}", prefix, from.timestamp(), to.timestamp())
            }
            EndpointRequest::Trades { from: Some(from), to: None } => {
                format!("{}/{}", prefix, from.timestamp())
            }
            EndpointRequest::Trades { from: None, .. } => prefix,
        }
    }
}

impl Default for EndpointBuilder {
    fn default() -> Self {
        EndpointBuilder::new(DEFAULT_BASE_URL)
    }
}
