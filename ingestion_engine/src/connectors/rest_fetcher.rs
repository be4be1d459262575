// @file: ingestion_engine/src/connectors/rest_fetcher.rs
// @description: Rate-limited, retrying JSON fetch over a pluggable HTTP transport.
// @author: LAS.

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use serde_json::Value;
use tokio::time::{sleep, Duration};
use crate::connectors::rate_limit::SlidingWindowLimiter;
use crate::connectors::retry::BackoffPolicy;
use crate::core::errors::FetchError;
use crate::core::interfaces::{HttpResponse, HttpTransport};


//
// REQWEST TRANSPORT
//

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client: Client = Client::builder().timeout(timeout).build()?;
        Ok(ReqwestTransport { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, String> {
        let response = self.client.get(url).send().await
            .map_err(|e| format!("Request failed: {}", e))?;

        let status: u16 = response.status().as_u16();
        let body: Vec<u8> = response.bytes().await
            .map_err(|e| format!("Failed to read body: {}", e))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}


//
// FETCHER
//

pub struct RateLimitedFetcher {
    transport: Box<dyn HttpTransport>,
    limiter: SlidingWindowLimiter,
    backoff: BackoffPolicy,
}

impl RateLimitedFetcher {
    pub fn new(
        transport: Box<dyn HttpTransport>,
        limiter: SlidingWindowLimiter,
        backoff: BackoffPolicy,
    ) -> Self {
        RateLimitedFetcher { transport, limiter, backoff }
    }

    //
    // PUBLIC INTERFACE
    //

    /// GETs `url` and decodes the body as JSON.
    ///
    /// Limiter rejections and HTTP failures are retried with exponential
    /// backoff up to the policy's attempt cap; the last error is returned once
    /// the cap is hit. Decode failures are returned immediately.
    pub async fn fetch(&mut self, url: &str) -> Result<Value, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let error: FetchError = match self.attempt_once(url).await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !error.is_transient() {
                return Err(error);
            }

            match self.backoff.delay_after(attempt) {
                Some(delay) => {
                    warn!(
                        "Fetch attempt {}/{} failed ({}); retrying in {:?}",
                        attempt, self.backoff.max_attempts, error, delay
                    );
                    sleep(delay).await;
                }
                None => return Err(error),
            }
        }
    }

    //
    // INTERNAL HELPERS
    //

    async fn attempt_once(&mut self, url: &str) -> Result<Value, FetchError> {
        // #1. Window check happens before anything touches the network
        if !self.limiter.try_acquire() {
            return Err(FetchError::RateLimited { url: url.to_string() });
        }

        // #2. Execute Request
        info!("Getting data from endpoint url={}", url);
        let response: HttpResponse = self.transport.get(url).await
            .map_err(|message| FetchError::Http {
                url: url.to_string(),
                status: None,
                message,
            })?;

        // #3. Classify Status
        if response.status == 429 {
            return Err(FetchError::RateLimited { url: url.to_string() });
        }
        if !response.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: Some(response.status),
                message: format!("API Error: status {}", response.status),
            });
        }

        // #4. Decode raw bytes; invalid UTF-8 is a decode error, not replaced
        serde_json::from_slice::<Value>(&response.body)
            .map_err(|e| FetchError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}
