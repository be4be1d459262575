// @file: ingestion_engine/src/connectors/mod.rs
// @description: Exchange-facing plumbing: endpoint construction, rate limiting, retrying fetch.
// @author: LAS.

pub mod mercado_bitcoin;
pub mod rate_limit;
pub mod rest_fetcher;
pub mod retry;

pub use mercado_bitcoin::EndpointBuilder;
pub use rate_limit::SlidingWindowLimiter;
pub use rest_fetcher::{RateLimitedFetcher, ReqwestTransport};
pub use retry::BackoffPolicy;
