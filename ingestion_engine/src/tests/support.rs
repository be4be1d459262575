// @file: ingestion_engine/src/tests/support.rs
// @description: Scripted transport and fixed clock shared by the scenario tests.
// @author: LAS.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::time::Duration;
use crate::connectors::rate_limit::SlidingWindowLimiter;
use crate::connectors::rest_fetcher::RateLimitedFetcher;
use crate::connectors::retry::BackoffPolicy;
use crate::core::interfaces::{Clock, HttpResponse, HttpTransport};

//
// SCRIPTED TRANSPORT
//

type Reply = Result<HttpResponse, String>;

#[derive(Default)]
struct Script {
    // Per-URL queues take priority over the fallback
    by_url: HashMap<String, VecDeque<Reply>>,
    fallback: Option<Reply>,
    requests: Vec<String>,
}

/// In-memory transport. Clones share the same script and request log.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, url: &str, status: u16, body: &str) -> &Self {
        self.reply_bytes(url, status, body.as_bytes().to_vec())
    }

    pub fn reply_bytes(&self, url: &str, status: u16, body: Vec<u8>) -> &Self {
        self.push(url, Ok(HttpResponse { status, body }))
    }

    pub fn fail(&self, url: &str, message: &str) -> &Self {
        self.push(url, Err(message.to_string()))
    }

    /// Reply used for any URL whose queue is empty.
    pub fn always(&self, status: u16, body: &str) -> &Self {
        self.script.lock().unwrap().fallback = Some(Ok(HttpResponse { status, body: body.as_bytes().to_vec() }));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| u.as_str() == url).count()
    }

    fn push(&self, url: &str, reply: Reply) -> &Self {
        self.script.lock().unwrap()
            .by_url
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
        self
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, String> {
        let mut script = self.script.lock().unwrap();
        script.requests.push(url.to_string());

        if let Some(reply) = script.by_url.get_mut(url).and_then(|q| q.pop_front()) {
            return reply;
        }
        script.fallback.clone().unwrap_or_else(|| Err(format!("no scripted reply for {}", url)))
    }
}


//
// FIXED CLOCK
//

#[derive(Clone)]
pub struct FixedClock {
    today: Arc<Mutex<NaiveDate>>,
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(today: NaiveDate, now: NaiveDateTime) -> Self {
        FixedClock { today: Arc::new(Mutex::new(today)), now }
    }

    pub fn set_today(&self, today: NaiveDate) {
        *self.today.lock().unwrap() = today;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }

    fn now(&self) -> NaiveDateTime {
        self.now
    }
}


//
// BUILDERS
//

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Full 10-attempt policy with millisecond delays so retries stay fast.
pub fn fast_backoff() -> BackoffPolicy {
    BackoffPolicy {
        max_attempts: 10,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
    }
}

pub fn fetcher(transport: &ScriptedTransport) -> RateLimitedFetcher {
    RateLimitedFetcher::new(
        Box::new(transport.clone()),
        SlidingWindowLimiter::default(),
        fast_backoff(),
    )
}
