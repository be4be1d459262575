// @file: ingestion_engine/src/connectors/rate_limit.rs
// @description: Sliding-window call limiter. Rejects instead of queueing.
// @author: LAS.

use std::collections::VecDeque;
use tokio::time::{Duration, Instant};


//
// CONSTANTS
//

pub const DEFAULT_MAX_CALLS: usize = 29;
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(30);


//
// LIMITER
//

#[derive(Debug)]
pub struct SlidingWindowLimiter {
    max_calls: usize,
    period: Duration,
    // Instants of accepted calls still inside the window, oldest first
    accepted: VecDeque<Instant>,
}

impl SlidingWindowLimiter {
    pub fn new(max_calls: usize, period: Duration) -> Self {
        SlidingWindowLimiter {
            max_calls,
            period,
            accepted: VecDeque::new(),
        }
    }

    pub fn try_acquire(&mut self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    /// Records a call at `now` if fewer than `max_calls` were accepted within
    /// the preceding `period`. Returns false without recording otherwise.
    pub fn try_acquire_at(&mut self, now: Instant) -> bool {
        // #1. Drop calls that have slid out of the window
        while let Some(&oldest) = self.accepted.front() {
            if now.saturating_duration_since(oldest) >= self.period {
                self.accepted.pop_front();
            } else {
                break;
            }
        }

        // #2. Admit or reject
        if self.accepted.len() < self.max_calls {
            self.accepted.push_back(now);
            true
        } else {
            false
        }
    }

    pub fn in_window(&self) -> usize {
        self.accepted.len()
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        SlidingWindowLimiter::new(DEFAULT_MAX_CALLS, DEFAULT_PERIOD)
    }
}
