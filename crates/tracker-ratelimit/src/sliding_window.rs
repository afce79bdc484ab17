//! Sliding window pacing.
//!
//! Every admitted request is remembered for one window, so "N requests per
//! window" holds for any window, not just aligned ones.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::{Instant, sleep};

use crate::{RateLimitError, RateLimitState, RateLimiter};

/// Sliding window rate limiter.
pub struct SlidingWindow {
    limit: usize,
    window: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl std::fmt::Debug for SlidingWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlidingWindow")
            .field("limit", &self.limit)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl SlidingWindow {
    /// Allow `limit` requests in any `window`.
    #[must_use]
    pub fn new(limit: u32, window: Duration) -> Self {
        let limit = limit as usize;
        Self {
            limit,
            window,
            admitted: Mutex::new(VecDeque::with_capacity(limit)),
        }
    }

    /// Forget admissions older than one window and report how long until the
    /// oldest remaining one expires.
    fn prune(&self, admitted: &mut VecDeque<Instant>, now: Instant) -> Option<Duration> {
        while admitted
            .front()
            .is_some_and(|first| now.duration_since(*first) >= self.window)
        {
            admitted.pop_front();
        }
        admitted
            .front()
            .map(|first| self.window.saturating_sub(now.duration_since(*first)))
    }

    /// Admit a request now, or report how long until a slot frees up.
    fn admit(&self) -> Result<(), Duration> {
        let now = Instant::now();
        let mut admitted = self.admitted.lock();
        let until_free = self.prune(&mut admitted, now);
        if admitted.len() < self.limit {
            admitted.push_back(now);
            Ok(())
        } else {
            Err(until_free.unwrap_or(Duration::ZERO))
        }
    }
}

#[async_trait]
impl RateLimiter for SlidingWindow {
    async fn acquire(&self, max_wait: Duration) -> Result<Duration, RateLimitError> {
        let start = Instant::now();
        loop {
            let pause = match self.admit() {
                Ok(()) => return Ok(start.elapsed()),
                Err(pause) => pause,
            };

            let needed = start.elapsed() + pause;
            if needed > max_wait {
                return Err(RateLimitError::WaitExceeded {
                    wait_time: needed,
                    max_wait,
                });
            }
            sleep(pause).await;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn state(&self) -> RateLimitState {
        let mut admitted = self.admitted.lock();
        let reset_after = self
            .prune(&mut admitted, Instant::now())
            .unwrap_or(self.window);
        let remaining = self.limit.saturating_sub(admitted.len()) as u32;

        RateLimitState {
            limit: self.limit as u32,
            remaining,
            reset_after,
            is_limited: remaining == 0,
        }
    }
}
