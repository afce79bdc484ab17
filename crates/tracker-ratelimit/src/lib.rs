//! Tracker Rate Limit - Request pacing for tracker connector transports
//!
//! Remote tracker APIs throttle aggressively, so every outbound request waits
//! for a permit before it is sent. Bursts are serialized here, outside the
//! request executor.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tracker_ratelimit::{RateLimitConfig, RateLimiter};
//!
//! // Host default: 1 request every 2 seconds
//! let limiter = RateLimitConfig::host_default().build();
//!
//! limiter.acquire(std::time::Duration::from_secs(30)).await?;
//! // send the request
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod sliding_window;

pub use sliding_window::*;

use std::time::Duration;

use async_trait::async_trait;

/// Paces outbound requests.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait for a permit and take it.
    ///
    /// Returns the time waited, or an error if the wait would exceed `max_wait`.
    async fn acquire(&self, max_wait: Duration) -> Result<Duration, RateLimitError>;

    /// Snapshot of the current window.
    fn state(&self) -> RateLimitState;
}

/// Rate limiter state snapshot.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RateLimitState {
    /// Maximum requests allowed in the window.
    pub limit: u32,

    /// Remaining requests in the current window.
    pub remaining: u32,

    /// Time until the window resets.
    pub reset_after: Duration,

    /// Whether currently rate limited.
    pub is_limited: bool,
}

/// Rate limit error.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Wait time would exceed maximum allowed.
    #[error("Wait time {wait_time:?} exceeds maximum {max_wait:?}")]
    WaitExceeded {
        /// Required wait time.
        wait_time: Duration,
        /// Maximum allowed wait.
        max_wait: Duration,
    },

    /// Invalid configuration.
    #[error("Invalid rate limit configuration: {0}")]
    InvalidConfig(String),
}

/// Configuration for rate limiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub requests_per_window: u32,

    /// Window duration.
    pub window: Duration,
}

impl RateLimitConfig {
    /// Create a new rate limit configuration.
    #[must_use]
    pub const fn new(requests_per_window: u32, window: Duration) -> Self {
        Self {
            requests_per_window,
            window,
        }
    }

    /// Host default: 1 request per 2 seconds.
    #[must_use]
    pub const fn host_default() -> Self {
        Self::new(1, Duration::from_secs(2))
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), RateLimitError> {
        if self.requests_per_window == 0 {
            return Err(RateLimitError::InvalidConfig(
                "requests_per_window must be at least 1".into(),
            ));
        }
        if self.window.is_zero() {
            return Err(RateLimitError::InvalidConfig(
                "window must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Build a sliding window limiter from this configuration.
    #[must_use]
    pub fn build(&self) -> SlidingWindow {
        SlidingWindow::new(self.requests_per_window, self.window)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::host_default()
    }
}
