//! Rate limiter implementation
//!
//! Sliding window limiting of image searches per caller address.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::domain::Clock;

/// Default number of searches a caller may make per window
pub const DEFAULT_REQUESTS_PER_WINDOW: u32 = 5;

/// Default window length
pub const DEFAULT_WINDOW_SECS: i64 = 60;

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Total limit for the window
    pub limit: u32,
    /// Time until the oldest request leaves the window (in seconds)
    pub reset_in_seconds: i64,
}

/// Sliding window rate limiter keyed by caller
#[derive(Debug)]
pub struct RateLimiter {
    /// Per-key request timestamps
    records: RwLock<HashMap<String, Vec<DateTime<Utc>>>>,
    max_requests: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
    /// Cleanup interval
    cleanup_interval: Duration,
    /// Last cleanup time
    last_cleanup: RwLock<DateTime<Utc>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();

        Self {
            records: RwLock::new(HashMap::new()),
            max_requests,
            window,
            clock,
            cleanup_interval: Duration::minutes(5),
            last_cleanup: RwLock::new(now),
        }
    }

    /// 5 requests per 60 seconds
    pub fn per_minute_default(clock: Arc<dyn Clock>) -> Self {
        Self::new(
            DEFAULT_REQUESTS_PER_WINDOW,
            Duration::seconds(DEFAULT_WINDOW_SECS),
            clock,
        )
    }

    /// Check if a request is allowed without recording it
    pub async fn check(&self, key: &str) -> RateLimitResult {
        let now = self.clock.now();
        let records = self.records.read().await;

        self.calculate(records.get(key), now)
    }

    /// Check and record in one operation; rejected requests are not recorded
    pub async fn check_and_record(&self, key: &str) -> RateLimitResult {
        self.maybe_cleanup().await;

        let now = self.clock.now();
        let mut records = self.records.write().await;

        let result = self.calculate(records.get(key), now);

        if result.allowed {
            records.entry(key.to_string()).or_default().push(now);
        }

        result
    }

    /// Reset rate limits for a key
    pub async fn reset(&self, key: &str) {
        self.records.write().await.remove(key);
    }

    fn calculate(&self, records: Option<&Vec<DateTime<Utc>>>, now: DateTime<Utc>) -> RateLimitResult {
        let window_start = now - self.window;
        let in_window: Vec<&DateTime<Utc>> = records
            .map(|r| r.iter().filter(|t| **t > window_start).collect())
            .unwrap_or_default();
        let count = in_window.len() as u32;

        if count >= self.max_requests {
            let reset_in = in_window
                .iter()
                .min()
                .map(|oldest| (self.window - (now - **oldest)).num_seconds().max(0))
                .unwrap_or(self.window.num_seconds());

            return RateLimitResult {
                allowed: false,
                remaining: 0,
                limit: self.max_requests,
                reset_in_seconds: reset_in,
            };
        }

        RateLimitResult {
            allowed: true,
            remaining: self.max_requests.saturating_sub(count + 1),
            limit: self.max_requests,
            reset_in_seconds: self.window.num_seconds(),
        }
    }

    async fn maybe_cleanup(&self) {
        let now = self.clock.now();
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            now - *last >= self.cleanup_interval
        };

        if should_cleanup {
            *self.last_cleanup.write().await = now;

            let cutoff = now - self.window;
            let mut records = self.records.write().await;

            for key_records in records.values_mut() {
                key_records.retain(|t| *t > cutoff);
            }

            records.retain(|_, v| !v.is_empty());
        }
    }

    /// Number of callers currently tracked
    pub async fn tracked_keys(&self) -> usize {
        self.records.read().await.len()
    }
}
