//! Per-key sliding-window rate limiting for outbound API calls.
//!
//! The limiter delays rather than rejects: a call that exceeds its key's
//! quota is suspended for a fixed delay, after which the key's window is
//! force-reset and the call proceeds. There is no queuing, no exponential
//! backoff, and no rejection path -- every call eventually goes through.
//!
//! A [`RateLimiter`] is an explicitly constructed object injected into the
//! client (one per process), not a module-level singleton. Entries live
//! for the life of the limiter; a key's window resets whenever its window
//! duration has elapsed since the window opened.
//!
//! Timing uses [`tokio::time::Instant`], so tests can pause and advance
//! the clock.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::config::{DEFAULT_RATE_DELAY, DEFAULT_RATE_MAX_REQUESTS, DEFAULT_RATE_WINDOW};

#[derive(Debug, Clone, Copy)]
struct Window {
    opened: Instant,
    count: u32,
}

/// Sliding-window rate limiter keyed by operation name (plus resource id
/// for per-task operations, so they throttle independently).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use taskdeck::RateLimiter;
///
/// let limiter = RateLimiter::new(Duration::from_secs(60), 2);
/// assert!(limiter.is_allowed("api_task_create"));
/// assert!(limiter.is_allowed("api_task_create"));
/// assert!(!limiter.is_allowed("api_task_create"));
/// // Other keys are unaffected.
/// assert!(limiter.is_allowed("api_tasks_get"));
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    delay: Duration,
    entries: Mutex<HashMap<String, Window>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_WINDOW, DEFAULT_RATE_MAX_REQUESTS)
    }
}

impl RateLimiter {
    /// Creates a limiter allowing `max_requests` per key per `window`,
    /// with the default throttle delay of 1000 ms.
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            delay: DEFAULT_RATE_DELAY,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Sets the delay applied by [`delay_if_limited`](Self::delay_if_limited)
    /// when a key is over quota.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Records a call attempt for `key` and reports whether it fits in
    /// the current window.
    ///
    /// First call for a key opens a window with count 1. A call arriving
    /// after the window has elapsed opens a fresh window. Within the
    /// window, calls increment the count up to the cap; at the cap the
    /// call is not allowed this tick (the window timestamp is left
    /// untouched).
    pub fn is_allowed(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let Some(window) = entries.get(key).copied() else {
            entries.insert(key.to_string(), Window { opened: now, count: 1 });
            return true;
        };

        if now.duration_since(window.opened) >= self.window {
            entries.insert(key.to_string(), Window { opened: now, count: 1 });
            return true;
        }

        if window.count >= self.max_requests {
            trace!(key, count = window.count, "call over quota");
            return false;
        }

        entries.insert(
            key.to_string(),
            Window {
                opened: window.opened,
                count: window.count + 1,
            },
        );
        true
    }

    /// Gates a call on `key`: if the key is over quota, suspends the
    /// caller for the configured delay and then force-resets the key's
    /// window as if this were a fresh first call.
    ///
    /// The throttled caller always proceeds after one fixed delay; a
    /// burst arriving right after the reset can immediately fill the new
    /// window again.
    pub async fn delay_if_limited(&self, key: &str) {
        if self.is_allowed(key) {
            return;
        }

        debug!(key, delay_ms = self.delay.as_millis() as u64, "rate limited; delaying call");
        tokio::time::sleep(self.delay).await;

        self.entries.lock().insert(
            key.to_string(),
            Window {
                opened: Instant::now(),
                count: 1,
            },
        );
    }
}
