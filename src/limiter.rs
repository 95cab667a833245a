// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window admission controller for the collection endpoint.
//!
//! Each client key owns the timestamps of its recent admissions. A request
//! is admitted only while fewer than `max_requests` of those timestamps fall
//! inside the trailing window, so a client can never exceed the limit in any
//! window, whatever its alignment.

use crate::config::RateLimitConfig;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is admitted and has been recorded
    Allowed {
        /// Admissions still available in the current window
        remaining: u32,
        /// Time until the oldest recorded admission leaves the window
        reset_in: Duration,
    },
    /// Request is denied; nothing was recorded
    Limited {
        /// Time until the oldest recorded admission leaves the window
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Per-client admission log guarded by a single lock.
///
/// The map is never handed out; every read and write goes through
/// [`RateLimiter::check_at`] or [`RateLimiter::cleanup`], each of which holds
/// the lock for its whole prune-check-append sequence.
pub struct RateLimiter {
    config: RateLimitConfig,
    requests: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Decide whether `key` may submit now, recording the admission if so.
    pub fn allow(&self, key: &str) -> bool {
        self.check(key).is_allowed()
    }

    /// Like [`RateLimiter::allow`], with the remaining budget and retry hint.
    pub fn check(&self, key: &str) -> RateLimitResult {
        self.check_at(key, Instant::now())
    }

    /// Run the admission decision for `key` as of `now`.
    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitResult {
        let window = self.config.window_duration();
        let limit = self.config.max_requests as usize;

        let mut requests = self.lock();
        let log = requests.entry(key.to_string()).or_default();
        prune(log, now, window);

        if log.len() >= limit {
            let retry_after = until_expiry(log.front().copied(), now, window);
            debug!(key, ?retry_after, "Client rate limit exceeded");
            return RateLimitResult::Limited { retry_after };
        }

        log.push_back(now);
        RateLimitResult::Allowed {
            remaining: (limit - log.len()) as u32,
            reset_in: until_expiry(log.front().copied(), now, window),
        }
    }

    /// Evict keys with no admissions left in the window. Returns the number
    /// of keys removed.
    pub fn cleanup(&self) -> usize {
        self.cleanup_at(Instant::now())
    }

    pub fn cleanup_at(&self, now: Instant) -> usize {
        let window = self.config.window_duration();
        let mut requests = self.lock();
        let before = requests.len();
        requests.retain(|_, log| {
            prune(log, now, window);
            !log.is_empty()
        });
        before - requests.len()
    }

    /// Number of client keys currently held.
    pub fn tracked_keys(&self) -> usize {
        self.lock().len()
    }

    // A panic while holding the lock cannot leave a log half-written in a
    // way that breaks the invariants, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, VecDeque<Instant>>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Drop admissions at least `window` old. The log is chronological, so only
/// the front needs inspecting.
fn prune(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = log.front() {
        if now.saturating_duration_since(oldest) < window {
            break;
        }
        log.pop_front();
    }
}

fn until_expiry(oldest: Option<Instant>, now: Instant, window: Duration) -> Duration {
    oldest
        .map(|t| window.saturating_sub(now.saturating_duration_since(t)))
        .unwrap_or(Duration::ZERO)
}
