// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sliding-window rate limiter keyed by client fingerprint.
//!
//! Accept/reject is atomic per fingerprint: the window entry stays locked
//! through the read-check-append, so two concurrent requests for the same
//! fingerprint can never both slip past the limit.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

const WINDOW: Duration = Duration::from_secs(60);
const IDLE_EVICTION: Duration = Duration::from_secs(120);

/// In-process sliding-window limiter.
///
/// Cannot error: every call is a plain accept or reject decision.
pub struct RateLimiter {
    max_per_minute: u32,
    windows: DashMap<String, Vec<Instant>>,
    epoch: Instant,
    /// Seconds since `epoch` of the last hygiene sweep.
    last_sweep: AtomicU64,
}

impl RateLimiter {
    pub fn new(max_per_minute: u32) -> Self {
        Self {
            max_per_minute,
            windows: DashMap::new(),
            epoch: Instant::now(),
            last_sweep: AtomicU64::new(0),
        }
    }

    /// Record a request for `fingerprint` using the configured limit.
    pub fn allow(&self, fingerprint: &str) -> bool {
        self.allow_with_limit(fingerprint, self.max_per_minute)
    }

    /// Record a request with a per-route limit override.
    pub fn allow_with_limit(&self, fingerprint: &str, max_per_minute: u32) -> bool {
        self.maybe_sweep();

        let now = Instant::now();
        let mut entry = self.windows.entry(fingerprint.to_string()).or_default();
        entry.retain(|t| now.duration_since(*t) < WINDOW);
        if entry.len() as u32 >= max_per_minute {
            return false;
        }
        entry.push(now);
        true
    }

    /// Drop fingerprints idle longer than two minutes, at most once per
    /// minute. Memory hygiene only; accept/reject never depends on it.
    fn maybe_sweep(&self) {
        let now_secs = self.epoch.elapsed().as_secs();
        let last = self.last_sweep.load(Ordering::Relaxed);
        if now_secs.saturating_sub(last) < WINDOW.as_secs() {
            return;
        }
        if self
            .last_sweep
            .compare_exchange(last, now_secs, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            // Another request took the sweep.
            return;
        }
        let now = Instant::now();
        self.windows
            .retain(|_, times| matches!(times.last(), Some(t) if now.duration_since(*t) < IDLE_EVICTION));
    }

    #[cfg(test)]
    fn tracked_fingerprints(&self) -> usize {
        self.windows.len()
    }
}
