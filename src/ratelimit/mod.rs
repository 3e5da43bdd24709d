//! Per-identity admission control.
//!
//! Fixed-window counters keyed by client identity (network address).
//! This is an approximation of a true sliding window: a burst
//! straddling a window boundary can admit up to twice the cap in a
//! short span. That tradeoff is intentional and kept simple on
//! purpose. Expired records are reclaimed lazily on admit and in bulk
//! by a periodic purge, so memory is bounded by the number of
//! distinct identities seen within one window.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

struct RateLimitRecord {
    count: u32,
    window_start: Instant,
    /// Wall-clock twin of `window_start`, kept only so clients can be
    /// told when the window resets.
    resets_at: DateTime<Utc>,
}

impl RateLimitRecord {
    fn new(now: Instant, window: Duration) -> Self {
        Self {
            count: 0,
            window_start: now,
            resets_at: Utc::now()
                + chrono::Duration::from_std(window).expect("window fits in chrono duration"),
        }
    }
}

/// Rate limit state reported alongside every admitted request.
#[derive(Clone, Debug, Serialize)]
pub struct RateLimitSnapshot {
    pub remaining: u32,
    pub limit: u32,
    pub reset_at: DateTime<Utc>,
}

#[derive(Debug)]
pub enum Admission {
    Allowed(RateLimitSnapshot),
    Rejected { retry_after_secs: u64 },
}

pub struct RateLimiter {
    limit: u32,
    window: Duration,
    // One global lock; identity cardinality is small enough that
    // per-identity locking buys nothing.
    records: Mutex<HashMap<String, RateLimitRecord>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Check and count one request for `identity`. The counter is
    /// reset exactly when the elapsed window expires and never
    /// decremented otherwise.
    pub fn admit(&self, identity: &str, now: Instant) -> Admission {
        let mut records = self.records.lock().expect("rate limit lock poisoned");
        let record = records
            .entry(identity.to_string())
            .or_insert_with(|| RateLimitRecord::new(now, self.window));

        if now.duration_since(record.window_start) >= self.window {
            *record = RateLimitRecord::new(now, self.window);
        }

        if record.count >= self.limit {
            let remaining_window = self.window - now.duration_since(record.window_start);
            let mut retry_after_secs = remaining_window.as_secs();
            if remaining_window.subsec_nanos() > 0 {
                retry_after_secs += 1;
            }
            return Admission::Rejected { retry_after_secs };
        }

        record.count += 1;
        Admission::Allowed(RateLimitSnapshot {
            remaining: self.limit - record.count,
            limit: self.limit,
            reset_at: record.resets_at,
        })
    }

    /// Drop records whose window has expired, returning how many were
    /// removed. Run periodically so identities that stop talking to
    /// us don't accumulate forever.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let mut records = self.records.lock().expect("rate limit lock poisoned");
        let before = records.len();
        records.retain(|_, record| now.duration_since(record.window_start) < self.window);
        before - records.len()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("rate limit lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
