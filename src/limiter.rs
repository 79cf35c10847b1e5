// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for the form endpoints.
//!
//! Each `(prefix, identifier)` pair owns a counter that is valid until
//! `window_reset_at`. The first request after that instant starts a new
//! window with a count of one. Counters live in process memory only and are
//! lost on restart.
//!
//! Expired records are not removed on every call. Once the store holds more
//! than `capacity` records, the next check sweeps out every record whose
//! window ended more than one window length ago.

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitPolicy;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Outcome of a single rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests left in the current window
    pub remaining: u32,
    /// Milliseconds until the window resets
    pub reset_in: u64,
}

/// Counter state for one key.
#[derive(Debug, Clone, Copy)]
struct RateLimitRecord {
    count: u32,
    window_reset_at: u64,
}

/// Thread-safe fixed-window rate limiter.
pub struct FixedWindowLimiter {
    /// Sweep threshold
    capacity: usize,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Records keyed by `prefix:identifier`
    records: RwLock<HashMap<String, RateLimitRecord>>,
}

impl FixedWindowLimiter {
    /// Create a limiter backed by the system clock.
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    /// Create a limiter with an explicit time source.
    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            capacity,
            clock,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Admit or reject one request from `identifier` under `policy`.
    ///
    /// The lookup and the update happen under one write lock, so concurrent
    /// checks for the same key never lose an increment.
    pub async fn check(&self, identifier: &str, policy: &RateLimitPolicy) -> RateLimitResult {
        let key = format!("{}:{}", policy.prefix, identifier);
        let now = self.clock.now_ms();

        let mut records = self.records.write().await;

        if records.len() > self.capacity {
            let cutoff = now.saturating_sub(policy.window_ms);
            let before = records.len();
            records.retain(|_, record| record.window_reset_at >= cutoff);
            let evicted = before - records.len();
            if evicted > 0 {
                info!(evicted, remaining_records = records.len(), "Swept expired rate limit records");
            } else {
                debug!(records = before, "Sweep found no expired records");
            }
        }

        match records.get_mut(&key) {
            Some(record) if now <= record.window_reset_at => {
                let reset_in = record.window_reset_at - now;

                if record.count >= policy.max_requests {
                    debug!(%key, reset_in, "Rate limit exceeded");
                    return RateLimitResult {
                        allowed: false,
                        remaining: 0,
                        reset_in,
                    };
                }

                record.count += 1;
                RateLimitResult {
                    allowed: true,
                    remaining: policy.max_requests - record.count,
                    reset_in,
                }
            }
            _ => {
                let window_reset_at = now.saturating_add(policy.window_ms);
                records.insert(
                    key,
                    RateLimitRecord {
                        count: 1,
                        window_reset_at,
                    },
                );
                RateLimitResult {
                    allowed: true,
                    remaining: policy.max_requests.saturating_sub(1),
                    reset_in: window_reset_at - now,
                }
            }
        }
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether no records are held.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
