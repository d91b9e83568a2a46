// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sliding-window limiter for real network page fetches
//!
//! Cache hits never reach this limiter; only cache-miss fetches are counted.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Global cap on live `fetch_url` network requests per window
pub struct FetchRateLimiter {
    timestamps: Mutex<VecDeque<Instant>>,
    max_per_window: i64,
    window: Duration,
}

impl FetchRateLimiter {
    /// 60-second window; `max_per_minute <= 0` disables the limit
    pub fn new(max_per_minute: i64) -> Self {
        Self::with_window(max_per_minute, Duration::from_secs(60))
    }

    /// Custom window duration (for testing)
    pub fn with_window(max_per_window: i64, window: Duration) -> Self {
        Self {
            timestamps: Mutex::new(VecDeque::new()),
            max_per_window,
            window,
        }
    }

    pub fn limit(&self) -> i64 {
        self.max_per_window
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_per_window <= 0
    }

    /// Record a fetch if one is allowed right now
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    /// Prune, compare and record under one lock; a rejection is not recorded
    pub fn try_acquire_at(&self, now: Instant) -> bool {
        if self.is_unlimited() {
            return true;
        }
        let mut timestamps = self
            .timestamps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        while let Some(&oldest) = timestamps.front() {
            if now.saturating_duration_since(oldest) > self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
        if timestamps.len() as i64 >= self.max_per_window {
            return false;
        }
        timestamps.push_back(now);
        true
    }

    /// Fetches currently counted inside the window
    pub fn in_window(&self) -> usize {
        self.timestamps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
