// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rate limiting for outbound search-engine requests

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use super::types::SearchError;

/// Shared budget for calls to external search engines
///
/// A limit of zero disables the check.
pub struct SearchRateLimiter {
    limiter: Option<Arc<GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
    requests_per_minute: u32,
}

impl SearchRateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `requests_per_minute` - Maximum requests allowed per minute (0 = unlimited)
    pub fn new(requests_per_minute: u32) -> Self {
        let limiter = NonZeroU32::new(requests_per_minute)
            .map(|rpm| Arc::new(GovRateLimiter::direct(Quota::per_minute(rpm))));

        Self {
            limiter,
            requests_per_minute,
        }
    }

    /// Returns Ok(()) if allowed, or SearchError::RateLimited if not
    pub fn check(&self) -> Result<(), SearchError> {
        match &self.limiter {
            None => Ok(()),
            Some(limiter) => limiter.check().map_err(|_| SearchError::RateLimited {
                retry_after_secs: 60,
            }),
        }
    }

    /// Get the configured requests per minute
    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }
}
