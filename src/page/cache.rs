// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounded, time-expiring LRU cache for page bodies and rendered outlines

use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    refreshed_at: Instant,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: Option<LruCache<String, CacheEntry>>,
    hits: u64,
    misses: u64,
}

/// Snapshot of cache counters, reported on the health endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub ttl_secs: u64,
    pub hits: u64,
    pub misses: u64,
}

/// String-to-string LRU cache with a per-entry TTL
///
/// Reads and writes both refresh recency; writes also refresh the timestamp.
/// A capacity of zero disables the cache: every `get` misses and `put` is a
/// no-op. All operations take one lock so the touch/evict sequence is atomic.
pub struct PageCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
    ttl: Duration,
}

impl PageCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let entries = NonZeroUsize::new(capacity).map(LruCache::new);
        Self {
            inner: Mutex::new(CacheInner {
                entries,
                ..Default::default()
            }),
            capacity,
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    /// Lookup against an explicit clock reading
    pub fn get_at(&self, key: &str, now: Instant) -> Option<String> {
        let mut inner = self.lock();
        let ttl = self.ttl;
        let value = match inner.entries.as_mut() {
            None => None,
            Some(entries) => {
                let expired = entries
                    .peek(key)
                    .map(|entry| now.saturating_duration_since(entry.refreshed_at) > ttl);
                match expired {
                    Some(true) => {
                        entries.pop(key);
                        None
                    }
                    Some(false) => entries.get(key).map(|entry| entry.value.clone()),
                    None => None,
                }
            }
        };
        if value.is_some() {
            inner.hits += 1;
        } else {
            inner.misses += 1;
        }
        value
    }

    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.put_at(key, value, Instant::now());
    }

    pub fn put_at(&self, key: impl Into<String>, value: impl Into<String>, now: Instant) {
        let mut inner = self.lock();
        if let Some(entries) = inner.entries.as_mut() {
            entries.put(
                key.into(),
                CacheEntry {
                    value: value.into(),
                    refreshed_at: now,
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            entries: inner.entries.as_ref().map_or(0, LruCache::len),
            capacity: self.capacity,
            ttl_secs: self.ttl.as_secs(),
            hits: inner.hits,
            misses: inner.misses,
        }
    }
}
