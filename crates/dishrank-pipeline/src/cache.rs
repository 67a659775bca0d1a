//! Time-bounded cache of computed aggregations, keyed by venue id.
//!
//! Expiry is lazy: an expired entry reads as absent and is left for the next
//! `put` to replace or for [`ResultCache::sweep`] to collect. `put` replaces
//! any existing entry wholesale; readers never observe a partial entry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use dishrank_core::AggregationResult;

struct CacheEntry {
    result: AggregationResult,
    expires_at: Instant,
}

/// In-process TTL cache mapping venue id to its [`AggregationResult`].
#[derive(Default)]
pub struct ResultCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResultCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached result for `place_id`, or `None` when no entry
    /// exists or the entry has expired.
    pub async fn get(&self, place_id: &str) -> Option<AggregationResult> {
        let entries = self.entries.read().await;
        let entry = entries.get(place_id)?;
        if Instant::now() >= entry.expires_at {
            return None;
        }
        Some(entry.result.clone())
    }

    /// Stores `result` under its venue id for `ttl`, replacing any existing
    /// entry for that id.
    ///
    /// A `ttl` of zero produces an entry that is already expired on the next
    /// read.
    pub async fn put(&self, result: AggregationResult, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        let key = result.place_id.clone();
        let mut entries = self.entries.write().await;
        entries.insert(key, CacheEntry { result, expires_at });
    }

    /// Removes expired entries and returns how many were dropped.
    ///
    /// Optional housekeeping for a long-lived process; correctness does not
    /// depend on it because reads treat expired entries as absent.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        before - entries.len()
    }
}
