//! In-memory key/value cache with per-entry expiry.
//!
//! Holds daily request counters and cached recommendation results. Values
//! are type-erased so one cache instance serves both; a read with the wrong
//! type behaves like a miss. Expired entries are dropped lazily on read and
//! in bulk by [`TtlCache::sweep`], which the API runs on a timer.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset};
use tokio::sync::RwLock;

use crate::clock::Clock;

/// Lifetime of an entry stored without an explicit TTL.
pub const DEFAULT_TTL_MINUTES: i64 = 15;

/// How often the background sweeper should run.
pub const SWEEP_INTERVAL_SECS: u64 = 5 * 60;

struct Entry {
    value: Box<dyn Any + Send + Sync>,
    expires_at: DateTime<FixedOffset>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<FixedOffset>) -> bool {
        now >= self.expires_at
    }
}

pub struct TtlCache {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
}

impl TtlCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_default_ttl(clock, Duration::minutes(DEFAULT_TTL_MINUTES))
    }

    pub fn with_default_ttl(clock: Arc<dyn Clock>, default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            default_ttl,
        }
    }

    /// Fetch a live value. Expired entries are removed and reported as misses.
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let now = self.clock.now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => {
                    return entry.value.downcast_ref::<T>().cloned();
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        None
    }

    /// Store `value` under `key` for the default TTL.
    pub async fn set<T>(&self, key: impl Into<String>, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub async fn set_with_ttl<T>(&self, key: impl Into<String>, value: T, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        let entry = Entry {
            value: Box::new(value),
            expires_at: self.clock.now() + ttl,
        };
        self.entries.write().await.insert(key.into(), entry);
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Drop every entry whose key matches `predicate`. Returns how many were
    /// removed.
    pub async fn invalidate_where(&self, predicate: impl Fn(&str) -> bool) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !predicate(key));
        before - entries.len()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
