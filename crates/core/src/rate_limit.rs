//! Per-day request caps for recommendation calls.
//!
//! Counters live in the shared [`TtlCache`] under `{prefix}_{YYYY-MM-DD}`
//! (local date) and expire at the end of that day.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::cache::TtlCache;
use crate::clock::Clock;

/// Default daily cap for both volunteer and admin recommendation requests.
pub const DEFAULT_DAILY_LIMIT: u32 = 3;

/// Outcome of [`DailyLimiter::try_acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitDecision {
    /// The request may proceed; `used` counts this request.
    Allowed { used: u32 },
    /// The cap for today is already reached. Nothing was incremented.
    LimitReached,
}

impl LimitDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

pub struct DailyLimiter {
    cache: Arc<TtlCache>,
    clock: Arc<dyn Clock>,
    max_per_day: u32,
}

impl DailyLimiter {
    pub fn new(cache: Arc<TtlCache>, clock: Arc<dyn Clock>, max_per_day: u32) -> Self {
        Self {
            cache,
            clock,
            max_per_day,
        }
    }

    pub fn max_per_day(&self) -> u32 {
        self.max_per_day
    }

    /// Cache key of today's counter for `prefix`.
    pub fn key_for(prefix: &str, date: NaiveDate) -> String {
        format!("{prefix}_{}", date.format("%Y-%m-%d"))
    }

    /// Count one request against `prefix`, unless today's cap is reached.
    ///
    /// The read-then-write is not atomic across concurrent requests; two
    /// racing requests may both be admitted at the boundary.
    pub async fn try_acquire(&self, prefix: &str) -> LimitDecision {
        let key = Self::key_for(prefix, self.clock.today());
        let used = self.cache.get::<u32>(&key).await.unwrap_or(0);
        if used >= self.max_per_day {
            return LimitDecision::LimitReached;
        }

        let used = used + 1;
        self.cache
            .set_with_ttl(key, used, self.clock.until_end_of_day())
            .await;
        LimitDecision::Allowed { used }
    }

    /// Requests counted today for `prefix`.
    pub async fn used_today(&self, prefix: &str) -> u32 {
        let key = Self::key_for(prefix, self.clock.today());
        self.cache.get::<u32>(&key).await.unwrap_or(0)
    }
}

impl std::fmt::Debug for DailyLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DailyLimiter")
            .field("max_per_day", &self.max_per_day)
            .finish_non_exhaustive()
    }
}
