//! In-memory metric cache.

use chrono::{DateTime, TimeDelta, Utc};
use market_core::{DataResult, DataType, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, trace};

/// Default time-to-live for cached metrics (five minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cache entry with timestamp for TTL-based freshness.
#[derive(Debug, Clone)]
struct CacheEntry {
    result: DataResult,
    cached_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(result: DataResult) -> Self {
        Self {
            result,
            cached_at: Utc::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.cached_at);
        age < TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX)
    }
}

/// TTL-bounded store holding at most one entry per [`DataType`].
///
/// Every data type owns a slot guarded by its own async mutex. A miss holds
/// the slot while the value is fetched, so concurrent callers asking for the
/// same data type wait for that fetch instead of issuing their own, while
/// other data types proceed independently. Entries are only ever replaced,
/// never evicted.
///
/// Share one cache between facades by wrapping it in an `Arc`.
#[derive(Debug)]
pub struct MetricCache {
    slots: [Mutex<Option<CacheEntry>>; DataType::ALL.len()],
    ttl: Duration,
}

impl Default for MetricCache {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl MetricCache {
    /// Create an empty cache with the default five minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache with a custom TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            slots: std::array::from_fn(|_| Mutex::new(None)),
            ttl,
        }
    }

    /// The freshness window applied to every entry.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    fn slot(&self, data_type: DataType) -> &Mutex<Option<CacheEntry>> {
        &self.slots[data_type as usize]
    }

    /// Returns the cached result for `data_type` if it is still fresh.
    pub async fn get(&self, data_type: DataType) -> Option<DataResult> {
        let slot = self.slot(data_type).lock().await;
        slot.as_ref()
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.result.clone())
    }

    /// Returns when the entry for `data_type` was stored, fresh or not.
    pub async fn cached_at(&self, data_type: DataType) -> Option<DateTime<Utc>> {
        self.slot(data_type)
            .lock()
            .await
            .as_ref()
            .map(|entry| entry.cached_at)
    }

    /// Returns the fresh entry for `data_type`, or runs `fetch` and stores its result.
    ///
    /// The slot stays locked for the duration of `fetch`. Errors are returned
    /// as-is and leave the slot untouched; an expired entry is never returned
    /// in place of a failed fetch.
    #[instrument(skip(self, fetch), fields(data_type = %data_type))]
    pub async fn get_or_fetch<F, Fut>(&self, data_type: DataType, fetch: F) -> Result<DataResult>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<DataResult>> + Send,
    {
        let mut slot = self.slot(data_type).lock().await;

        if let Some(entry) = slot.as_ref().filter(|entry| entry.is_fresh(self.ttl)) {
            debug!(cached_at = %entry.cached_at, "Cache hit");
            return Ok(entry.result.clone());
        }

        debug!(expired = slot.is_some(), "Cache miss, fetching");
        let result = fetch().await?;
        *slot = Some(CacheEntry::new(result.clone()));
        trace!(value = result.value(), provider = result.provider(), "Cached result");

        Ok(result)
    }

    /// Stores `result` under `data_type` with the current time.
    pub async fn put(&self, data_type: DataType, result: DataResult) {
        *self.slot(data_type).lock().await = Some(CacheEntry::new(result));
    }

    /// Stores `result` under `data_type` with an explicit timestamp.
    ///
    /// Useful for seeding a cache from a previous snapshot; an old timestamp
    /// produces an entry that is already expired.
    pub async fn put_with_timestamp(
        &self,
        data_type: DataType,
        result: DataResult,
        cached_at: DateTime<Utc>,
    ) {
        *self.slot(data_type).lock().await = Some(CacheEntry { result, cached_at });
    }
}
