//! Clock-driven keyed TTL cache backed by moka

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use chrono::Duration;
use moka::future::Cache as MokaCache;

use crate::domain::{CacheEntry, Clock};

/// Entry bound used when no capacity is given
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Keyed cache whose entries expire after a fixed TTL.
///
/// Freshness is judged against the injected clock; moka bounds the entry
/// count and drops entries once the TTL has also passed in wall time.
pub struct TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    entries: MokaCache<K, CacheEntry<V>>,
    ttl: Duration,
    max_entries: u64,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self::with_capacity(ttl, DEFAULT_MAX_ENTRIES, clock)
    }

    pub fn with_capacity(ttl: Duration, max_entries: u64, clock: Arc<dyn Clock>) -> Self {
        let mut builder = MokaCache::builder().max_capacity(max_entries);

        if let Ok(wall_ttl) = ttl.to_std() {
            if !wall_ttl.is_zero() {
                builder = builder.time_to_live(wall_ttl);
            }
        }

        Self {
            entries: builder.build(),
            ttl,
            max_entries,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }

    /// Cloned value for `key` when present and fresh; stale entries are removed
    pub async fn get_fresh(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key).await?;

        match entry.fresh(self.clock.now()) {
            Some(payload) => Some(payload.clone()),
            None => {
                self.entries.invalidate(key).await;
                None
            }
        }
    }

    pub async fn insert(&self, key: K, value: V) {
        let entry = CacheEntry::new(value, self.clock.now(), self.ttl);
        self.entries.insert(key, entry).await;
    }

    pub async fn invalidate(&self, key: &K) {
        self.entries.invalidate(key).await;
    }

    pub async fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }

    /// Number of stored entries after pending evictions are applied
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K, V> fmt::Debug for TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .field("entry_count", &self.entries.entry_count())
            .finish()
    }
}
