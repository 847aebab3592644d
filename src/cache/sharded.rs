//! Sharded Cache Module
//!
//! Spreads the LRU cache over N independently locked shards so concurrent
//! requests on different keys rarely contend. Keys route to shards by a
//! stable hash; there is no recency order across shards.

use std::hash::{DefaultHasher, Hash, Hasher};

use bytes::Bytes;
use parking_lot::RwLock;

use crate::cache::{CacheStats, LruShard, StatsSnapshot};

// == Sharded Cache ==
/// A fixed array of [`LruShard`]s, each behind its own lock.
///
/// Every operation takes exactly one shard's lock, so no ordering exists
/// between shards and no cross-shard deadlock is possible. Lookups take
/// the write lock: touching an entry reorders the shard's recency list.
pub struct ShardedCache {
    shards: Vec<RwLock<LruShard>>,
    stats: CacheStats,
}

impl ShardedCache {
    // == Constructor ==
    /// Creates a cache with `total_capacity` entries spread over
    /// `shard_count` shards. Both parameters are clamped to at least 1;
    /// each shard holds `max(1, total_capacity / shard_count)` entries.
    pub fn new(total_capacity: usize, shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        let per_shard = (total_capacity / shard_count).max(1);
        let shards = (0..shard_count)
            .map(|_| RwLock::new(LruShard::new(per_shard)))
            .collect();
        Self {
            shards,
            stats: CacheStats::new(),
        }
    }

    // == Routing ==
    /// The shard a key routes to. The hasher uses fixed keys, so the
    /// mapping is stable for the process lifetime.
    pub fn shard_index(&self, key: i64) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }

    fn shard_for(&self, key: i64) -> &RwLock<LruShard> {
        &self.shards[self.shard_index(key)]
    }

    // == Lookup ==
    /// Returns the cached value for `key`, promoting it to most recently
    /// used in its shard.
    pub fn lookup(&self, key: i64) -> Option<Bytes> {
        let found = self.shard_for(key).write().lookup(key);
        match found {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Insert ==
    /// Stores `key -> value`, evicting the shard's least recently used
    /// entry if the shard is full.
    pub fn insert(&self, key: i64, value: Bytes) {
        let evicted = self.shard_for(key).write().insert(key, value);
        if evicted.is_some() {
            self.stats.record_eviction();
        }
    }

    // == Remove ==
    /// Drops the entry for `key` if present. Returns whether it existed.
    pub fn remove(&self, key: i64) -> bool {
        self.shard_for(key).write().remove(key)
    }

    // == Contains ==
    /// Membership test without touching recency or the hit/miss counters.
    pub fn contains(&self, key: i64) -> bool {
        self.shard_for(key).read().contains(key)
    }

    // == Accessors ==

    /// Total entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.read().is_empty())
    }

    /// Total capacity across all shards.
    pub fn capacity(&self) -> usize {
        self.shards.iter().map(|s| s.read().capacity()).sum()
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    // == Stats ==
    /// Point-in-time counters plus the current entry count.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.len())
    }
}
