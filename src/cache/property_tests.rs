//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the LRU shard against a naive reference model
//! and the sharded cache against its counter contract.

use std::collections::HashMap;

use bytes::Bytes;
use proptest::prelude::*;

use crate::cache::{LruShard, ShardedCache};

// == Operations ==
#[derive(Debug, Clone)]
enum CacheOp {
    Insert { key: i64, value: Vec<u8> },
    Lookup { key: i64 },
    Remove { key: i64 },
}

/// A small key range so sequences revisit keys and trigger eviction.
fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (0i64..24, prop::collection::vec(any::<u8>(), 0..16))
            .prop_map(|(key, value)| CacheOp::Insert { key, value }),
        (0i64..24).prop_map(|key| CacheOp::Lookup { key }),
        (0i64..24).prop_map(|key| CacheOp::Remove { key }),
    ]
}

// == Reference Model ==
/// Textbook LRU over a vector: front of `order` is most recently used.
/// Quadratic and proud of it; it exists to be obviously correct.
struct ModelLru {
    capacity: usize,
    order: Vec<i64>,
    values: HashMap<i64, Vec<u8>>,
}

impl ModelLru {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: Vec::new(),
            values: HashMap::new(),
        }
    }

    fn insert(&mut self, key: i64, value: Vec<u8>) {
        if self.values.contains_key(&key) {
            self.values.insert(key, value);
            self.promote(key);
            return;
        }
        if self.order.len() == self.capacity {
            let victim = self.order.pop().unwrap();
            self.values.remove(&victim);
        }
        self.order.insert(0, key);
        self.values.insert(key, value);
    }

    fn lookup(&mut self, key: i64) -> Option<Vec<u8>> {
        let value = self.values.get(&key).cloned()?;
        self.promote(key);
        Some(value)
    }

    fn remove(&mut self, key: i64) -> bool {
        if self.values.remove(&key).is_some() {
            self.order.retain(|k| *k != key);
            true
        } else {
            false
        }
    }

    fn promote(&mut self, key: i64) {
        self.order.retain(|k| *k != key);
        self.order.insert(0, key);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Any operation sequence leaves the shard agreeing with the reference
    // model on results, membership, size, and exact recency order.
    #[test]
    fn prop_shard_matches_reference_model(
        capacity in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..200),
    ) {
        let mut shard = LruShard::new(capacity);
        let mut model = ModelLru::new(capacity);

        for op in ops {
            match op {
                CacheOp::Insert { key, value } => {
                    shard.insert(key, Bytes::from(value.clone()));
                    model.insert(key, value);
                }
                CacheOp::Lookup { key } => {
                    let got = shard.lookup(key).map(|v| v.to_vec());
                    let want = model.lookup(key);
                    prop_assert_eq!(got, want, "lookup disagrees for key {}", key);
                }
                CacheOp::Remove { key } => {
                    prop_assert_eq!(shard.remove(key), model.remove(key));
                }
            }
            prop_assert!(shard.len() <= capacity, "capacity bound violated");
            shard.check_consistency();
        }

        prop_assert_eq!(shard.len(), model.order.len());
        prop_assert_eq!(shard.keys_mru_order(), model.order);
    }

    // Hit and miss counters reflect exactly the lookups that found or
    // missed an entry. Capacity is large enough that nothing is evicted,
    // so plain map membership predicts every outcome.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let cache = ShardedCache::new(1000, 4);
        let mut members: HashMap<i64, Vec<u8>> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Insert { key, value } => {
                    cache.insert(key, Bytes::from(value.clone()));
                    members.insert(key, value);
                }
                CacheOp::Lookup { key } => {
                    let got = cache.lookup(key).map(|v| v.to_vec());
                    let want = members.get(&key).cloned();
                    prop_assert_eq!(&got, &want);
                    if got.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                }
                CacheOp::Remove { key } => {
                    cache.remove(key);
                    members.remove(&key);
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "misses mismatch");
        prop_assert_eq!(stats.total_entries, members.len(), "entry count mismatch");
    }
}
