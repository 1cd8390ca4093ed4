//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache invariants over random operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_TTL: Duration = Duration::from_secs(300);
const TEST_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

fn new_store(max_entries: usize) -> CacheStore<String> {
    CacheStore::new(max_entries, TEST_TTL, TEST_CLEANUP_INTERVAL)
}

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,3}(:[a-z]{1,4})?".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Invalidate { pattern: Option<String> },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => proptest::option::of("[a-e]{1,2}").prop_map(|pattern| CacheOp::Invalidate { pattern }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Every lookup is either a hit or a miss, and the counters agree with what
    // callers observed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = new_store(TEST_MAX_ENTRIES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => store.set(key, value),
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Invalidate { pattern } => {
                    store.invalidate(pattern.as_deref());
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.size, store.len(), "Size mismatch");
    }

    // A value read back before its TTL elapses is the value last stored.
    #[test]
    fn prop_last_write_wins(writes in prop::collection::vec((key_strategy(), value_strategy()), 1..40)) {
        let mut store = new_store(TEST_MAX_ENTRIES);
        let mut latest = std::collections::HashMap::new();

        for (key, value) in writes {
            store.set(key.clone(), value.clone());
            latest.insert(key, value);
        }

        for (key, value) in latest {
            prop_assert_eq!(store.get(&key), Some(value));
        }
    }

    // The cache never holds more than its capacity after a set.
    #[test]
    fn prop_capacity_enforcement(
        max_entries in 1usize..20,
        ops in prop::collection::vec(cache_op_strategy(), 1..200)
    ) {
        let mut store = new_store(max_entries);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key, value);
                    prop_assert!(
                        store.len() <= max_entries,
                        "Cache size {} exceeds max {}",
                        store.len(),
                        max_entries
                    );
                }
                CacheOp::Get { key } => {
                    store.get(&key);
                }
                CacheOp::Invalidate { pattern } => {
                    store.invalidate(pattern.as_deref());
                }
            }
        }
    }

    // Invalidating a pattern removes exactly the keys containing it.
    #[test]
    fn prop_invalidate_removes_only_matching_keys(
        keys in prop::collection::hash_set(key_strategy(), 1..30),
        pattern in "[a-e]{1,2}"
    ) {
        let mut store = new_store(TEST_MAX_ENTRIES);
        for key in &keys {
            store.set(key.clone(), "v".to_string());
        }

        let removed = store.invalidate(Some(&pattern));

        let expected_removed = keys.iter().filter(|k| k.contains(pattern.as_str())).count();
        prop_assert_eq!(removed, expected_removed);
        for key in &keys {
            prop_assert_eq!(
                store.access_count(key).is_some(),
                !key.contains(pattern.as_str()),
                "Key {} in wrong state",
                key
            );
        }
    }

    // With distinct access counts, a full cache evicts exactly its lowest
    // quartile by count before inserting the new key.
    #[test]
    fn prop_eviction_removes_lowest_quartile(capacity in 4usize..24) {
        let mut store = new_store(capacity);
        let keys: Vec<String> = (0..capacity).map(|i| format!("key{i}")).collect();

        // key{i} ends up with access_count i + 1
        for (i, key) in keys.iter().enumerate() {
            store.set(key.clone(), key.clone());
            for _ in 0..i {
                store.get(key);
            }
        }

        store.set("incoming".to_string(), "new".to_string());

        let quota = capacity / 4;
        let evicted: HashSet<&String> = keys
            .iter()
            .filter(|key| store.access_count(key).is_none())
            .collect();
        let expected: HashSet<&String> = keys.iter().take(quota).collect();

        prop_assert_eq!(evicted, expected);
        prop_assert_eq!(store.len(), capacity - quota + 1);
        prop_assert_eq!(store.stats().evictions, quota as u64);
    }
}
