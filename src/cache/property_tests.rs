//! Property-Based Tests for the Local Store
//!
//! Uses proptest to check the cache contract against an arbitrary sequence of
//! operations.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;
use tokio_test::block_on;

use crate::cache::{CacheStore, CacheStoreExt, LocalCacheStore};

// == Test Configuration ==
const TEST_DEFAULT_TTL: u64 = 300;

// == Strategies ==
/// Generates cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9:_]{1,16}"
}

/// Generates JSON payloads of a few different shapes
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,64}".prop_map(|s| json!(s)),
        ("[a-z]{1,8}", any::<bool>()).prop_map(|(name, active)| json!({ "name": name, "active": active })),
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value },
    Get { key: String },
    Delete { key: String },
    Has { key: String },
    Flush,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Has { key }),
        1 => Just(CacheOp::Flush),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // The store behaves like a plain map while no TTL elapses.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let store = LocalCacheStore::new(TEST_DEFAULT_TTL);
        let mut model: HashMap<String, Value> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    prop_assert!(block_on(store.set(&key, value.clone(), None)));
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(block_on(store.get(&key)), model.get(&key).cloned());
                }
                CacheOp::Delete { key } => {
                    prop_assert!(block_on(store.delete(&key)), "Delete always reports success");
                    model.remove(&key);
                }
                CacheOp::Has { key } => {
                    prop_assert_eq!(block_on(store.has(&key)), model.contains_key(&key));
                }
                CacheOp::Flush => {
                    block_on(store.flush());
                    model.clear();
                }
            }
        }

        prop_assert_eq!(block_on(store.len()), model.len());
    }

    // has(k) agrees with get(k) being present.
    #[test]
    fn prop_has_agrees_with_get(key in key_strategy(), value in value_strategy(), stored in any::<bool>()) {
        let store = LocalCacheStore::new(TEST_DEFAULT_TTL);
        if stored {
            block_on(store.set(&key, value, None));
        }

        prop_assert_eq!(block_on(store.has(&key)), block_on(store.get(&key)).is_some());
    }

    // get_or_set on a warm key never runs compute and returns the stored value.
    #[test]
    fn prop_get_or_set_hit_skips_compute(key in key_strategy(), stored in any::<i64>(), fresh in any::<i64>()) {
        let store = LocalCacheStore::new(TEST_DEFAULT_TTL);
        block_on(store.set(&key, json!(stored), None));

        let result: Result<i64, ()> = block_on(store.get_or_set(&key, move || async move { Ok(fresh) }, None));

        prop_assert_eq!(result, Ok(stored));
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // After the TTL elapses the entry is absent for every read path.
    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in value_strategy()) {
        let store = LocalCacheStore::new(TEST_DEFAULT_TTL);

        block_on(store.set(&key, value.clone(), Some(1)));
        prop_assert_eq!(block_on(store.get(&key)), Some(value));

        sleep(Duration::from_millis(1100));

        prop_assert!(!block_on(store.has(&key)), "has() must not see expired entries");
        prop_assert_eq!(block_on(store.get(&key)), None);
    }
}
