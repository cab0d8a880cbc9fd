//! Property-Based Tests for the Store Module
//!
//! Checks the store semantics the gateway passes through unchanged.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::store::{KvStore, MemoryStore};

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,32}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "\\PC{0,64}"
}

fn field_map_strategy() -> impl Strategy<Value = HashMap<String, String>> {
    prop::collection::hash_map("[a-z_]{1,16}", value_strategy(), 1..16)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_set_then_get_returns_value(key in key_strategy(), value in value_strategy()) {
        let store = MemoryStore::new();
        let got = tokio_test::block_on(async {
            store.set(&key, &value).await.unwrap();
            store.get(&key).await.unwrap()
        });
        prop_assert_eq!(got, Some(value));
    }

    #[test]
    fn prop_hset_many_then_hgetall_returns_map(key in key_strategy(), map in field_map_strategy()) {
        let store = MemoryStore::new();
        let pairs: Vec<(String, String)> = map.clone().into_iter().collect();
        let (added, all) = tokio_test::block_on(async {
            let added = store.hset_many(&key, &pairs).await.unwrap();
            (added, store.hgetall(&key).await.unwrap())
        });
        prop_assert_eq!(added, map.len() as i64);
        prop_assert_eq!(all, map);
    }

    #[test]
    fn prop_delete_absent_key_removes_nothing(key in key_strategy()) {
        let store = MemoryStore::new();
        let removed = tokio_test::block_on(store.delete(&key)).unwrap();
        prop_assert_eq!(removed, 0);
    }
}
