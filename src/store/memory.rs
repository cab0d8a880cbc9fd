//! In-Memory Store
//!
//! In-process backend that mirrors the store semantics the gateway relies on.
//! Used by tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::store::KvStore;

const WRONGTYPE: &str =
    "WRONGTYPE Operation against a key holding the wrong kind of value";

#[derive(Debug, Clone)]
enum Entry {
    Str(String),
    Hash(HashMap<String, String>),
}

/// Store keeping string and hash entries in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if no keys are held.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Returns true if `key` exists with any type.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

fn wrong_type() -> StoreError {
    StoreError::Command(WRONGTYPE.to_string())
}

/// Inserts pairs into the hash at `key`, creating it if needed.
fn insert_fields<'a>(
    entries: &mut HashMap<String, Entry>,
    key: &str,
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> StoreResult<i64> {
    let entry = entries
        .entry(key.to_string())
        .or_insert_with(|| Entry::Hash(HashMap::new()));
    let Entry::Hash(hash) = entry else {
        return Err(wrong_type());
    };

    let mut added = 0;
    for (field, value) in pairs {
        if hash.insert(field.to_string(), value.to_string()).is_none() {
            added += 1;
        }
    }
    Ok(added)
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn set(&self, key: &str, value: &str) -> StoreResult<String> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), Entry::Str(value.to_string()));
        Ok("OK".to_string())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            None => Ok(None),
            Some(Entry::Str(value)) => Ok(Some(value.clone())),
            Some(Entry::Hash(_)) => Err(wrong_type()),
        }
    }

    async fn delete(&self, key: &str) -> StoreResult<i64> {
        let mut entries = self.entries.write().await;
        Ok(i64::from(entries.remove(key).is_some()))
    }

    async fn hset_many(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<i64> {
        if pairs.is_empty() {
            return Err(StoreError::Command(
                "ERR wrong number of arguments for 'hset' command".to_string(),
            ));
        }
        let mut entries = self.entries.write().await;
        insert_fields(
            &mut entries,
            key,
            pairs.iter().map(|(f, v)| (f.as_str(), v.as_str())),
        )
    }

    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            None => Ok(HashMap::new()),
            Some(Entry::Hash(hash)) => Ok(hash.clone()),
            Some(Entry::Str(_)) => Err(wrong_type()),
        }
    }

    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            None => Ok(None),
            Some(Entry::Hash(hash)) => Ok(hash.get(field).cloned()),
            Some(Entry::Str(_)) => Err(wrong_type()),
        }
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> StoreResult<i64> {
        let mut entries = self.entries.write().await;
        insert_fields(&mut entries, key, [(field, value)])
    }

    async fn hdel(&self, key: &str, field: &str) -> StoreResult<i64> {
        let mut entries = self.entries.write().await;
        let (removed, now_empty) = match entries.get_mut(key) {
            None => return Ok(0),
            Some(Entry::Str(_)) => return Err(wrong_type()),
            Some(Entry::Hash(hash)) => (hash.remove(field).is_some(), hash.is_empty()),
        };
        // An emptied hash no longer exists.
        if now_empty {
            entries.remove(key);
        }
        Ok(i64::from(removed))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
