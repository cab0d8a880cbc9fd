//! Store Module
//!
//! The single shared handle to the backing key-value store, expressed as a
//! trait so the HTTP layer does not depend on a concrete client.

mod memory;
mod redis;

#[cfg(test)]
mod property_tests;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StoreResult;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

// == KvStore Trait ==
/// String and hash operations of the backing store.
///
/// Each method issues exactly one store command. Absent keys and fields are
/// reported through `Option` or an empty map, never as errors.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// `SET key value`, returning the status text the store replied with.
    async fn set(&self, key: &str, value: &str) -> StoreResult<String>;

    /// `GET key`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// `DEL key`, returning the number of keys removed.
    async fn delete(&self, key: &str) -> StoreResult<i64>;

    /// Bulk `HSET key f1 v1 f2 v2 ...`, returning the number of new fields.
    async fn hset_many(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<i64>;

    /// `HGETALL key`.
    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>>;

    /// `HGET key field`.
    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>>;

    /// `HSET key field value`, returning the number of new fields.
    async fn hset(&self, key: &str, field: &str, value: &str) -> StoreResult<i64>;

    /// `HDEL key field`, returning the number of fields removed.
    async fn hdel(&self, key: &str, field: &str) -> StoreResult<i64>;

    /// `PING`, used for health checks.
    async fn ping(&self) -> StoreResult<()>;
}
