//! Redis Store
//!
//! Production backend built on a managed, multiplexed connection.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use tracing::info;

use crate::config::Config;
use crate::error::StoreResult;
use crate::store::KvStore;

/// Store backed by a single managed Redis connection.
///
/// `ConnectionManager` multiplexes concurrent commands over one connection
/// and reconnects on failure; cloning it is cheap and shares that connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to the store and verifies the connection with a `PING`.
    ///
    /// Fails if the URL is malformed or the server is unreachable within the
    /// configured connect timeout.
    pub async fn connect(config: &Config) -> StoreResult<Self> {
        let client = Client::open(config.redis_url.as_str())?;
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(config.connect_timeout)
            .set_number_of_retries(config.retries);
        let conn = ConnectionManager::new_with_config(client, manager_config).await?;

        let store = Self { conn };
        store.ping().await?;
        info!("Connected to store at {}", redacted(&config.redis_url));
        Ok(store)
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

/// Strips credentials from a connection URL before logging it.
fn redacted(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn set(&self, key: &str, value: &str) -> StoreResult<String> {
        Ok(self.conn().set(key, value).await?)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.conn().get(key).await?)
    }

    async fn delete(&self, key: &str) -> StoreResult<i64> {
        Ok(self.conn().del(key).await?)
    }

    async fn hset_many(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<i64> {
        // HMSET replies OK; HSET with several pairs replies the added count.
        let mut cmd = redis::cmd("HSET");
        cmd.arg(key);
        for (field, value) in pairs {
            cmd.arg(field).arg(value);
        }
        Ok(cmd.query_async(&mut self.conn()).await?)
    }

    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        Ok(self.conn().hgetall(key).await?)
    }

    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        Ok(self.conn().hget(key, field).await?)
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> StoreResult<i64> {
        Ok(self.conn().hset(key, field, value).await?)
    }

    async fn hdel(&self, key: &str, field: &str) -> StoreResult<i64> {
        Ok(self.conn().hdel(key, field).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        let _: String = redis::cmd("PING").query_async(&mut self.conn()).await?;
        Ok(())
    }
}
