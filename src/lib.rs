//! KV Gateway - HTTP access to a Redis store
//!
//! Maps a small set of REST endpoints onto string and hash commands of a
//! shared store connection.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod rewrite;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use store::{KvStore, MemoryStore, RedisStore};
pub use tasks::spawn_health_check_task;
