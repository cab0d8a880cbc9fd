//! API Module
//!
//! HTTP handlers and routing for the gateway REST API.
//!
//! # Endpoints
//! - `POST /set` - Set a string key
//! - `GET /get` - Read a string key
//! - `DELETE /delete` - Delete a key
//! - `POST /hmset` - Set several hash fields from a JSON body
//! - `GET /hgetall` - Read a whole hash
//! - `GET /hget` - Read one hash field
//! - `POST /hset` - Set one hash field
//! - `DELETE /hdel` - Delete one hash field
//! - `GET /health` - Store connectivity check

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
