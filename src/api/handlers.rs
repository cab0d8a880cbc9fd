//! API Handlers
//!
//! One handler per store operation. Each issues exactly one store call and
//! maps its outcome to an HTTP response; failures become [`GatewayError`]s,
//! which render the operation's sentinel body.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use crate::error::{GatewayError, Result};
use crate::models::{
    FieldValues, GetResponse, HealthResponse, KeyFieldQuery, KeyFieldValueQuery, KeyQuery,
    KeyValueQuery,
};
use crate::rewrite::rewrite_storage_host;
use crate::store::KvStore;

// == Operation ==
/// The store operations exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Set,
    Get,
    Delete,
    HmSet,
    HGetAll,
    HGet,
    HSet,
    HDel,
}

impl Operation {
    /// Name used in log events.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Set => "set",
            Operation::Get => "get",
            Operation::Delete => "delete",
            Operation::HmSet => "hmset",
            Operation::HGetAll => "hgetall",
            Operation::HGet => "hget",
            Operation::HSet => "hset",
            Operation::HDel => "hdel",
        }
    }
}

/// Application state shared across all handlers.
///
/// Holds the one store handle every request goes through.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KvStore>,
}

impl AppState {
    /// Creates a new AppState around the given store.
    pub fn new(store: impl KvStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Creates a new AppState sharing an existing store handle.
    pub fn from_shared(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }
}

/// Renders a SET status reply the way existing clients expect it.
///
/// An acknowledged write (`OK`) is reported as `True`; any other status text
/// is passed through.
fn set_reply(status: String) -> String {
    if status == "OK" {
        "True".to_string()
    } else {
        status
    }
}

/// Handler for POST /set
pub async fn set_handler(
    State(state): State<AppState>,
    Query(q): Query<KeyValueQuery>,
) -> Result<String> {
    state
        .store
        .set(&q.key, &q.value)
        .await
        .map(set_reply)
        .map_err(|e| GatewayError::new(Operation::Set, &q.key, e))
}

/// Handler for GET /get
///
/// An absent key is a successful response with a `null` value.
pub async fn get_handler(
    State(state): State<AppState>,
    Query(q): Query<KeyQuery>,
) -> Result<Json<GetResponse>> {
    let value = state
        .store
        .get(&q.key)
        .await
        .map_err(|e| GatewayError::new(Operation::Get, &q.key, e))?;

    Ok(Json(GetResponse::new(q.key, value)))
}

/// Handler for DELETE /delete
pub async fn delete_handler(
    State(state): State<AppState>,
    Query(q): Query<KeyQuery>,
) -> Result<String> {
    let removed = state
        .store
        .delete(&q.key)
        .await
        .map_err(|e| GatewayError::new(Operation::Delete, &q.key, e))?;

    Ok(removed.to_string())
}

/// Handler for POST /hmset
///
/// The key comes from the query string, the field map from the JSON body.
pub async fn hmset_handler(
    State(state): State<AppState>,
    Query(q): Query<KeyQuery>,
    Json(values): Json<FieldValues>,
) -> Result<String> {
    debug!(key = %q.key, fields = values.len(), "hmset");
    let added = state
        .store
        .hset_many(&q.key, values.pairs())
        .await
        .map_err(|e| GatewayError::new(Operation::HmSet, &q.key, e))?;

    Ok(added.to_string())
}

/// Handler for GET /hgetall
///
/// An absent key yields an empty object.
pub async fn hgetall_handler(
    State(state): State<AppState>,
    Query(q): Query<KeyQuery>,
) -> Result<Json<HashMap<String, String>>> {
    state
        .store
        .hgetall(&q.key)
        .await
        .map(Json)
        .map_err(|e| GatewayError::new(Operation::HGetAll, &q.key, e))
}

/// Handler for GET /hget
///
/// Replies the raw field value with the storage host rewritten, or 404 with
/// an empty body when the key or field is absent.
pub async fn hget_handler(
    State(state): State<AppState>,
    Query(q): Query<KeyFieldQuery>,
) -> Result<Response> {
    let value = state
        .store
        .hget(&q.key, &q.field)
        .await
        .map_err(|e| GatewayError::new(Operation::HGet, &q.key, e).with_field(&q.field))?;

    Ok(match value {
        Some(value) => rewrite_storage_host(value).into_bytes().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

/// Handler for POST /hset
pub async fn hset_handler(
    State(state): State<AppState>,
    Query(q): Query<KeyFieldValueQuery>,
) -> Result<String> {
    let added = state
        .store
        .hset(&q.key, &q.field, &q.value)
        .await
        .map_err(|e| GatewayError::new(Operation::HSet, &q.key, e).with_field(&q.field))?;

    Ok(added.to_string())
}

/// Handler for DELETE /hdel
///
/// Removing zero fields is a success. A store failure replies 200 with "-1",
/// unlike the other endpoints.
pub async fn hdel_handler(
    State(state): State<AppState>,
    Query(q): Query<KeyFieldQuery>,
) -> Result<String> {
    let removed = state
        .store
        .hdel(&q.key, &q.field)
        .await
        .map_err(|e| GatewayError::new(Operation::HDel, &q.key, e).with_field(&q.field))?;

    Ok(removed.to_string())
}

/// Handler for GET /health
///
/// Pings the store; 503 when it does not answer.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Err(e) => {
            warn!(kind = e.kind(), "health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::unhealthy()))
        }
    }
}
