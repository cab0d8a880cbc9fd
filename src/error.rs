//! Error types for the gateway
//!
//! Store failures are tagged by kind; the HTTP layer binds them to the
//! operation that failed and renders that operation's sentinel response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::api::Operation;

// == Store Error Enum ==
/// Failure of a single store call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store did not answer in time
    #[error("Timed out: {0}")]
    Timeout(String),

    /// The connection was refused, dropped, or could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store rejected the command (wrong type, bad arguments, ...)
    #[error("Command error: {0}")]
    Command(String),

    /// Anything the client could not classify
    #[error("Store error: {0}")]
    Other(String),
}

impl StoreError {
    /// Stable tag used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Timeout(_) => "timeout",
            StoreError::Connection(_) => "connection",
            StoreError::Command(_) => "command",
            StoreError::Other(_) => "other",
        }
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        let detail = err.to_string();
        if err.is_timeout() {
            StoreError::Timeout(detail)
        } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error()
        {
            StoreError::Connection(detail)
        } else if err.kind() == redis::ErrorKind::ResponseError
            || err.kind() == redis::ErrorKind::TypeError
            || err.code().is_some()
        {
            StoreError::Command(detail)
        } else {
            StoreError::Other(detail)
        }
    }
}

/// Convenience Result type for store calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Gateway Error ==
/// A store failure bound to the request that triggered it.
#[derive(Debug)]
pub struct GatewayError {
    pub op: Operation,
    pub key: String,
    pub field: Option<String>,
    pub source: StoreError,
}

impl GatewayError {
    pub fn new(op: Operation, key: impl Into<String>, source: StoreError) -> Self {
        Self {
            op,
            key: key.into(),
            field: None,
            source,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        error!(
            op = self.op.name(),
            key = %self.key,
            field = self.field.as_deref().unwrap_or(""),
            kind = self.source.kind(),
            "{} failed: {}",
            self.op.name(),
            self.source
        );

        // hdel reports its sentinel with 200; every other operation uses 500.
        match self.op {
            Operation::Get | Operation::HGetAll => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))).into_response()
            }
            Operation::HGet => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            Operation::HDel => (StatusCode::OK, "-1").into_response(),
            Operation::Set | Operation::Delete | Operation::HmSet | Operation::HSet => {
                (StatusCode::INTERNAL_SERVER_ERROR, "-1").into_response()
            }
        }
    }
}

/// Result type returned by the HTTP handlers.
pub type Result<T> = std::result::Result<T, GatewayError>;
