//! Response DTOs for the gateway API
//!
//! JSON bodies returned by `/get` and `/health`. Text endpoints reply plain
//! bodies and need no DTO.

use serde::Serialize;

/// Response body for `GET /get`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value, `null` when the key is absent
    pub value: Option<String>,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" when the store answered a ping, "unhealthy" otherwise
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a healthy HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self::with_status("healthy")
    }

    /// Creates an unhealthy HealthResponse with current timestamp
    pub fn unhealthy() -> Self {
        Self::with_status("unhealthy")
    }

    fn with_status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
