//! Request and Response models for the gateway API
//!
//! DTOs for query parameters, the `/hmset` body, and JSON responses.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{FieldValues, KeyFieldQuery, KeyFieldValueQuery, KeyQuery, KeyValueQuery};
pub use responses::{GetResponse, HealthResponse};
