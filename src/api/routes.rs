//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, hdel_handler, hget_handler, hgetall_handler,
    hmset_handler, hset_handler, set_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", post(set_handler))
        .route("/get", get(get_handler))
        .route("/delete", delete(delete_handler))
        .route("/hmset", post(hmset_handler))
        .route("/hgetall", get(hgetall_handler))
        .route("/hget", get(hget_handler))
        .route("/hset", post(hset_handler))
        .route("/hdel", delete(hdel_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
