//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_user_handler, delete_user_handler, flush_cache_handler, get_user_handler,
    health_handler, list_users_handler, update_user_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /users` - List users
/// - `POST /users` - Create a user
/// - `GET /users/:id` - Fetch a user
/// - `PUT /users/:id` - Update a user
/// - `DELETE /users/:id` - Delete a user
/// - `POST /cache/flush` - Drop every cached entry
/// - `GET /health` - Cache round-trip health check
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/:id",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .route("/cache/flush", post(flush_cache_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
