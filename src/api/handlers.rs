//! API Handlers
//!
//! HTTP request handlers for the user endpoints, the health check and cache
//! administration.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::{check_health, CacheStore};
use crate::error::{AppError, Result};
use crate::models::{CreateUserRequest, HealthResponse, MessageResponse, UpdateUserRequest};
use crate::users::{User, UserRepository, UserService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
}

impl AppState {
    /// Creates a new AppState with the given user service.
    pub fn new(users: UserService) -> Self {
        Self { users }
    }

    /// Creates an AppState with an empty repository reading through `cache`.
    pub fn with_cache(cache: Arc<dyn CacheStore>) -> Self {
        Self::new(UserService::new(Arc::new(UserRepository::new()), cache))
    }
}

/// Handler for GET /users
pub async fn list_users_handler(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.users.list_users().await?))
}

/// Handler for GET /users/:id
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<User>> {
    Ok(Json(state.users.get_user(id).await?))
}

/// Handler for POST /users
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let user = state.users.create_user(req.name, req.email).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for PUT /users/:id
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    Ok(Json(state.users.update_user(id, req.name, req.email).await?))
}

/// Handler for DELETE /users/:id
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>> {
    state.users.delete_user(id).await?;
    Ok(Json(MessageResponse::new(format!("User {} deleted", id))))
}

/// Handler for POST /cache/flush
pub async fn flush_cache_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.users.flush_cache().await;
    Json(MessageResponse::new("Cache flushed"))
}

/// Handler for GET /health
///
/// 200 when the cache round trip succeeds, 503 otherwise. The service keeps
/// serving users either way.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let report = check_health(state.users.cache().as_ref()).await;
    let response = HealthResponse::from_report(report);
    let status = if response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
